use super::fn_form::build_callable;
use crate::engine::ast::Expr;
use crate::engine::env::Environment;
use crate::engine::eval::LispError;
use crate::engine::special_forms as special_form_constants;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{instrument, trace};

/// Builds a macro value. The shape is identical to `fn`; the difference
/// is entirely in how calls are handled: operands reach the body
/// unevaluated, and the body's result is evaluated again at the call
/// site.
#[instrument(skip(args, env), fields(args = ?args), ret, err)]
pub fn eval_macro(args: &[Expr], env: Rc<RefCell<Environment>>) -> Result<Expr, LispError> {
    trace!("Executing 'macro' special form");
    let lisp_macro = build_callable(special_form_constants::MACRO, args, env)?;
    Ok(Expr::Macro(lisp_macro))
}
