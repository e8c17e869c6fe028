use crate::engine::ast::Expr;
use crate::engine::env::Environment;
use crate::engine::eval::{LispError, eval as main_eval, eval_body, is_truthy};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, error, instrument, trace};

/// Evaluates the condition and then exactly one branch.
///
/// Everything after the then-branch forms the else-branch; its forms are
/// evaluated in order and the last value wins. With no else-branch a
/// false condition yields `false`.
#[instrument(skip(args, env), fields(args = ?args), ret, err)]
pub fn eval_if(args: &[Expr], env: Rc<RefCell<Environment>>) -> Result<Expr, LispError> {
    trace!("Executing 'if' special form");
    if args.len() < 2 {
        error!(
            "'if' special form requires at least 2 arguments (condition and then-branch), found {}",
            args.len()
        );
        return Err(LispError::ArityMismatch(format!(
            "'if' expects at least 2 arguments, got {}",
            args.len()
        )));
    }

    let condition_expr = &args[0];
    let then_expr = &args[1];
    let else_branch = &args[2..];

    let condition_result = main_eval(condition_expr, Rc::clone(&env))?;
    debug!(?condition_result, "Evaluated 'if' condition");

    if is_truthy(&condition_result) {
        trace!("Condition is truthy, evaluating then-branch");
        main_eval(then_expr, env)
    } else if else_branch.is_empty() {
        trace!("Condition is false, no else-branch, returning false");
        Ok(Expr::Bool(false))
    } else {
        trace!("Condition is false, evaluating else-branch");
        eval_body(else_branch, env)
    }
}
