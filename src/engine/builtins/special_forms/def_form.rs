use crate::engine::ast::Expr;
use crate::engine::env::Environment;
use crate::engine::eval::{LispError, eval as main_eval};
use crate::engine::special_forms as special_form_constants;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, error, instrument, trace};

/// Evaluates the value expression and binds it to the name in the root
/// environment, no matter how deeply the `def` itself is nested. The
/// bound value is also the result of the form.
#[instrument(skip(args, env), fields(args = ?args), ret, err)]
pub fn eval_def(args: &[Expr], env: Rc<RefCell<Environment>>) -> Result<Expr, LispError> {
    trace!("Executing 'def' special form");
    if args.len() != 2 {
        error!(
            "'def' special form requires 2 arguments (variable name and value), found {}",
            args.len()
        );
        return Err(LispError::ArityMismatch(format!(
            "'def' expects 2 arguments, got {}",
            args.len()
        )));
    }

    let var_name = match &args[0] {
        Expr::Symbol(name) => name.clone(),
        other => {
            error!(
                "First argument to 'def' must be a symbol, found {:?}",
                other
            );
            return Err(LispError::TypeError {
                expected: "Symbol".to_string(),
                found: format!("{:?}", other),
            });
        }
    };

    if special_form_constants::is_special_form(&var_name) {
        error!(attempted_keyword = %var_name, "Attempted to bind a reserved keyword using 'def'");
        return Err(LispError::ReservedKeyword(var_name));
    }

    let evaluated_value = main_eval(&args[1], Rc::clone(&env))?;

    env.borrow_mut()
        .define_global(var_name.clone(), evaluated_value.clone());
    debug!(variable_name = %var_name, value = ?evaluated_value, "Defined global variable using 'def'");
    Ok(evaluated_value)
}
