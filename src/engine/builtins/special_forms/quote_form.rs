use crate::engine::ast::Expr;
use crate::engine::eval::LispError;
use tracing::{error, instrument, trace};

/// Returns the single operand verbatim, without evaluating it.
#[instrument(skip(args), fields(args = ?args), ret, err)]
pub fn eval_quote(args: &[Expr]) -> Result<Expr, LispError> {
    trace!("Executing 'quote' special form");
    if args.len() != 1 {
        error!(
            "'quote' special form requires 1 argument, found {}",
            args.len()
        );
        return Err(LispError::ArityMismatch(format!(
            "'quote' expects 1 argument, got {}",
            args.len()
        )));
    }
    Ok(args[0].clone())
}
