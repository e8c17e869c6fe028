use crate::engine::ast::Expr;
use crate::engine::eval::LispError;
use tracing::{error, trace};

// Helper function, not public
fn extract_number(expr: &Expr, op_name: &str) -> Result<f64, LispError> {
    match expr {
        Expr::Number(n) => Ok(*n),
        _ => {
            let type_error = LispError::TypeError {
                expected: "Number".to_string(),
                found: format!("{:?}", expr),
            };
            error!(operator = %op_name, error = %type_error, "Type error in native function");
            Err(type_error)
        }
    }
}

/// Sums all arguments. (+) is 0.
#[tracing::instrument(skip(args), ret, err)]
pub(crate) fn native_add(args: Vec<Expr>) -> Result<Expr, LispError> {
    trace!("Executing native '+' function");
    let mut sum = 0.0;
    for arg in args {
        sum += extract_number(&arg, "+")?;
    }
    Ok(Expr::Number(sum))
}

/// Multiplies all arguments. (*) is 1.
#[tracing::instrument(skip(args), ret, err)]
pub(crate) fn native_multiply(args: Vec<Expr>) -> Result<Expr, LispError> {
    trace!("Executing native '*' function");
    let mut product = 1.0;
    for arg in args {
        product *= extract_number(&arg, "*")?;
    }
    Ok(Expr::Number(product))
}

/// Subtracts every remaining argument from the first one. With a single
/// argument nothing is subtracted, so (- 5) is 5.
#[tracing::instrument(skip(args), ret, err)]
pub(crate) fn native_subtract(args: Vec<Expr>) -> Result<Expr, LispError> {
    trace!("Executing native '-' function");
    if args.is_empty() {
        let arity_error =
            LispError::ArityMismatch("Native '-' expects at least 1 argument, got 0".to_string());
        error!(error = %arity_error, "Arity error in native '-'");
        return Err(arity_error);
    }

    let mut result = extract_number(&args[0], "-")?;
    for arg_expr in args.iter().skip(1) {
        result -= extract_number(arg_expr, "-")?;
    }
    Ok(Expr::Number(result))
}

#[cfg(test)]
mod tests {
    use crate::engine::ast::Expr;
    use crate::engine::env::Environment;
    use crate::engine::eval::{LispError, eval};
    use crate::engine::parser::parse_expr;
    use crate::logging::init_test_logging;

    fn eval_math_str(code: &str) -> Result<Expr, LispError> {
        init_test_logging();
        let env = Environment::new();
        crate::engine::builtins::globals::populate_globals(&env);

        let (remaining, parsed_expr) = parse_expr(code).expect("test source should parse");
        assert_eq!(remaining, "", "test source should parse completely");
        eval(&parsed_expr, env)
    }

    #[test]
    fn test_native_add_simple() {
        assert_eq!(eval_math_str("(+ 1 2)"), Ok(Expr::Number(3.0)));
    }

    #[test]
    fn test_native_add_multiple_args() {
        assert_eq!(eval_math_str("(+ 1 2 3 4)"), Ok(Expr::Number(10.0)));
    }

    #[test]
    fn test_native_add_no_args() {
        assert_eq!(eval_math_str("(+)"), Ok(Expr::Number(0.0)));
    }

    #[test]
    fn test_native_add_single_arg() {
        assert_eq!(eval_math_str("(+ 7)"), Ok(Expr::Number(7.0)));
    }

    #[test]
    fn test_native_add_type_error() {
        assert_eq!(
            eval_math_str("(+ 1 true)"),
            Err(LispError::TypeError {
                expected: "Number".to_string(),
                found: "Bool(true)".to_string()
            })
        );
    }

    #[test]
    fn test_native_multiply_simple() {
        assert_eq!(eval_math_str("(* 2 3)"), Ok(Expr::Number(6.0)));
    }

    #[test]
    fn test_native_multiply_multiple_args() {
        assert_eq!(eval_math_str("(* 1 2 3 4)"), Ok(Expr::Number(24.0)));
    }

    #[test]
    fn test_native_multiply_no_args() {
        assert_eq!(eval_math_str("(*)"), Ok(Expr::Number(1.0)));
    }

    #[test]
    fn test_native_multiply_with_zero() {
        assert_eq!(eval_math_str("(* 5 0 2)"), Ok(Expr::Number(0.0)));
    }

    #[test]
    fn test_native_multiply_type_error() {
        assert_eq!(
            eval_math_str("(* 2 \"x\")"),
            Err(LispError::TypeError {
                expected: "Number".to_string(),
                found: "String(\"x\")".to_string()
            })
        );
    }

    #[test]
    fn test_native_subtract_simple() {
        assert_eq!(eval_math_str("(- 5 2)"), Ok(Expr::Number(3.0)));
    }

    #[test]
    fn test_native_subtract_multiple_args() {
        assert_eq!(eval_math_str("(- 10 1 2 3)"), Ok(Expr::Number(4.0)));
    }

    #[test]
    fn test_native_subtract_single_arg_is_identity() {
        // Subtraction takes a minuend; with nothing to subtract the
        // value passes through unchanged.
        assert_eq!(eval_math_str("(- 5)"), Ok(Expr::Number(5.0)));
    }

    #[test]
    fn test_native_subtract_negative_operands() {
        assert_eq!(eval_math_str("(- 5 -3)"), Ok(Expr::Number(8.0)));
    }

    #[test]
    fn test_native_subtract_no_args_error() {
        assert_eq!(
            eval_math_str("(-)"),
            Err(LispError::ArityMismatch(
                "Native '-' expects at least 1 argument, got 0".to_string()
            ))
        );
    }

    #[test]
    fn test_native_subtract_type_error() {
        assert_eq!(
            eval_math_str("(- 10 true)"),
            Err(LispError::TypeError {
                expected: "Number".to_string(),
                found: "Bool(true)".to_string()
            })
        );
    }

    #[test]
    fn test_nested_arithmetic() {
        assert_eq!(eval_math_str("(+ 1 (* 2 3))"), Ok(Expr::Number(7.0)));
        assert_eq!(eval_math_str("(- (+ 5 5) (* 2 2))"), Ok(Expr::Number(6.0)));
    }
}
