use crate::engine::ast::{Expr, LispFunction, ParamList, VARIADIC_MARKER};
use crate::engine::env::Environment;
use crate::engine::eval::LispError;
use crate::engine::special_forms as special_form_constants;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, error, instrument, trace};

/// Builds a function value from a parameter list and body forms,
/// capturing the defining environment as the closure.
#[instrument(skip(args, env), fields(args = ?args), ret, err)]
pub fn eval_fn(args: &[Expr], env: Rc<RefCell<Environment>>) -> Result<Expr, LispError> {
    trace!("Executing 'fn' special form");
    let lisp_fn = build_callable(special_form_constants::FN, args, env)?;
    Ok(Expr::Function(lisp_fn))
}

/// Shared constructor for `fn` and `macro`. Both take a parameter list
/// followed by zero or more body forms; the body is stored unevaluated
/// together with the environment it was defined in.
pub(crate) fn build_callable(
    operator: &str,
    args: &[Expr],
    env: Rc<RefCell<Environment>>,
) -> Result<LispFunction, LispError> {
    if args.is_empty() {
        error!(
            "'{}' special form requires a parameter list, found no arguments",
            operator
        );
        return Err(LispError::ArityMismatch(format!(
            "'{}' expects at least 1 argument (parameter list), got 0",
            operator
        )));
    }

    let params = parse_param_list(operator, &args[0])?;
    let body = args[1..].to_vec();

    debug!(parameters = %params, body = ?body, "'{}' creating callable", operator);
    Ok(LispFunction {
        params,
        body,
        closure: env,
    })
}

// Parses a parameter list expression into fixed names plus an optional
// rest name. The &rest marker must sit second to last, naming exactly
// one trailing parameter.
fn parse_param_list(operator: &str, params_expr: &Expr) -> Result<ParamList, LispError> {
    let params_list = match params_expr {
        Expr::List(list) => list,
        _ => {
            error!(
                "First argument to '{}' must be a list of parameters, found {:?}",
                operator, params_expr
            );
            return Err(LispError::TypeError {
                expected: "List of parameters".to_string(),
                found: format!("{:?}", params_expr),
            });
        }
    };

    let mut names = Vec::with_capacity(params_list.len());
    for param in params_list {
        match param {
            Expr::Symbol(name) => names.push(name.clone()),
            _ => {
                error!(
                    "Parameters in '{}' must be symbols, found {:?}",
                    operator, param
                );
                return Err(LispError::TypeError {
                    expected: "Symbol".to_string(),
                    found: format!("{:?}", param),
                });
            }
        }
    }

    let rest = match names.iter().position(|name| name == VARIADIC_MARKER) {
        None => None,
        Some(index) if index + 2 == names.len() => {
            let rest_name = names.remove(index + 1);
            names.truncate(index);
            if rest_name == VARIADIC_MARKER {
                return Err(variadic_position_error(operator));
            }
            Some(rest_name)
        }
        Some(_) => return Err(variadic_position_error(operator)),
    };

    for name in names.iter().chain(rest.as_ref()) {
        if special_form_constants::is_special_form(name) {
            error!(attempted_keyword = %name, "Attempted to use a reserved keyword as a parameter");
            return Err(LispError::ReservedKeyword(name.clone()));
        }
    }

    Ok(ParamList {
        required: names,
        rest,
    })
}

fn variadic_position_error(operator: &str) -> LispError {
    LispError::InvalidArguments {
        operator: operator.to_string(),
        message: format!(
            "{} must be second to last in the parameter list",
            VARIADIC_MARKER
        ),
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::ast::{Expr, LispFunction};
    use crate::engine::env::Environment;
    use crate::engine::eval::{LispError, eval};
    use crate::logging::init_test_logging;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn eval_str(source: &str, env: &Rc<RefCell<Environment>>) -> Result<Expr, LispError> {
        let (_, expr) =
            crate::engine::parser::parse_expr(source).expect("test source should parse");
        eval(&expr, Rc::clone(env))
    }

    #[test]
    fn fn_creates_function_value() {
        init_test_logging();
        let env = Environment::new();
        let result = eval_str("(fn (x y) x)", &env);

        match result {
            Ok(Expr::Function(LispFunction {
                params,
                body,
                closure,
            })) => {
                assert_eq!(params.required, vec!["x".to_string(), "y".to_string()]);
                assert_eq!(params.rest, None);
                assert_eq!(body, vec![Expr::Symbol("x".to_string())]);
                assert!(Rc::ptr_eq(&closure, &env));
            }
            other => panic!("Expected a function value, got {:?}", other),
        }
    }

    #[test]
    fn fn_with_empty_params() {
        init_test_logging();
        let env = Environment::new();
        match eval_str("(fn () 10)", &env) {
            Ok(Expr::Function(LispFunction { params, body, .. })) => {
                assert!(params.required.is_empty());
                assert_eq!(params.rest, None);
                assert_eq!(body, vec![Expr::Number(10.0)]);
            }
            other => panic!("Expected a function value, got {:?}", other),
        }
    }

    #[test]
    fn fn_with_empty_body() {
        init_test_logging();
        let env = Environment::new();
        match eval_str("(fn (x))", &env) {
            Ok(Expr::Function(LispFunction { body, .. })) => assert!(body.is_empty()),
            other => panic!("Expected a function value, got {:?}", other),
        }
    }

    #[test]
    fn fn_keeps_all_body_forms() {
        init_test_logging();
        let env = Environment::new();
        match eval_str("(fn (x) x 10)", &env) {
            Ok(Expr::Function(LispFunction { body, .. })) => {
                assert_eq!(
                    body,
                    vec![Expr::Symbol("x".to_string()), Expr::Number(10.0)]
                );
            }
            other => panic!("Expected a function value, got {:?}", other),
        }
    }

    #[test]
    fn fn_with_rest_parameter() {
        init_test_logging();
        let env = Environment::new();
        match eval_str("(fn (a &rest b) b)", &env) {
            Ok(Expr::Function(LispFunction { params, .. })) => {
                assert_eq!(params.required, vec!["a".to_string()]);
                assert_eq!(params.rest, Some("b".to_string()));
            }
            other => panic!("Expected a function value, got {:?}", other),
        }
    }

    #[test]
    fn fn_with_only_rest_parameter() {
        init_test_logging();
        let env = Environment::new();
        match eval_str("(fn (&rest xs) xs)", &env) {
            Ok(Expr::Function(LispFunction { params, .. })) => {
                assert!(params.required.is_empty());
                assert_eq!(params.rest, Some("xs".to_string()));
            }
            other => panic!("Expected a function value, got {:?}", other),
        }
    }

    #[test]
    fn fn_requires_a_parameter_list() {
        init_test_logging();
        let env = Environment::new();
        assert_eq!(
            eval_str("(fn)", &env),
            Err(LispError::ArityMismatch(
                "'fn' expects at least 1 argument (parameter list), got 0".to_string()
            ))
        );
    }

    #[test]
    fn fn_params_must_be_a_list() {
        init_test_logging();
        let env = Environment::new();
        assert_eq!(
            eval_str("(fn x x)", &env),
            Err(LispError::TypeError {
                expected: "List of parameters".to_string(),
                found: "Symbol(\"x\")".to_string()
            })
        );
    }

    #[test]
    fn fn_params_must_be_symbols() {
        init_test_logging();
        let env = Environment::new();
        assert_eq!(
            eval_str("(fn (x 10) x)", &env),
            Err(LispError::TypeError {
                expected: "Symbol".to_string(),
                found: "Number(10.0)".to_string()
            })
        );
    }

    #[test]
    fn fn_param_cannot_be_reserved_keyword() {
        init_test_logging();
        let env = Environment::new();
        assert_eq!(
            eval_str("(fn (def) 1)", &env),
            Err(LispError::ReservedKeyword("def".to_string()))
        );
        // The rest name is checked too.
        assert_eq!(
            eval_str("(fn (a &rest fn) 1)", &env),
            Err(LispError::ReservedKeyword("fn".to_string()))
        );
    }

    #[test]
    fn fn_rest_marker_must_be_second_to_last() {
        init_test_logging();
        let env = Environment::new();
        let expected = Err(LispError::InvalidArguments {
            operator: "fn".to_string(),
            message: "&rest must be second to last in the parameter list".to_string(),
        });
        // Marker followed by more than one name.
        assert_eq!(eval_str("(fn (a &rest b c) a)", &env), expected);
        // Marker with no name after it.
        assert_eq!(eval_str("(fn (a &rest) a)", &env), expected);
        // Marker in the middle of the list.
        assert_eq!(eval_str("(fn (&rest a b) a)", &env), expected);
    }
}
