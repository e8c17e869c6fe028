use crate::engine::builtins::globals::populate_globals;
use crate::engine::env::Environment;
use crate::engine::eval::{LispError, eval};
use crate::engine::parser::{ParseError, parse_program};
use std::cell::RefCell;
use std::rc::Rc;
use thiserror::Error;
use tracing::debug;

// The standard vocabulary, written in the language itself. Each
// definition may use only the natives, the special forms, and what
// precedes it: `defmacro` is built from the primitive `macro`, `defun`
// from `defmacro`, and the helper functions from `defun`.
const PRELUDE: &str = r#"
(def defmacro (macro (name params &rest body)
  (list 'def name (concat (list 'macro params) body))))

(defmacro defun (name params &rest body)
  (list 'def name (concat (list 'fn params) body)))

(defun second (lst)
  (rest (first lst)))

(defun is-unquote (expr)
  (= (first expr) 'unquote))

(defun is-empty (lst)
  (= (length lst) 0))

;; Drafts, not enabled yet:
;; (defun map (f lst)
;;   (if (is-empty lst)
;;     lst
;;     (cons (f (first lst)) (map f (rest lst)))))
;; (defmacro quasiquote (expr)
;;   (if (is-unquote expr)
;;     (second expr)
;;     (list 'quote expr)))
"#;

/// Raised when the embedded prelude itself fails to load. Either case
/// means the interpreter cannot start.
#[derive(Error, Debug)]
pub enum PreludeError {
    #[error("Failed to parse the bootstrap prelude: {0}")]
    Parse(#[from] ParseError),
    #[error("Failed to evaluate the bootstrap prelude: {0}")]
    Eval(#[from] LispError),
}

/// Creates a fresh root environment holding the native functions and
/// everything the bootstrap prelude defines on top of them. Each call
/// builds an independent environment; nothing is shared between them.
pub fn bootstrap() -> Result<Rc<RefCell<Environment>>, PreludeError> {
    debug!("Bootstrapping prelude");
    let env = Environment::new();
    populate_globals(&env);

    let forms = parse_program(PRELUDE)?;
    for form in &forms {
        eval(form, Rc::clone(&env))?;
    }

    debug!(forms = forms.len(), "Evaluated bootstrap prelude");
    Ok(env)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ast::Expr;
    use crate::logging::init_test_logging;

    fn eval_str(source: &str, env: &Rc<RefCell<Environment>>) -> Result<Expr, LispError> {
        let (rest, expr) =
            crate::engine::parser::parse_expr(source).expect("test source should parse");
        assert_eq!(rest, "", "test source should parse completely");
        eval(&expr, Rc::clone(env))
    }

    #[test]
    fn bootstrap_succeeds() {
        init_test_logging();
        assert!(bootstrap().is_ok());
    }

    #[test]
    fn bootstrap_defines_the_expected_bindings() {
        init_test_logging();
        let env = bootstrap().expect("prelude should bootstrap");

        for name in ["defmacro", "defun"] {
            assert!(
                matches!(env.borrow().get(name), Some(Expr::Macro(_))),
                "'{}' should be bound to a macro",
                name
            );
        }
        for name in ["second", "is-unquote", "is-empty"] {
            assert!(
                matches!(env.borrow().get(name), Some(Expr::Function(_))),
                "'{}' should be bound to a function",
                name
            );
        }
    }

    #[test]
    fn bootstrap_creates_independent_environments() {
        init_test_logging();
        let first = bootstrap().expect("prelude should bootstrap");
        let second = bootstrap().expect("prelude should bootstrap");

        eval_str("(def only-here 1)", &first).unwrap();
        assert_eq!(first.borrow().get("only-here"), Some(Expr::Number(1.0)));
        assert_eq!(second.borrow().get("only-here"), None);
    }

    #[test]
    fn defun_defines_working_functions() {
        init_test_logging();
        let env = bootstrap().expect("prelude should bootstrap");
        eval_str("(defun double (x) (+ x x))", &env).unwrap();
        assert_eq!(eval_str("(double 21)", &env), Ok(Expr::Number(42.0)));
    }

    #[test]
    fn defun_supports_rest_parameters() {
        init_test_logging();
        let env = bootstrap().expect("prelude should bootstrap");
        eval_str("(defun tail-of (x &rest xs) xs)", &env).unwrap();
        assert_eq!(
            eval_str("(tail-of 1 2 3)", &env),
            Ok(Expr::List(vec![Expr::Number(2.0), Expr::Number(3.0)]))
        );
    }

    #[test]
    fn defun_supports_multi_form_bodies() {
        init_test_logging();
        let env = bootstrap().expect("prelude should bootstrap");
        eval_str("(defun noisy-id (x) (def last-seen x) x)", &env).unwrap();
        assert_eq!(eval_str("(noisy-id 5)", &env), Ok(Expr::Number(5.0)));
        assert_eq!(eval_str("last-seen", &env), Ok(Expr::Number(5.0)));
    }

    #[test]
    fn defun_expands_to_def_of_fn() {
        init_test_logging();
        let env = bootstrap().expect("prelude should bootstrap");
        eval_str("(defun inc (x) (+ x 1))", &env).unwrap();
        eval_str("(def manual-inc (fn (x) (+ x 1)))", &env).unwrap();
        // Same parameters, same body; the sugar adds nothing else.
        assert_eq!(env.borrow().get("inc"), env.borrow().get("manual-inc"));
    }

    #[test]
    fn defmacro_defines_working_macros() {
        init_test_logging();
        let env = bootstrap().expect("prelude should bootstrap");
        eval_str("(defmacro freeze (x) (list 'quote x))", &env).unwrap();
        assert_eq!(
            eval_str("(freeze (+ 1 2))", &env),
            Ok(Expr::List(vec![
                Expr::Symbol("+".to_string()),
                Expr::Number(1.0),
                Expr::Number(2.0)
            ]))
        );
    }

    #[test]
    fn functions_evaluate_operands_macros_do_not() {
        init_test_logging();
        let env = bootstrap().expect("prelude should bootstrap");
        eval_str("(defmacro m (x) (list 'quote x))", &env).unwrap();
        eval_str("(defun f (x) x)", &env).unwrap();

        // The function sees the summed value; the macro sees the form.
        assert_eq!(eval_str("(f (+ 1 2))", &env), Ok(Expr::Number(3.0)));
        assert_eq!(
            eval_str("(m (+ 1 2))", &env),
            Ok(Expr::List(vec![
                Expr::Symbol("+".to_string()),
                Expr::Number(1.0),
                Expr::Number(2.0)
            ]))
        );
    }

    #[test]
    fn is_empty_distinguishes_empty_lists() {
        init_test_logging();
        let env = bootstrap().expect("prelude should bootstrap");
        assert_eq!(eval_str("(is-empty '())", &env), Ok(Expr::Bool(true)));
        assert_eq!(eval_str("(is-empty '(1))", &env), Ok(Expr::Bool(false)));
    }

    #[test]
    fn is_unquote_matches_unquote_forms() {
        init_test_logging();
        let env = bootstrap().expect("prelude should bootstrap");
        assert_eq!(
            eval_str("(is-unquote '(unquote x))", &env),
            Ok(Expr::Bool(true))
        );
        assert_eq!(
            eval_str("(is-unquote '(foo x))", &env),
            Ok(Expr::Bool(false))
        );
        // It reads the first element, so the empty list is an error.
        assert!(matches!(
            eval_str("(is-unquote '())", &env),
            Err(LispError::EmptyList(_))
        ));
    }

    #[test]
    fn second_takes_the_rest_of_the_first_element() {
        init_test_logging();
        let env = bootstrap().expect("prelude should bootstrap");
        // The name suggests (first (rest lst)); what it actually does is
        // (rest (first lst)), which only works on lists of lists.
        assert_eq!(
            eval_str("(second '((1 2) 3))", &env),
            Ok(Expr::List(vec![Expr::Number(2.0)]))
        );
    }

    #[test]
    fn second_errors_on_flat_lists() {
        init_test_logging();
        let env = bootstrap().expect("prelude should bootstrap");
        // (first '(1 2)) is 1, and rest of a number is a type error.
        assert!(matches!(
            eval_str("(second '(1 2))", &env),
            Err(LispError::TypeError { .. })
        ));
    }
}
