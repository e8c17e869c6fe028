use crate::engine::ast::{Expr, LispFunction, ParamList};
use crate::engine::env::Environment;
use crate::engine::special_forms as special_form_constants;
use std::cell::RefCell;
use std::rc::Rc;
use thiserror::Error;
use tracing::{debug, error, instrument, trace};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LispError {
    #[error("Type error: expected {expected}, found {found}")]
    TypeError { expected: String, found: String },
    #[error("Unbound symbol: {0}")]
    UnboundSymbol(String),
    #[error("Invalid arguments for operator '{operator}': {message}")]
    InvalidArguments { operator: String, message: String },
    #[error("Arity mismatch: {0}")]
    ArityMismatch(String),
    #[error("Empty list: {0}")]
    EmptyList(String),
    #[error("Cannot bind reserved keyword: {0}")]
    ReservedKeyword(String),
    #[error("Not a function: {0}")]
    NotCallable(String),
}

/// Anything is truthy except the literal `false`. Numbers (including
/// zero), strings, symbols, callables, and the empty list all count as
/// true in a condition.
pub fn is_truthy(expr: &Expr) -> bool {
    !matches!(expr, Expr::Bool(false))
}

#[instrument(skip(expr, env), fields(expr = ?expr), ret, err)]
pub fn eval(expr: &Expr, env: Rc<RefCell<Environment>>) -> Result<Expr, LispError> {
    trace!("Starting evaluation");
    match expr {
        Expr::Number(_)
        | Expr::String(_)
        | Expr::Bool(_)
        | Expr::Function(_)
        | Expr::Macro(_)
        | Expr::NativeFunction(_) => {
            debug!("Evaluating self-evaluating expression: {:?}", expr);
            Ok(expr.clone())
        }
        Expr::Symbol(s) => {
            debug!(symbol_name = %s, "Evaluating Symbol");
            env.borrow().get(s).ok_or_else(|| {
                error!(symbol_name = %s, "Unbound symbol encountered");
                LispError::UnboundSymbol(s.clone())
            })
        }
        Expr::List(list) => {
            debug!("Evaluating List: {:?}", list);
            if list.is_empty() {
                trace!("List is empty, evaluating to empty list");
                return Ok(Expr::List(Vec::new()));
            }

            // Special forms are dispatched on the operator symbol before
            // any environment lookup, so no binding can shadow them.
            let first_form = &list[0];
            match first_form {
                Expr::Symbol(s) if s == special_form_constants::QUOTE => {
                    crate::engine::builtins::special_forms::eval_quote(&list[1..])
                }
                Expr::Symbol(s) if s == special_form_constants::IF => {
                    crate::engine::builtins::special_forms::eval_if(&list[1..], Rc::clone(&env))
                }
                Expr::Symbol(s) if s == special_form_constants::DEF => {
                    crate::engine::builtins::special_forms::eval_def(&list[1..], Rc::clone(&env))
                }
                Expr::Symbol(s) if s == special_form_constants::FN => {
                    crate::engine::builtins::special_forms::eval_fn(&list[1..], Rc::clone(&env))
                }
                Expr::Symbol(s) if s == special_form_constants::MACRO => {
                    crate::engine::builtins::special_forms::eval_macro(&list[1..], Rc::clone(&env))
                }
                _ => {
                    trace!("First element is not a special form, attempting call");

                    // Resolve the operator first. Macros consume their
                    // operands unevaluated, so argument evaluation has to
                    // wait until we know what we are calling.
                    let callee = eval(first_form, Rc::clone(&env))?;

                    if let Expr::Macro(mac) = callee {
                        debug!(operands = ?&list[1..], "Expanding macro call");
                        return expand_macro(&mac, &list[1..], env);
                    }

                    let mut evaluated_args = Vec::new();
                    for arg_expr in &list[1..] {
                        evaluated_args.push(eval(arg_expr, Rc::clone(&env))?);
                    }

                    apply(callee, evaluated_args)
                }
            }
        }
    }
}

/// Applies a function (Lisp or native) to a list of evaluated arguments.
#[instrument(skip(callee, evaluated_args), fields(callee = ?callee, args = ?evaluated_args), ret, err)]
fn apply(callee: Expr, evaluated_args: Vec<Expr>) -> Result<Expr, LispError> {
    match callee {
        Expr::Function(lisp_fn) => {
            debug!(function = ?lisp_fn, "Applying LispFunction");
            let call_env = bind_params("Function", &lisp_fn.params, evaluated_args, &lisp_fn.closure)?;
            debug!(body = ?lisp_fn.body, "Evaluating function body");
            eval_body(&lisp_fn.body, call_env)
        }
        Expr::NativeFunction(native_fn) => {
            debug!(native_function_name = %native_fn.name, "Applying NativeFunction");
            trace!(args = ?evaluated_args, "Calling native function with evaluated arguments");
            (native_fn.func)(evaluated_args)
        }
        _ => {
            error!(evaluated_to = ?callee, "Attempted to call a non-callable expression");
            Err(LispError::NotCallable(format!(
                "Expected a function or a native function, but found: {:?}",
                callee
            )))
        }
    }
}

/// Expands a macro call and evaluates the expansion.
///
/// The operands are bound to the macro's parameters without being
/// evaluated, the body runs in a frame enclosed by the macro's captured
/// environment to produce the expansion, and the expansion is then
/// evaluated in the calling environment.
#[instrument(skip(mac, operands, caller_env), fields(params = %mac.params, operands = ?operands), ret, err)]
fn expand_macro(
    mac: &LispFunction,
    operands: &[Expr],
    caller_env: Rc<RefCell<Environment>>,
) -> Result<Expr, LispError> {
    let expansion_env = bind_params("Macro", &mac.params, operands.to_vec(), &mac.closure)?;
    let expansion = eval_body(&mac.body, expansion_env)?;
    debug!(?expansion, "Macro expanded, evaluating expansion in calling environment");
    eval(&expansion, caller_env)
}

/// Evaluates a body of expressions in order, returning the value of the
/// last one. An empty body evaluates to the empty list.
pub fn eval_body(body: &[Expr], env: Rc<RefCell<Environment>>) -> Result<Expr, LispError> {
    let mut result = Expr::List(Vec::new());
    for form in body {
        result = eval(form, Rc::clone(&env))?;
    }
    Ok(result)
}

// Creates the frame for a call: checks arity, binds each required
// parameter to its argument, and collects any surplus arguments into a
// list bound to the rest parameter.
fn bind_params(
    kind: &str,
    params: &ParamList,
    mut args: Vec<Expr>,
    closure: &Rc<RefCell<Environment>>,
) -> Result<Rc<RefCell<Environment>>, LispError> {
    check_arity(kind, params, args.len())?;

    let call_env = Environment::new_enclosed(Rc::clone(closure));
    trace!(?call_env, "Created new environment for call");

    let tail = args.split_off(params.required.len());
    let mut frame = call_env.borrow_mut();
    for (param_name, arg_value) in params.required.iter().zip(args) {
        trace!(param = %param_name, value = ?arg_value, "Bound parameter in call environment");
        frame.define(param_name.clone(), arg_value);
    }
    if let Some(rest_name) = &params.rest {
        trace!(param = %rest_name, values = ?tail, "Bound rest parameter in call environment");
        frame.define(rest_name.clone(), Expr::List(tail));
    }
    drop(frame);

    Ok(call_env)
}

fn check_arity(kind: &str, params: &ParamList, supplied: usize) -> Result<(), LispError> {
    let required = params.required.len();
    match params.rest {
        Some(_) if supplied < required => {
            error!(expected = required, got = supplied, "Arity mismatch for variadic call");
            Err(LispError::ArityMismatch(format!(
                "{} expects at least {} arguments, got {}",
                kind, required, supplied
            )))
        }
        None if supplied != required => {
            error!(expected = required, got = supplied, "Arity mismatch for call");
            Err(LispError::ArityMismatch(format!(
                "{} expects {} arguments, got {}",
                kind, required, supplied
            )))
        }
        _ => Ok(()),
    }
}
