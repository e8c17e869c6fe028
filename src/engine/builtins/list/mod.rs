use crate::engine::ast::Expr;
use crate::engine::eval::LispError;
use tracing::{error, trace};

#[tracing::instrument(skip(args), ret, err)]
pub(crate) fn native_first(args: Vec<Expr>) -> Result<Expr, LispError> {
    trace!("Executing native function: first");
    let list = expect_single_list("first", &args)?;
    match list.first() {
        Some(head) => Ok(head.clone()),
        None => {
            let msg = "Cannot take the first element of an empty list".to_string();
            error!("{}", msg);
            Err(LispError::EmptyList(msg))
        }
    }
}

#[tracing::instrument(skip(args), ret, err)]
pub(crate) fn native_rest(args: Vec<Expr>) -> Result<Expr, LispError> {
    trace!("Executing native function: rest");
    let list = expect_single_list("rest", &args)?;
    if list.is_empty() {
        let msg = "Cannot take the rest of an empty list".to_string();
        error!("{}", msg);
        return Err(LispError::EmptyList(msg));
    }
    Ok(Expr::List(list[1..].to_vec()))
}

#[tracing::instrument(skip(args), ret, err)]
pub(crate) fn native_cons(args: Vec<Expr>) -> Result<Expr, LispError> {
    trace!("Executing native function: cons");
    if args.len() != 2 {
        let msg = format!("cons expects 2 arguments, got {}", args.len());
        error!("{}", msg);
        return Err(LispError::ArityMismatch(msg));
    }

    match &args[1] {
        Expr::List(tail) => {
            let mut result = Vec::with_capacity(tail.len() + 1);
            result.push(args[0].clone());
            result.extend(tail.iter().cloned());
            Ok(Expr::List(result))
        }
        other => {
            let msg = format!("cons expects a list as its second argument, got {:?}", other);
            error!("{}", msg);
            Err(LispError::TypeError {
                expected: "List".to_string(),
                found: format!("{:?}", other),
            })
        }
    }
}

#[tracing::instrument(skip(args), ret, err)]
pub(crate) fn native_list(args: Vec<Expr>) -> Result<Expr, LispError> {
    trace!("Executing native function: list");
    Ok(Expr::List(args))
}

#[tracing::instrument(skip(args), ret, err)]
pub(crate) fn native_concat(args: Vec<Expr>) -> Result<Expr, LispError> {
    trace!("Executing native function: concat");
    let mut result = Vec::new();
    for arg in &args {
        match arg {
            Expr::List(list) => result.extend(list.iter().cloned()),
            other => {
                let msg = format!("concat expects list arguments, got {:?}", other);
                error!("{}", msg);
                return Err(LispError::TypeError {
                    expected: "List".to_string(),
                    found: format!("{:?}", other),
                });
            }
        }
    }
    Ok(Expr::List(result))
}

#[tracing::instrument(skip(args), ret, err)]
pub(crate) fn native_length(args: Vec<Expr>) -> Result<Expr, LispError> {
    trace!("Executing native function: length");
    let list = expect_single_list("length", &args)?;
    Ok(Expr::Number(list.len() as f64))
}

#[tracing::instrument(skip(args), ret, err)]
pub(crate) fn native_equal(args: Vec<Expr>) -> Result<Expr, LispError> {
    trace!("Executing native function: =");
    if args.len() != 2 {
        let msg = format!("= expects 2 arguments, got {}", args.len());
        error!("{}", msg);
        return Err(LispError::ArityMismatch(msg));
    }
    Ok(Expr::Bool(structural_eq(&args[0], &args[1])))
}

// Structural equality over atoms and lists. Values of different kinds
// compare unequal rather than erroring, and callables never compare
// equal to anything.
fn structural_eq(left: &Expr, right: &Expr) -> bool {
    match (left, right) {
        (Expr::Number(a), Expr::Number(b)) => a == b,
        (Expr::Symbol(a), Expr::Symbol(b)) => a == b,
        (Expr::String(a), Expr::String(b)) => a == b,
        (Expr::Bool(a), Expr::Bool(b)) => a == b,
        (Expr::List(a), Expr::List(b)) => {
            a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| structural_eq(x, y))
        }
        _ => false,
    }
}

fn expect_single_list<'a>(name: &str, args: &'a [Expr]) -> Result<&'a Vec<Expr>, LispError> {
    if args.len() != 1 {
        let msg = format!("{} expects 1 argument, got {}", name, args.len());
        error!("{}", msg);
        return Err(LispError::ArityMismatch(msg));
    }
    match &args[0] {
        Expr::List(list) => Ok(list),
        other => {
            let msg = format!("{} expects a list as argument, got {:?}", name, other);
            error!("{}", msg);
            Err(LispError::TypeError {
                expected: "List".to_string(),
                found: format!("{:?}", other),
            })
        }
    }
}
