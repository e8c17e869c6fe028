use crate::engine::ast::{Expr, NativeFn, NativeFunction};
use crate::engine::builtins::list::{
    native_concat, native_cons, native_equal, native_first, native_length, native_list,
    native_rest,
};
use crate::engine::builtins::math::{native_add, native_multiply, native_subtract};
use crate::engine::env::Environment;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::debug;

/// Populates the given environment with the built-in native functions.
///
/// Every native lives directly in the root frame as an ordinary binding.
/// The bootstrap prelude builds the rest of the standard vocabulary on
/// top of these.
pub fn populate_globals(env: &Rc<RefCell<Environment>>) {
    const NATIVES: &[(&str, NativeFn)] = &[
        ("first", native_first),
        ("rest", native_rest),
        ("cons", native_cons),
        ("list", native_list),
        ("concat", native_concat),
        ("length", native_length),
        ("=", native_equal),
        ("+", native_add),
        ("-", native_subtract),
        ("*", native_multiply),
    ];

    let mut root_env_borrowed = env.borrow_mut();
    for (name, func) in NATIVES {
        root_env_borrowed.define(
            name.to_string(),
            Expr::NativeFunction(NativeFunction {
                name: name.to_string(),
                func: *func,
            }),
        );
    }
    debug!(
        count = NATIVES.len(),
        "Installed native functions in root environment"
    );
}
