//! The core Lisp engine, including AST, parser, evaluator, environment, builtins, and special forms.

pub mod ast;
pub mod builtins;
pub mod env;
pub mod eval;
pub mod parser;
pub mod prelude;
pub mod special_forms;
