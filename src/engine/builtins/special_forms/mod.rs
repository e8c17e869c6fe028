// Declare modules for each special form
pub mod def_form;
pub mod fn_form;
pub mod if_form;
pub mod macro_form;
pub mod quote_form;

// Re-export public evaluation functions
pub use def_form::eval_def;
pub use fn_form::eval_fn;
pub use if_form::eval_if;
pub use macro_form::eval_macro;
pub use quote_form::eval_quote;
