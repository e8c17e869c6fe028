// Native functions grouped by concern, plus the special form evaluators.
pub mod globals;
pub mod list;
pub mod math;
pub mod special_forms;
