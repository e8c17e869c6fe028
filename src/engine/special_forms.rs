//! Defines special forms (keywords) for the evaluator.

// Constants for individual special form names, can be used for matching.
pub const QUOTE: &str = "quote";
pub const IF: &str = "if";
pub const DEF: &str = "def";
pub const FN: &str = "fn";
pub const MACRO: &str = "macro";

/// Array of special form names. These are reserved: they are dispatched
/// before symbol lookup and cannot be bound by `def` or a parameter list.
pub const SPECIAL_FORMS: &[&str] = &[QUOTE, IF, DEF, FN, MACRO];

/// Checks if a given name is a special form.
pub fn is_special_form(name: &str) -> bool {
    SPECIAL_FORMS.contains(&name)
}
