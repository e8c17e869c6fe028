use crate::engine::env::Environment;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Marker symbol that introduces the variadic tail of a parameter list.
pub const VARIADIC_MARKER: &str = "&rest";

/// Parameter list of a closure or macro: fixed names in order, plus an
/// optional tail name that collects all trailing arguments into one list.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamList {
    pub required: Vec<String>,
    pub rest: Option<String>,
}

impl fmt::Display for ParamList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = self.required.clone();
        if let Some(rest) = &self.rest {
            parts.push(VARIADIC_MARKER.to_string());
            parts.push(rest.clone());
        }
        write!(f, "({})", parts.join(" "))
    }
}

/// Shared shape of closures and macros. Which of the two an instance is
/// depends on the `Expr` variant wrapping it; the behavioral difference
/// (evaluated vs. unevaluated arguments, re-evaluation of the result)
/// lives entirely in the evaluator.
#[derive(Clone)]
pub struct LispFunction {
    pub params: ParamList,
    pub body: Vec<Expr>,
    pub closure: Rc<RefCell<Environment>>,
}

impl fmt::Debug for LispFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LispFunction")
            .field("params", &self.params)
            .field("body", &self.body)
            .field("closure", &"<captured_env>") // Avoid printing the whole env
            .finish()
    }
}

// Functions are equal if their parameters and body are structurally equal.
// The captured environment is not considered for this PartialEq.
impl PartialEq for LispFunction {
    fn eq(&self, other: &Self) -> bool {
        self.params == other.params && self.body == other.body
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Symbol(String),
    Number(f64),
    String(String),
    Bool(bool),
    List(Vec<Expr>),
    Function(LispFunction),
    Macro(LispFunction),
    NativeFunction(NativeFunction),
}

impl Expr {
    /// Short kind name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Expr::Symbol(_) => "symbol",
            Expr::Number(_) => "number",
            Expr::String(_) => "string",
            Expr::Bool(_) => "boolean",
            Expr::List(_) => "list",
            Expr::Function(_) => "function",
            Expr::Macro(_) => "macro",
            Expr::NativeFunction(_) => "native function",
        }
    }
}

// Values print in source syntax so that REPL output reads back as input.
// Callables have no source syntax and print as opaque #<...> handles.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Symbol(s) => write!(f, "{s}"),
            Expr::Number(n) => write!(f, "{n}"),
            Expr::String(s) => write!(f, "\"{s}\""),
            Expr::Bool(true) => write!(f, "true"),
            Expr::Bool(false) => write!(f, "false"),
            Expr::List(items) => {
                write!(f, "(")?;
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, ")")
            }
            Expr::Function(func) => write!(f, "#<function {}>", func.params),
            Expr::Macro(mac) => write!(f, "#<macro {}>", mac.params),
            Expr::NativeFunction(native) => write!(f, "#<native {}>", native.name),
        }
    }
}

/// Type alias for a native Rust function callable from the language.
/// It takes a Vec of already-evaluated Expr arguments and returns a Result.
pub type NativeFn = fn(Vec<Expr>) -> Result<Expr, crate::engine::eval::LispError>;

#[derive(Clone)]
pub struct NativeFunction {
    pub name: String, // For debugging and identification
    pub func: NativeFn,
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFunction")
            .field("name", &self.name)
            .field("func", &"<native_fn_ptr>")
            .finish()
    }
}

// NativeFunctions are considered equal if their names are the same; names
// are unique within the global environment.
impl PartialEq for NativeFunction {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}
