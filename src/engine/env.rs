use crate::engine::ast::Expr;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use tracing::{debug, trace};

#[derive(Debug, PartialEq)]
pub struct Environment {
    bindings: HashMap<String, Expr>,
    outer: Option<Rc<RefCell<Environment>>>,
}

impl Environment {
    /// Creates a new, empty root environment. The root frame is where
    /// top-level `def` bindings land; see [`Environment::define_global`].
    pub fn new() -> Rc<RefCell<Self>> {
        debug!("Creating new empty root environment");
        Rc::new(RefCell::new(Environment {
            bindings: HashMap::new(),
            outer: None,
        }))
    }

    /// Creates a new environment that is enclosed by an outer environment.
    /// One of these is created per closure/macro application to hold the
    /// parameter bindings.
    pub fn new_enclosed(outer_env: Rc<RefCell<Environment>>) -> Rc<RefCell<Self>> {
        debug!("Creating new enclosed environment");
        Rc::new(RefCell::new(Environment {
            bindings: HashMap::new(),
            outer: Some(outer_env),
        }))
    }

    /// Defines a new variable or redefines an existing one in the current
    /// frame, never in an ancestor.
    pub fn define(&mut self, name: String, value: Expr) {
        trace!(name = %name, value = ?value, "Defining variable in current environment");
        self.bindings.insert(name, value);
    }

    /// Defines a variable in the root frame, regardless of how deeply this
    /// frame is nested. Top-level `def` semantics: a `def` evaluated inside
    /// a function body still produces a global binding.
    pub fn define_global(&mut self, name: String, value: Expr) {
        match &self.outer {
            Some(outer_env) => {
                trace!(name = %name, "Walking toward root environment for global definition");
                outer_env.borrow_mut().define_global(name, value);
            }
            None => {
                trace!(name = %name, value = ?value, "Defining variable in root environment");
                self.bindings.insert(name, value);
            }
        }
    }

    /// Attempts to retrieve a variable's value from the environment.
    /// If not found in the current frame, it searches outer frames.
    pub fn get(&self, name: &str) -> Option<Expr> {
        trace!(name = %name, "Attempting to get variable from environment");
        if let Some(value) = self.bindings.get(name) {
            debug!(name = %name, value = ?value, "Found variable in current environment");
            Some(value.clone())
        } else {
            match &self.outer {
                Some(outer_env) => {
                    trace!(name = %name, "Variable not in current environment, checking outer environment");
                    outer_env.borrow().get(name)
                }
                None => {
                    debug!(name = %name, "Variable not found in any environment");
                    None
                }
            }
        }
    }
}
