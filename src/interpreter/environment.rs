use std::{cell::RefCell, collections::HashMap, rc::Rc};

use crate::interpreter::value::core::Value;

/// A shared, mutable handle to an environment frame.
///
/// Closures that capture the same lexical frame hold clones of the same
/// handle, so a later `let` in that frame is visible to all of them.
pub type Env = Rc<RefCell<Environment>>;

/// A lexical environment frame used by the tree-walking evaluator.
///
/// Each frame maps names to values and optionally points at the frame of the
/// enclosing scope. Lookups walk outward; `let` writes only into the
/// innermost frame.
#[derive(Debug, Default)]
pub struct Environment {
    store: HashMap<String, Value>,
    outer: Option<Env>,
}

impl Environment {
    /// Creates a fresh top-level frame.
    #[must_use]
    pub fn new() -> Env {
        Rc::new(RefCell::new(Self::default()))
    }

    /// Creates a frame enclosed by `outer`, as when a function is applied.
    ///
    /// # Parameters
    /// - `outer`: The frame lookups fall back to; for a function call this
    ///   is the environment the function captured at construction, not the
    ///   caller's.
    #[must_use]
    pub fn new_enclosed(outer: Env) -> Env {
        Rc::new(RefCell::new(Self { store: HashMap::new(),
                                    outer: Some(outer) }))
    }

    /// Resolves a name, walking outward through enclosing frames.
    ///
    /// # Example
    /// ```
    /// use tensora::interpreter::{environment::Environment, value::core::Value};
    ///
    /// let global = Environment::new();
    /// global.borrow_mut().set("x".to_string(), Value::Integer(1));
    ///
    /// let local = Environment::new_enclosed(global);
    /// assert_eq!(local.borrow().get("x"), Some(Value::Integer(1)));
    /// assert_eq!(local.borrow().get("y"), None);
    /// ```
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Value> {
        self.store
            .get(name)
            .cloned()
            .or_else(|| self.outer.as_ref().and_then(|outer| outer.borrow().get(name)))
    }

    /// Binds a name in this frame, shadowing any outer binding of the same
    /// name. Assignment never writes through to an enclosing frame.
    pub fn set(&mut self, name: String, value: Value) {
        self.store.insert(name, value);
    }
}
