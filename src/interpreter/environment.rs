use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::value::Value;

/// Lexically scoped bindings: a local store plus an optional outer scope.
/// Environments are shared (`Rc`) because closures keep the scope they were
/// created in alive, and mutated through a `RefCell` because the evaluator
/// is single-threaded.
pub struct Environment {
    store: RefCell<HashMap<Rc<str>, Value>>,
    outer: Option<Rc<Environment>>,
}

impl Environment {
    pub fn new() -> Rc<Environment> {
        Rc::new(Environment {
            store: RefCell::new(HashMap::new()),
            outer: None,
        })
    }

    /// A fresh scope whose lookups fall back to `outer`.
    pub fn extend(outer: &Rc<Environment>) -> Rc<Environment> {
        Rc::new(Environment {
            store: RefCell::new(HashMap::new()),
            outer: Some(Rc::clone(outer)),
        })
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.store.borrow().get(name) {
            return Some(value.clone());
        }
        self.outer.as_ref().and_then(|outer| outer.get(name))
    }

    /// Assignment: if any enclosing scope already binds `name`, that binding
    /// is updated; otherwise the name is bound locally. This is what makes
    /// a loop counter updated inside the loop body visible outside it.
    pub fn set(&self, name: Rc<str>, value: Value) {
        if !self.update(&name, &value) {
            self.store.borrow_mut().insert(name, value);
        }
    }

    /// Always binds in the local store, shadowing any outer binding. Used
    /// for parameters, so a parameter named like an outer variable cannot
    /// clobber it.
    pub fn define(&self, name: Rc<str>, value: Value) {
        self.store.borrow_mut().insert(name, value);
    }

    fn update(&self, name: &str, value: &Value) -> bool {
        {
            let mut store = self.store.borrow_mut();
            if let Some(slot) = store.get_mut(name) {
                *slot = value.clone();
                return true;
            }
        }
        match &self.outer {
            Some(outer) => outer.update(name, value),
            None => false,
        }
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Values can reach this environment again through closures, so only
        // the binding names are printed.
        let names: Vec<Rc<str>> = self.store.borrow().keys().cloned().collect();
        f.debug_struct("Environment")
            .field("names", &names)
            .field("has_outer", &self.outer.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_set_get() {
        let env = Environment::new();
        env.set(Rc::from("x"), Value::Integer(42));
        assert_eq!(env.get("x"), Some(Value::Integer(42)));
        assert_eq!(env.get("y"), None);
    }

    #[test]
    fn get_falls_back_to_outer() {
        let outer = Environment::new();
        outer.set(Rc::from("x"), Value::Integer(1));
        let inner = Environment::extend(&outer);
        assert_eq!(inner.get("x"), Some(Value::Integer(1)));
    }

    #[test]
    fn set_updates_enclosing_binding() {
        let outer = Environment::new();
        outer.set(Rc::from("x"), Value::Integer(1));

        let inner = Environment::extend(&outer);
        inner.set(Rc::from("x"), Value::Integer(2));

        assert_eq!(outer.get("x"), Some(Value::Integer(2)));
        assert!(inner.store.borrow().is_empty());
    }

    #[test]
    fn set_binds_locally_when_unbound() {
        let outer = Environment::new();
        let inner = Environment::extend(&outer);
        inner.set(Rc::from("x"), Value::Integer(2));

        assert_eq!(inner.get("x"), Some(Value::Integer(2)));
        assert_eq!(outer.get("x"), None);
    }

    #[test]
    fn define_shadows_outer_binding() {
        let outer = Environment::new();
        outer.set(Rc::from("x"), Value::Integer(1));

        let inner = Environment::extend(&outer);
        inner.define(Rc::from("x"), Value::Integer(2));

        assert_eq!(inner.get("x"), Some(Value::Integer(2)));
        assert_eq!(outer.get("x"), Some(Value::Integer(1)));
    }
}
