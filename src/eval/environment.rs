use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::Object;

/// A lexical scope: a name-to-value mapping plus an optional outer scope.
/// Shared behind `Rc<RefCell<_>>` so a closure can keep an arbitrary ancestor
/// scope alive after the frame that created it has returned, rather than
/// just the current call stack.
#[derive(Debug)]
pub struct Environment {
    store: HashMap<String, Object>,
    outer: Option<Rc<RefCell<Environment>>>,
}

impl Environment {
    pub fn new() -> Rc<RefCell<Environment>> {
        Rc::new(RefCell::new(Environment {
            store: HashMap::new(),
            outer: None,
        }))
    }

    pub fn new_enclosed(outer: Rc<RefCell<Environment>>) -> Rc<RefCell<Environment>> {
        Rc::new(RefCell::new(Environment {
            store: HashMap::new(),
            outer: Some(outer),
        }))
    }

    /// Walks outward through enclosing scopes until the name is found.
    pub fn get(&self, name: &str) -> Option<Object> {
        match self.store.get(name) {
            Some(value) => Some(value.clone()),
            None => self
                .outer
                .as_ref()
                .and_then(|outer| outer.borrow().get(name)),
        }
    }

    /// Binds in the current frame only; never reaches into an outer scope.
    pub fn set(&mut self, name: impl Into<String>, value: Object) {
        self.store.insert(name.into(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_walks_outward() {
        let outer = Environment::new();
        outer.borrow_mut().set("x", Object::Integer(5));
        let inner = Environment::new_enclosed(Rc::clone(&outer));
        assert!(matches!(inner.borrow().get("x"), Some(Object::Integer(5))));
    }

    #[test]
    fn set_never_escapes_to_outer() {
        let outer = Environment::new();
        let inner = Environment::new_enclosed(Rc::clone(&outer));
        inner.borrow_mut().set("x", Object::Integer(5));
        assert!(outer.borrow().get("x").is_none());
    }
}
