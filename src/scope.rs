use crate::error::RuntimeError;
use crate::value::Val;
use rustc_hash::FxHashMap;
use std::{cell::RefCell, rc::Rc};

/// One link of the scope chain. A child only borrows its parent, so scopes
/// are created and dropped in strict stack order with the blocks and calls
/// that own them.
#[derive(Debug, Default)]
pub struct Scope<'p> {
    stack: RefCell<FxHashMap<Rc<str>, Val>>,
    parent: Option<&'p Scope<'p>>,
}

impl<'p> Scope<'p> {
    pub fn new_child(parent: &'p Scope<'p>) -> Scope<'p> {
        Scope {
            stack: Default::default(),
            parent: Some(parent),
        }
    }

    pub fn try_get_here(&self, id: &str) -> Option<Val> {
        self.stack.borrow().get(id).cloned()
    }

    pub fn declare(&self, id: Rc<str>, val: Val) -> Result<(), RuntimeError> {
        let mut stack = self.stack.borrow_mut();
        if stack.contains_key(&id) {
            return Err(RuntimeError::AlreadyDeclared(id));
        }
        stack.insert(id, val);
        Ok(())
    }

    pub fn assign(&self, id: &str, val: Val) -> Result<(), RuntimeError> {
        let mut cur = Some(self);
        while let Some(scope) = cur {
            if let Some(slot) = scope.stack.borrow_mut().get_mut(id) {
                *slot = val;
                return Ok(());
            }
            cur = scope.parent;
        }
        Err(RuntimeError::Undeclared(id.into()))
    }

    pub fn get(&self, id: &str) -> Result<Val, RuntimeError> {
        let mut cur = Some(self);
        while let Some(scope) = cur {
            if let Some(val) = scope.try_get_here(id) {
                return Ok(val);
            }
            cur = scope.parent;
        }
        Err(RuntimeError::Undefined(id.into()))
    }

    pub fn depth(&self) -> usize {
        match self.parent {
            Some(parent) => 1 + parent.depth(),
            None => 1,
        }
    }
}
