//! Lexically scoped environments.
//!
//! An [`Environment`] is a persistent, reference-counted chain of scopes.
//! Binding never mutates an existing scope: it returns a new child scope
//! whose parent is the current one, so closures can hold on to the chain
//! that existed when they were created.

use crate::error::{EvalResult, RuntimeError};
use crate::value::{Closure, Value};
use rinha_types::ast::Function;
use rinha_types::Location;
use std::cell::OnceCell;
use std::fmt;
use std::rc::Rc;

/// What a scope slot holds once filled.
#[derive(Clone)]
enum Slot<'ast> {
    Value(Value<'ast>),
    /// A closure over the scope that owns this slot. Only the function is
    /// stored; the closure is rebuilt on lookup so the scope never holds a
    /// strong reference to itself.
    SelfClosure(&'ast Function),
}

/// A single scope level.
struct Scope<'ast> {
    bindings: Vec<(&'ast str, OnceCell<Slot<'ast>>)>,
    parent: Option<Rc<Scope<'ast>>>,
}

/// A chain of scopes, innermost first. Cloning is O(1).
#[derive(Clone, Default)]
pub struct Environment<'ast> {
    head: Option<Rc<Scope<'ast>>>,
}

impl<'ast> Environment<'ast> {
    /// The empty environment.
    pub fn new() -> Self {
        Self { head: None }
    }

    fn push(&self, bindings: Vec<(&'ast str, OnceCell<Slot<'ast>>)>) -> Self {
        Self {
            head: Some(Rc::new(Scope {
                bindings,
                parent: self.head.clone(),
            })),
        }
    }

    /// Extend with a single binding.
    pub fn bind(&self, name: &'ast str, value: Value<'ast>) -> Self {
        self.push(vec![(name, OnceCell::from(Slot::Value(value)))])
    }

    /// Extend with several bindings held in one scope.
    ///
    /// If a name repeats, the later binding wins.
    pub fn bind_all<I>(&self, bindings: I) -> Self
    where
        I: IntoIterator<Item = (&'ast str, Value<'ast>)>,
    {
        self.push(
            bindings
                .into_iter()
                .map(|(name, value)| (name, OnceCell::from(Slot::Value(value))))
                .collect(),
        )
    }

    /// Extend with a binding whose value may refer to the new scope itself.
    ///
    /// The slot for `name` exists (unfilled) while `build` runs, and is
    /// filled with its result before this returns. `build` must not look
    /// `name` up.
    pub fn bind_recursive<F>(&self, name: &'ast str, build: F) -> Self
    where
        F: FnOnce(&Environment<'ast>) -> Value<'ast>,
    {
        let env = self.push(vec![(name, OnceCell::new())]);
        let value = build(&env);

        let slot = match value {
            Value::Closure(closure) if closure.env().ptr_eq(&env) => {
                Slot::SelfClosure(closure.function())
            }
            other => Slot::Value(other),
        };
        if let Some(scope) = &env.head {
            let filled = scope.bindings[0].1.set(slot);
            debug_assert!(filled.is_ok(), "recursive slot filled twice");
        }
        env
    }

    /// Look a name up, innermost scope first.
    ///
    /// Returns `None` for names that are unbound, and for a recursive slot
    /// that has not been filled yet.
    pub fn get(&self, name: &str) -> Option<Value<'ast>> {
        let mut current = self.head.as_ref();
        while let Some(scope) = current {
            if let Some((_, cell)) = scope.bindings.iter().rev().find(|(n, _)| *n == name) {
                return match cell.get()? {
                    Slot::Value(value) => Some(value.clone()),
                    Slot::SelfClosure(function) => Some(Value::Closure(Closure::new(
                        *function,
                        Environment {
                            head: Some(Rc::clone(scope)),
                        },
                    ))),
                };
            }
            current = scope.parent.as_ref();
        }
        None
    }

    /// Look a name up, failing with `UndefinedVariable` at `location`.
    pub fn lookup(&self, name: &str, location: &Location) -> EvalResult<Value<'ast>> {
        self.get(name).ok_or_else(|| RuntimeError::UndefinedVariable {
            name: name.to_string(),
            location: location.clone(),
        })
    }

    /// Number of scopes in the chain.
    pub fn depth(&self) -> usize {
        self.scopes().count()
    }

    /// Whether both environments are the very same chain.
    pub fn ptr_eq(&self, other: &Environment<'ast>) -> bool {
        match (&self.head, &other.head) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }

    fn scopes(&self) -> impl Iterator<Item = &Scope<'ast>> {
        std::iter::successors(self.head.as_deref(), |scope| scope.parent.as_deref())
    }

    /// Every bound name, innermost scope first. Shadowed names repeat.
    pub fn names(&self) -> impl Iterator<Item = &'ast str> + '_ {
        self.scopes()
            .flat_map(|scope| scope.bindings.iter().rev().map(|(name, _)| *name))
    }
}

/// Releases the scopes this environment alone keeps alive one at a time, so
/// a long `let` chain is not freed recursively.
impl Drop for Environment<'_> {
    fn drop(&mut self) {
        let mut head = self.head.take();
        while let Some(scope) = head {
            head = match Rc::try_unwrap(scope) {
                Ok(mut scope) => scope.parent.take(),
                Err(_) => None,
            };
        }
    }
}

impl fmt::Debug for Environment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
