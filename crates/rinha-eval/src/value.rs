//! Runtime values.
//!
//! Lists in Rinha are nested pairs, so a tuple chain can be as deep as the
//! program's recursion. Rendering, comparing and dropping tuples therefore
//! walk the chain with an explicit work list instead of native recursion.

use crate::env::Environment;
use rinha_types::ast::{Function, Term};
use std::fmt;
use std::mem;
use std::rc::Rc;

/// A runtime value.
///
/// Values borrow function bodies from the term tree (`'ast`), so the tree
/// must outlive every value produced from it. Text and tuple payloads are
/// reference-counted: cloning a value is O(1).
#[derive(Debug, Clone)]
pub enum Value<'ast> {
    Int(i64),
    Bool(bool),
    Str(Rc<str>),
    Tuple(Rc<Pair<'ast>>),
    Closure(Closure<'ast>),
}

impl<'ast> Value<'ast> {
    pub fn text(text: impl Into<Rc<str>>) -> Self {
        Value::Str(text.into())
    }

    pub fn tuple(first: Value<'ast>, second: Value<'ast>) -> Self {
        Value::Tuple(Rc::new(Pair(first, second)))
    }

    /// Name of this value's kind, as used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "integer",
            Value::Bool(_) => "boolean",
            Value::Str(_) => "text",
            Value::Tuple(_) => "tuple",
            Value::Closure(_) => "closure",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// A tuple that nothing else shares, so dropping this value frees it.
    fn is_unique_tuple(&self) -> bool {
        matches!(self, Value::Tuple(pair) if Rc::strong_count(pair) == 1)
    }
}

/// Structural equality. Closures compare by identity.
impl PartialEq for Value<'_> {
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(self, other)];
        while let Some((a, b)) = pending.pop() {
            let equal = match (a, b) {
                (Value::Int(a), Value::Int(b)) => a == b,
                (Value::Bool(a), Value::Bool(b)) => a == b,
                (Value::Str(a), Value::Str(b)) => a == b,
                (Value::Tuple(a), Value::Tuple(b)) => {
                    if !Rc::ptr_eq(a, b) {
                        pending.push((&a.1, &b.1));
                        pending.push((&a.0, &b.0));
                    }
                    true
                }
                (Value::Closure(a), Value::Closure(b)) => a.ptr_eq(b),
                _ => false,
            };
            if !equal {
                return false;
            }
        }
        true
    }
}

enum Piece<'v, 'ast> {
    Value(&'v Value<'ast>),
    Text(&'static str),
}

/// Canonical rendering used by `print` and text concatenation.
impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut pending = vec![Piece::Value(self)];
        while let Some(piece) = pending.pop() {
            let value = match piece {
                Piece::Text(text) => {
                    f.write_str(text)?;
                    continue;
                }
                Piece::Value(value) => value,
            };
            match value {
                Value::Int(n) => write!(f, "{n}")?,
                Value::Bool(b) => write!(f, "{b}")?,
                Value::Str(s) => f.write_str(s)?,
                Value::Tuple(pair) => {
                    f.write_str("(")?;
                    pending.push(Piece::Text(")"));
                    pending.push(Piece::Value(&pair.1));
                    pending.push(Piece::Text(", "));
                    pending.push(Piece::Value(&pair.0));
                }
                Value::Closure(_) => f.write_str("<#closure>")?,
            }
        }
        Ok(())
    }
}

impl From<i64> for Value<'_> {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<bool> for Value<'_> {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value<'_> {
    fn from(s: &str) -> Self {
        Value::text(s)
    }
}

impl From<String> for Value<'_> {
    fn from(s: String) -> Self {
        Value::text(s)
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Tuples
// ══════════════════════════════════════════════════════════════════════════════

/// Payload of a tuple value: the first and second components.
#[derive(Debug)]
pub struct Pair<'ast>(pub Value<'ast>, pub Value<'ast>);

/// Unlinks uniquely owned nested pairs one at a time, so a long chain does
/// not free itself recursively.
impl Drop for Pair<'_> {
    fn drop(&mut self) {
        if !self.0.is_unique_tuple() && !self.1.is_unique_tuple() {
            return;
        }
        let mut pending = vec![take(&mut self.0), take(&mut self.1)];
        while let Some(value) = pending.pop() {
            if let Value::Tuple(pair) = value {
                if let Ok(mut pair) = Rc::try_unwrap(pair) {
                    pending.push(take(&mut pair.0));
                    pending.push(take(&mut pair.1));
                }
            }
        }
    }
}

fn take<'ast>(value: &mut Value<'ast>) -> Value<'ast> {
    mem::replace(value, Value::Bool(false))
}

// ══════════════════════════════════════════════════════════════════════════════
// Closures
// ══════════════════════════════════════════════════════════════════════════════

/// A function literal paired with the scope it was defined in.
#[derive(Clone)]
pub struct Closure<'ast> {
    function: &'ast Function,
    env: Environment<'ast>,
}

impl<'ast> Closure<'ast> {
    pub fn new(function: &'ast Function, env: Environment<'ast>) -> Self {
        Self { function, env }
    }

    pub fn function(&self) -> &'ast Function {
        self.function
    }

    pub fn body(&self) -> &'ast Term {
        &self.function.value
    }

    pub fn arity(&self) -> usize {
        self.function.arity()
    }

    /// Parameter names in declaration order.
    pub fn parameters(&self) -> impl Iterator<Item = &'ast str> + 'ast {
        self.function.parameters.iter().map(|p| p.text.as_str())
    }

    /// The captured (defining) environment.
    pub fn env(&self) -> &Environment<'ast> {
        &self.env
    }

    /// Identity: the same function literal closed over the same scope.
    pub fn ptr_eq(&self, other: &Closure<'ast>) -> bool {
        std::ptr::eq(self.function, other.function) && self.env.ptr_eq(&other.env)
    }
}

impl fmt::Debug for Closure<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Closure")
            .field("parameters", &self.parameters().collect::<Vec<_>>())
            .field("location", &self.function.location)
            .finish_non_exhaustive()
    }
}
