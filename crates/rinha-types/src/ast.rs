//! AST node types for the Rinha language.
//!
//! Every node carries a [`Location`] for error reporting.
//! The serde layout matches the JSON AST produced by the reference parser:
//! terms are objects discriminated by a `kind` field.

use crate::Location;
use serde::{Deserialize, Serialize};
use std::fmt;

// ══════════════════════════════════════════════════════════════════════════════
// Top Level
// ══════════════════════════════════════════════════════════════════════════════

/// A complete Rinha program: a file name and a single root expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct File {
    pub name: String,
    pub expression: Term,
    pub location: Location,
}

// ══════════════════════════════════════════════════════════════════════════════
// Identifiers
// ══════════════════════════════════════════════════════════════════════════════

/// A located name: `let` binders, function parameters and variable
/// references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ident {
    pub text: String,
    pub location: Location,
}

impl Ident {
    pub fn new(text: impl Into<String>, location: Location) -> Self {
        Self {
            text: text.into(),
            location,
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Terms
// ══════════════════════════════════════════════════════════════════════════════

/// A node of the term tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Term {
    Int(Int),
    Str(Str),
    Bool(Bool),
    Var(Ident),
    Binary(Binary),
    If(If),
    Function(Function),
    Let(Let),
    Call(Call),
    Print(Print),
    Tuple(Tuple),
    First(Projection),
    Second(Projection),
    /// A region the parser already knew to be invalid.
    #[serde(rename = "Error")]
    Malformed(Malformed),
}

impl Term {
    pub fn location(&self) -> &Location {
        match self {
            Self::Int(int) => &int.location,
            Self::Str(str) => &str.location,
            Self::Bool(bool) => &bool.location,
            Self::Var(var) => &var.location,
            Self::Binary(binary) => &binary.location,
            Self::If(if_) => &if_.location,
            Self::Function(function) => &function.location,
            Self::Let(let_) => &let_.location,
            Self::Call(call) => &call.location,
            Self::Print(print) => &print.location,
            Self::Tuple(tuple) => &tuple.location,
            Self::First(projection) | Self::Second(projection) => &projection.location,
            Self::Malformed(malformed) => &malformed.location,
        }
    }

    /// The wire name of this term's kind, as found in the `kind` field.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "Int",
            Self::Str(_) => "Str",
            Self::Bool(_) => "Bool",
            Self::Var(_) => "Var",
            Self::Binary(_) => "Binary",
            Self::If(_) => "If",
            Self::Function(_) => "Function",
            Self::Let(_) => "Let",
            Self::Call(_) => "Call",
            Self::Print(_) => "Print",
            Self::Tuple(_) => "Tuple",
            Self::First(_) => "First",
            Self::Second(_) => "Second",
            Self::Malformed(_) => "Error",
        }
    }
}

// ── Literals ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Int {
    pub value: i64,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Str {
    pub value: String,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bool {
    pub value: bool,
    pub location: Location,
}

// ── Operators ────────────────────────────────────────────────────────────────

/// `lhs op rhs`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Binary {
    pub lhs: Box<Term>,
    pub op: BinaryOp,
    pub rhs: Box<Term>,
    pub location: Location,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    Neq,
    Lt,
    Gt,
    Lte,
    Gte,
    And,
    Or,
}

impl BinaryOp {
    /// Source-level spelling of the operator.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Rem => "%",
            Self::Eq => "==",
            Self::Neq => "!=",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::Lte => "<=",
            Self::Gte => ">=",
            Self::And => "&&",
            Self::Or => "||",
        }
    }

    /// `And`/`Or` evaluate their right operand lazily.
    pub fn is_short_circuit(self) -> bool {
        matches!(self, Self::And | Self::Or)
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

// ── Control Flow ─────────────────────────────────────────────────────────────

/// `if (condition) { then } else { otherwise }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct If {
    pub condition: Box<Term>,
    pub then: Box<Term>,
    pub otherwise: Box<Term>,
    pub location: Location,
}

/// `fn (parameters) => { value }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    pub parameters: Vec<Ident>,
    pub value: Box<Term>,
    pub location: Location,
}

impl Function {
    pub fn arity(&self) -> usize {
        self.parameters.len()
    }
}

/// `let name = value; next`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Let {
    pub name: Ident,
    pub value: Box<Term>,
    pub next: Box<Term>,
    pub location: Location,
}

/// `callee(arguments)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Call {
    pub callee: Box<Term>,
    pub arguments: Vec<Term>,
    pub location: Location,
}

// ── Builtins ─────────────────────────────────────────────────────────────────

/// `print(value)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Print {
    pub value: Box<Term>,
    pub location: Location,
}

/// `(first, second)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tuple {
    pub first: Box<Term>,
    pub second: Box<Term>,
    pub location: Location,
}

/// `first(value)` / `second(value)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub value: Box<Term>,
    pub location: Location,
}

/// A program fragment the parser rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Malformed {
    pub message: String,
    pub full_text: String,
    pub location: Location,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(start: usize, end: usize) -> Location {
        Location::new(start, end, "test.rinha")
    }

    #[test]
    fn test_location_of_projection() {
        let term = Term::Second(Projection {
            value: Box::new(Term::Int(Int {
                value: 1,
                location: loc(7, 8),
            })),
            location: loc(0, 9),
        });
        assert_eq!(term.location(), &loc(0, 9));
        assert_eq!(term.kind_name(), "Second");
    }

    #[test]
    fn test_binary_op_symbols() {
        assert_eq!(BinaryOp::Lte.to_string(), "<=");
        assert_eq!(BinaryOp::Rem.symbol(), "%");
        assert!(BinaryOp::Or.is_short_circuit());
        assert!(!BinaryOp::Eq.is_short_circuit());
    }

    #[test]
    fn test_malformed_kind_name() {
        let term = Term::Malformed(Malformed {
            message: "unexpected token".into(),
            full_text: "let = 1".into(),
            location: loc(0, 7),
        });
        assert_eq!(term.kind_name(), "Error");
    }
}
