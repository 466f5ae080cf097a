//! Runtime error types for the Rinha evaluator.

use rinha_types::ast::BinaryOp;
use rinha_types::Location;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Evaluation error. Every variant is fatal to the running program.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// A malformed fragment from the parser was reached.
    #[error("{message}")]
    Syntax {
        message: String,
        full_text: String,
        location: Location,
    },

    /// Name lookup exhausted every scope.
    #[error("unbound variable `{name}`")]
    UndefinedVariable { name: String, location: Location },

    /// An operand or callee of the wrong kind.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: String,
        location: Location,
    },

    /// Argument count differs from the closure's parameter count.
    #[error("wrong number of arguments: expected {expected}, got {got}")]
    ArityMismatch {
        expected: usize,
        got: usize,
        location: Location,
    },

    /// `/` or `%` with a zero divisor.
    #[error("division by zero")]
    DivisionByZero { location: Location },

    /// 64-bit integer overflow.
    #[error("integer overflow in `{op}`")]
    ArithmeticOverflow { op: BinaryOp, location: Location },

    /// Too many nested calls.
    #[error("recursion limit of {limit} nested calls exceeded")]
    RecursionLimitExceeded { limit: usize, location: Location },

    /// Step budget exhausted.
    #[error("step limit of {limit} exceeded")]
    StepLimitExceeded { limit: u64, location: Location },

    /// The output sink rejected a `print`.
    #[error("cannot write program output: {source}")]
    Output {
        #[source]
        source: std::io::Error,
        location: Location,
    },
}

/// Discriminant of a [`RuntimeError`], stable across message wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    SyntaxError,
    UndefinedVariable,
    TypeMismatch,
    ArityMismatch,
    DivisionByZero,
    ArithmeticOverflow,
    RecursionLimitExceeded,
    StepLimitExceeded,
    Output,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl RuntimeError {
    pub(crate) fn type_mismatch(
        expected: &'static str,
        found: impl Into<String>,
        location: &Location,
    ) -> Self {
        Self::TypeMismatch {
            expected,
            found: found.into(),
            location: location.clone(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Syntax { .. } => ErrorKind::SyntaxError,
            Self::UndefinedVariable { .. } => ErrorKind::UndefinedVariable,
            Self::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            Self::ArityMismatch { .. } => ErrorKind::ArityMismatch,
            Self::DivisionByZero { .. } => ErrorKind::DivisionByZero,
            Self::ArithmeticOverflow { .. } => ErrorKind::ArithmeticOverflow,
            Self::RecursionLimitExceeded { .. } => ErrorKind::RecursionLimitExceeded,
            Self::StepLimitExceeded { .. } => ErrorKind::StepLimitExceeded,
            Self::Output { .. } => ErrorKind::Output,
        }
    }

    /// The source location implicated by this error.
    pub fn location(&self) -> &Location {
        match self {
            Self::Syntax { location, .. }
            | Self::UndefinedVariable { location, .. }
            | Self::TypeMismatch { location, .. }
            | Self::ArityMismatch { location, .. }
            | Self::DivisionByZero { location }
            | Self::ArithmeticOverflow { location, .. }
            | Self::RecursionLimitExceeded { location, .. }
            | Self::StepLimitExceeded { location, .. }
            | Self::Output { location, .. } => location,
        }
    }

    /// The offending source text, when the error carries it.
    pub fn full_text(&self) -> Option<&str> {
        match self {
            Self::Syntax { full_text, .. } => Some(full_text),
            _ => None,
        }
    }

    /// Structured form for reporting.
    pub fn diagnostic(&self) -> Diagnostic {
        Diagnostic {
            kind: self.kind(),
            message: self.to_string(),
            full_text: self.full_text().map(str::to_string),
            location: self.location().clone(),
        }
    }
}

/// A serializable report of a [`RuntimeError`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_text: Option<String>,
    pub location: Location,
}

/// Result alias for evaluator operations.
pub type EvalResult<T> = Result<T, RuntimeError>;
