//! Shared types for the Rinha evaluator.
//!
//! This crate defines the AST node types, source locations, and the loader
//! for the JSON AST documents the evaluator consumes.

mod span;
pub mod ast;
pub mod load;

pub use load::{parse_file, read_file, LoadError, LoadResult};
pub use span::{Location, SourceFile};
