//! Rinha tree-walking evaluator.
//!
//! Executes a term tree loaded by `rinha-types` directly: closures capture
//! lexically scoped environments, `print` writes to an [`OutputSink`], and
//! every failure surfaces as a located [`RuntimeError`].
//!
//! ```no_run
//! use rinha_eval::{run_file, EvalOptions, StdoutSink, OutputSink};
//!
//! let file = rinha_types::read_file("fib.json")?;
//! let mut sink = StdoutSink::stdout();
//! run_file(&file, &mut sink, EvalOptions::default())?;
//! sink.flush()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod env;
pub mod error;
pub mod evaluator;
mod operators;
pub mod options;
pub mod output;
mod stack;
pub mod value;

pub use env::Environment;
pub use error::{Diagnostic, ErrorKind, EvalResult, RuntimeError};
pub use evaluator::{evaluate, run_file, Evaluator};
pub use options::{EvalOptions, DEFAULT_MAX_DEPTH};
pub use output::{BufferSink, NullSink, OutputSink, StdoutSink, WriterSink};
pub use stack::ensure_sufficient_stack;
pub use value::{Closure, Pair, Value};
