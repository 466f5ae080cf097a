//! `rinha`: run a program from its JSON AST.

mod diagnostics;
mod error;

use clap::Parser;
use diagnostics::ErrorFormat;
use error::CliError;
use rinha_eval::{run_file, EvalOptions, OutputSink, StdoutSink, DEFAULT_MAX_DEPTH};
use rinha_types::{load, SourceFile};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, warn};

/// Stack for the whole run: loading, evaluation and teardown (1 GiB, lazily
/// committed).
const RUN_STACK_SIZE: usize = 1024 * 1024 * 1024;

/// Rinha - run programs from their JSON AST
#[derive(Parser, Debug)]
#[command(name = "rinha", version, long_about = None)]
#[command(about = "Evaluate a Rinha program from its JSON AST")]
struct Args {
    /// JSON AST document to run ('-' reads from stdin)
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Maximum number of nested function calls
    #[arg(long, env = "RINHA_MAX_DEPTH", default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Maximum number of evaluation steps (unlimited if unset)
    #[arg(long, env = "RINHA_MAX_STEPS")]
    max_steps: Option<u64>,

    /// Allow <, >, <= and >= between two strings
    #[arg(long)]
    text_ordering: bool,

    /// How errors are reported on stderr
    #[arg(long, value_enum, default_value_t = ErrorFormat::Human)]
    error_format: ErrorFormat,

    /// Original program text, used to show lines and columns in errors
    #[arg(long, value_name = "PATH")]
    source: Option<PathBuf>,
}

impl Args {
    fn eval_options(&self) -> EvalOptions {
        EvalOptions::default()
            .with_max_depth(self.max_depth)
            .with_max_steps(self.max_steps)
            .with_text_ordering(self.text_ordering)
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging();

    match stacker::grow(RUN_STACK_SIZE, || run(&args)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let source = args.source.as_deref().and_then(read_source);
            let report = diagnostics::render(&err, args.error_format, source.as_ref());
            eprintln!("{report}");
            ExitCode::from(err.exit_code())
        }
    }
}

/// Log to stderr so program output on stdout stays clean.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    // RINHA_LOG, then RUST_LOG, then warnings only.
    let filter = EnvFilter::try_from_env("RINHA_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(args: &Args) -> Result<(), CliError> {
    let file = if args.file == Path::new("-") {
        load::from_reader(io::stdin().lock())?
    } else {
        load::read_file(&args.file)?
    };
    debug!(name = %file.name, "loaded program");

    let mut sink = StdoutSink::stdout();
    let result = run_file(&file, &mut sink, args.eval_options()).map(drop);
    // Output printed before a failure is still delivered.
    let flushed = sink.flush();
    result?;
    flushed.map_err(CliError::Output)
}

fn read_source(path: &Path) -> Option<SourceFile> {
    match std::fs::read_to_string(path) {
        Ok(text) => Some(SourceFile::new(path.display().to_string(), text)),
        Err(err) => {
            warn!(path = %path.display(), %err, "cannot read source file");
            None
        }
    }
}
