//! Failures of a `rinha` invocation.

use rinha_eval::RuntimeError;
use rinha_types::LoadError;
use std::io;
use thiserror::Error;

/// Everything that can stop a run, mapped to an exit status.
#[derive(Debug, Error)]
pub enum CliError {
    /// The AST document could not be read or parsed.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// The program failed while running.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    /// Buffered program output could not be flushed.
    #[error("cannot write program output: {0}")]
    Output(#[source] io::Error),
}

impl CliError {
    /// `1` for program errors, `2` for failures of the runner itself.
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Runtime(_) => 1,
            CliError::Load(_) | CliError::Output(_) => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rinha_types::Location;

    #[test]
    fn test_exit_codes() {
        let runtime = CliError::from(RuntimeError::DivisionByZero {
            location: Location::new(0, 1, "a.rinha"),
        });
        assert_eq!(runtime.exit_code(), 1);

        let load = CliError::from(rinha_types::parse_file("{").unwrap_err());
        assert_eq!(load.exit_code(), 2);

        let output = CliError::Output(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
        assert_eq!(output.exit_code(), 2);
    }

    #[test]
    fn test_messages_pass_through() {
        let err = CliError::from(RuntimeError::DivisionByZero {
            location: Location::new(0, 1, "a.rinha"),
        });
        assert_eq!(err.to_string(), "division by zero");
    }
}
