//! Loading the JSON AST document into a [`File`].
//!
//! Term trees nest once per `let`, so a long program is a deep JSON
//! document. serde_json's recursion limit is disabled and deserialization
//! runs on a dedicated, larger stack instead.

use crate::ast::File;
use serde::Deserialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Stack reserved for deserializing one document (256 MiB, lazily committed).
const LOAD_STACK_SIZE: usize = 256 * 1024 * 1024;

/// Errors raised while loading an AST document.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("cannot read `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not a valid AST.
    #[error("invalid AST document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Loader result type alias.
pub type LoadResult<T> = Result<T, LoadError>;

/// Parse an AST document held in memory.
pub fn parse_file(json: &str) -> LoadResult<File> {
    stacker::grow(LOAD_STACK_SIZE, || {
        let mut de = serde_json::Deserializer::from_str(json);
        de.disable_recursion_limit();
        let file = File::deserialize(&mut de)?;
        de.end()?;
        Ok(file)
    })
}

/// Read and parse an AST document from any reader.
pub fn from_reader<R: Read>(mut reader: R) -> LoadResult<File> {
    let mut json = String::new();
    reader
        .read_to_string(&mut json)
        .map_err(|source| LoadError::Io {
            path: PathBuf::from("<stdin>"),
            source,
        })?;
    parse_file(&json)
}

/// Read and parse an AST document from disk.
pub fn read_file(path: impl AsRef<Path>) -> LoadResult<File> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_file(&json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Term;

    #[test]
    fn test_parse_minimal_file() {
        let file = parse_file(
            r#"{
                "name": "one.rinha",
                "expression": {
                    "kind": "Int",
                    "value": 1,
                    "location": { "start": 0, "end": 1, "filename": "one.rinha" }
                },
                "location": { "start": 0, "end": 1, "filename": "one.rinha" }
            }"#,
        )
        .unwrap();
        assert_eq!(file.name, "one.rinha");
        match file.expression {
            Term::Int(int) => assert_eq!(int.value, 1),
            other => panic!("expected an integer, got {other:?}"),
        }
    }

    #[test]
    fn test_trailing_garbage_is_rejected() {
        let err = parse_file(
            r#"{"name":"x","expression":{"kind":"Bool","value":true,
                "location":{"start":0,"end":4,"filename":"x"}},
                "location":{"start":0,"end":4,"filename":"x"}} ]"#,
        )
        .unwrap_err();
        assert!(matches!(err, LoadError::Json(_)));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = read_file("/definitely/not/here.json").unwrap_err();
        match err {
            LoadError::Io { path, .. } => {
                assert_eq!(path, PathBuf::from("/definitely/not/here.json"))
            }
            other => panic!("expected Io error, got {other:?}"),
        }
    }
}
