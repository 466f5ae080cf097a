//! Rendering run failures for humans and for tools.

use crate::error::CliError;
use clap::ValueEnum;
use rinha_types::{Location, SourceFile};
use serde_json::json;

/// How failures are written to stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ErrorFormat {
    #[default]
    Human,
    Json,
}

/// Render `err` in `format`. `source` is the original program text, used to
/// turn byte offsets into lines and columns.
pub fn render(err: &CliError, format: ErrorFormat, source: Option<&SourceFile>) -> String {
    match format {
        ErrorFormat::Human => render_human(err, source),
        ErrorFormat::Json => render_json(err),
    }
}

fn render_human(err: &CliError, source: Option<&SourceFile>) -> String {
    let CliError::Runtime(runtime) = err else {
        return format!("error: {err}");
    };

    let mut out = format!("error[{}]: {runtime}\n", runtime.kind());
    let location = runtime.location();
    match source.and_then(|file| excerpt(file, location)) {
        Some(excerpt) => {
            let line = excerpt.line;
            let gutter = " ".repeat(line.to_string().len());
            let indent = " ".repeat(excerpt.column as usize - 1);
            let carets = "^".repeat(excerpt.width);
            out.push_str(&format!(
                "{gutter}--> {}:{line}:{}\n",
                location.filename, excerpt.column
            ));
            out.push_str(&format!("{gutter} |\n"));
            out.push_str(&format!("{line} | {}\n", excerpt.text));
            out.push_str(&format!("{gutter} | {indent}{carets}\n"));
        }
        None => out.push_str(&format!(" --> {location}\n")),
    }
    if let Some(text) = runtime.full_text() {
        out.push_str(&format!("  = source: {text}\n"));
    }
    out.truncate(out.trim_end().len());
    out
}

/// The source line a location starts on, with the span to underline.
struct Excerpt<'a> {
    line: u32,
    column: u32,
    text: &'a str,
    /// Characters to underline, clipped to the first line.
    width: usize,
}

fn excerpt<'a>(file: &'a SourceFile, location: &Location) -> Option<Excerpt<'a>> {
    if location.start > file.source.len() {
        return None;
    }
    let (line, column) = file.position(location.start);
    let text = file.line(line)?;
    let width = file
        .snippet(location)
        .and_then(|covered| covered.lines().next())
        .map_or(location.len(), |first| first.chars().count());
    Some(Excerpt {
        line,
        column,
        text,
        width: width.max(1),
    })
}

fn render_json(err: &CliError) -> String {
    let value = match err {
        CliError::Runtime(runtime) => json!(runtime.diagnostic()),
        CliError::Load(_) => json!({ "kind": "LoadError", "message": err.to_string() }),
        CliError::Output(_) => json!({ "kind": "Output", "message": err.to_string() }),
    };
    value.to_string()
}
