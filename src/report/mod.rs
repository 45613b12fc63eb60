//! CLI failure classification and reporting.
//!
//! A command ends in at most one [`CliError`]. [`report`] turns it into a
//! single `CODE message` line on standard error, or stays silent when the
//! error renders to nothing (for example after `--help` output). The caller
//! picks the exit code from whether anything was reported.

pub mod detail;
pub mod error;
pub mod kind;

pub use detail::{extract_message, Cause, Detail};
pub use error::CliError;
pub use kind::ErrorKind;

use std::fmt;
use std::io::{self, Write};
use std::process::ExitCode;

/// A diagnostic ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: ErrorKind,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind.code(), self.message)
    }
}

/// Build the diagnostic for `error`, or `None` when there is nothing to say.
#[must_use]
pub fn diagnose(error: &CliError) -> Option<Diagnostic> {
    let message = error.to_string();
    if message.is_empty() {
        return None;
    }
    Some(Diagnostic {
        kind: error.kind(),
        message,
    })
}

/// Write the diagnostic line for `error` to `sink`.
///
/// Returns the message that was written, or `None` if nothing was.
pub fn report_to<W: Write>(error: &CliError, sink: &mut W) -> io::Result<Option<String>> {
    let Some(diagnostic) = diagnose(error) else {
        tracing::debug!(kind = %error.kind(), "CLI failure already surfaced; nothing to report");
        return Ok(None);
    };
    writeln!(sink, "{diagnostic}")?;
    Ok(Some(diagnostic.message))
}

/// Write the diagnostic line for `error` to standard error.
///
/// A failing stderr cannot be reported anywhere else, so write errors are
/// only logged; the message is still returned so the exit code reflects the
/// failure.
pub fn report(error: &CliError) -> Option<String> {
    match report_to(error, &mut io::stderr().lock()) {
        Ok(message) => message,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to write diagnostic to stderr");
            diagnose(error).map(|diagnostic| diagnostic.message)
        }
    }
}

/// Conventional process status: 1 once a diagnostic was emitted, else 0.
#[must_use]
pub fn exit_status(reported: Option<&str>) -> u8 {
    u8::from(reported.is_some())
}

#[must_use]
pub fn exit_code(reported: Option<&str>) -> ExitCode {
    ExitCode::from(exit_status(reported))
}
