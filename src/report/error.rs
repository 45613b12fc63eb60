use super::detail::Cause;
use super::kind::ErrorKind;
use clap::error::{ContextKind, ContextValue};
use thiserror::Error;

/// Every failure the CLI can end with.
///
/// The `Display` output of a variant is the diagnostic message shown to the
/// user. An empty rendering means the failure has already been surfaced and
/// nothing more should be printed.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("File doesn't exist: {path}")]
    FileNotFound { path: String },

    #[error("Unavailable command: {command}")]
    UnknownCommand { command: String },

    #[error("The environment file is not of the correct format.")]
    MalformedEnvFile,

    #[error("Bulk environment export is not supported by the CLI.")]
    BulkEnvUnsupported,

    #[error("{path}\n{cause}")]
    MalformedCollection { path: String, cause: Cause },

    #[error("Please provide a collection file path.")]
    MissingCollectionPath,

    #[error("Unable to parse -\n{data}")]
    ParsingError { data: String },

    #[error("Please provide file of extension type .json: {data}")]
    InvalidFileType { data: String },

    #[error("Please provide file of extension type .csv: {data}")]
    InvalidDataFileType { data: String },

    #[error("{0}")]
    RequestError(Cause),

    #[error("{0}")]
    TestScriptError(Cause),

    #[error("{0}")]
    PreRequestScriptError(Cause),

    #[error("{}", unless_handled(.0))]
    InvalidArgument(Cause),

    #[error("{}", unless_handled(.0))]
    UnknownError(Cause),

    #[error("{}", unless_handled(.0))]
    SyntaxError(Cause),

    #[error("{0}")]
    TestsFailing(String),

    #[error("The specified access token is expired. Please provide a valid token: {data}")]
    TokenExpired { data: String },

    #[error("The specified access token is invalid. Please provide a valid token: {data}")]
    TokenInvalid { data: String },

    #[error(
        "The specified token or file path is invalid or inaccessible. \
         Please ensure the supplied ID or file path is correct: {data}"
    )]
    InvalidId { data: String },

    #[error("Please provide a valid server URL (http or https): {data}")]
    InvalidServerUrl { data: String },

    #[error(
        "Unable to connect to the server. Please check your network connection \
         or server URL and try again: {data}"
    )]
    ServerConnectionRefused { data: String },

    #[error("Failed to export the report at {path}{}", detail_suffix(.data))]
    ReportExportFailed { path: String, data: String },
}

/// Suppress payloads that are already-handled control flow, otherwise render a
/// cleaned-up nested message. Only handled signals may render empty.
fn unless_handled(cause: &Cause) -> String {
    if cause.is_handled_signal() {
        return String::new();
    }
    let message = cause.message();
    let normalized = normalize_message(&message);
    if !normalized.is_empty() {
        normalized
    } else if !message.trim().is_empty() {
        message.trim().to_string()
    } else {
        cause.dump()
    }
}

fn detail_suffix(data: &str) -> String {
    if data.is_empty() {
        String::new()
    } else {
        format!(": {data}")
    }
}

/// Drop a leading `error:` label and surrounding whitespace.
fn normalize_message(raw: &str) -> String {
    let trimmed = raw.trim();
    let without_label = match trimmed.get(..6) {
        Some(head) if head.eq_ignore_ascii_case("error:") => trimmed.get(6..).unwrap_or_default(),
        _ => trimmed,
    };
    without_label.trim().to_string()
}

impl CliError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::FileNotFound { .. } => ErrorKind::FileNotFound,
            Self::UnknownCommand { .. } => ErrorKind::UnknownCommand,
            Self::MalformedEnvFile => ErrorKind::MalformedEnvFile,
            Self::BulkEnvUnsupported => ErrorKind::BulkEnvUnsupported,
            Self::MalformedCollection { .. } => ErrorKind::MalformedCollection,
            Self::MissingCollectionPath => ErrorKind::MissingCollectionPath,
            Self::ParsingError { .. } => ErrorKind::ParsingError,
            Self::InvalidFileType { .. } => ErrorKind::InvalidFileType,
            Self::InvalidDataFileType { .. } => ErrorKind::InvalidDataFileType,
            Self::RequestError(_) => ErrorKind::RequestError,
            Self::TestScriptError(_) => ErrorKind::TestScriptError,
            Self::PreRequestScriptError(_) => ErrorKind::PreRequestScriptError,
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::UnknownError(_) => ErrorKind::UnknownError,
            Self::SyntaxError(_) => ErrorKind::SyntaxError,
            Self::TestsFailing(_) => ErrorKind::TestsFailing,
            Self::TokenExpired { .. } => ErrorKind::TokenExpired,
            Self::TokenInvalid { .. } => ErrorKind::TokenInvalid,
            Self::InvalidId { .. } => ErrorKind::InvalidId,
            Self::InvalidServerUrl { .. } => ErrorKind::InvalidServerUrl,
            Self::ServerConnectionRefused { .. } => ErrorKind::ServerConnectionRefused,
            Self::ReportExportFailed { .. } => ErrorKind::ReportExportFailed,
        }
    }

    pub fn unknown(cause: impl Into<Cause>) -> Self {
        Self::UnknownError(cause.into())
    }
}

/// Argument-parser failures: an unrecognised subcommand gets its own kind,
/// everything else (including help/version output) is an invalid argument.
impl From<clap::Error> for CliError {
    fn from(err: clap::Error) -> Self {
        if err.kind() == clap::error::ErrorKind::InvalidSubcommand {
            if let Some(ContextValue::String(command)) = err.get(ContextKind::InvalidSubcommand) {
                return Self::UnknownCommand {
                    command: command.clone(),
                };
            }
        }
        Self::InvalidArgument(Cause::from(err))
    }
}
