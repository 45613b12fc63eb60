use serde::{Deserialize, Serialize};
use std::fmt;

/// Short classification label printed in front of every CLI diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    // Input files
    FileNotFound,
    MalformedEnvFile,
    BulkEnvUnsupported,
    MalformedCollection,
    MissingCollectionPath,
    ParsingError,
    InvalidFileType,
    InvalidDataFileType,

    // Command line
    UnknownCommand,
    InvalidArgument,
    UnknownError,
    SyntaxError,

    // Execution
    RequestError,
    TestScriptError,
    PreRequestScriptError,
    TestsFailing,

    // Remote instance
    TokenExpired,
    TokenInvalid,
    InvalidId,
    InvalidServerUrl,
    ServerConnectionRefused,

    // Output
    ReportExportFailed,
}

impl ErrorKind {
    pub const ALL: [Self; 22] = [
        Self::FileNotFound,
        Self::MalformedEnvFile,
        Self::BulkEnvUnsupported,
        Self::MalformedCollection,
        Self::MissingCollectionPath,
        Self::ParsingError,
        Self::InvalidFileType,
        Self::InvalidDataFileType,
        Self::UnknownCommand,
        Self::InvalidArgument,
        Self::UnknownError,
        Self::SyntaxError,
        Self::RequestError,
        Self::TestScriptError,
        Self::PreRequestScriptError,
        Self::TestsFailing,
        Self::TokenExpired,
        Self::TokenInvalid,
        Self::InvalidId,
        Self::InvalidServerUrl,
        Self::ServerConnectionRefused,
        Self::ReportExportFailed,
    ];

    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::FileNotFound => "FILE_NOT_FOUND",
            Self::MalformedEnvFile => "MALFORMED_ENV_FILE",
            Self::BulkEnvUnsupported => "BULK_ENV_UNSUPPORTED",
            Self::MalformedCollection => "MALFORMED_COLLECTION",
            Self::MissingCollectionPath => "MISSING_COLLECTION_PATH",
            Self::ParsingError => "PARSING_ERROR",
            Self::InvalidFileType => "INVALID_FILE_TYPE",
            Self::InvalidDataFileType => "INVALID_DATA_FILE_TYPE",
            Self::UnknownCommand => "UNKNOWN_COMMAND",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::UnknownError => "UNKNOWN_ERROR",
            Self::SyntaxError => "SYNTAX_ERROR",
            Self::RequestError => "REQUEST_ERROR",
            Self::TestScriptError => "TEST_SCRIPT_ERROR",
            Self::PreRequestScriptError => "PRE_REQUEST_SCRIPT_ERROR",
            Self::TestsFailing => "TESTS_FAILING",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::TokenInvalid => "TOKEN_INVALID",
            Self::InvalidId => "INVALID_ID",
            Self::InvalidServerUrl => "INVALID_SERVER_URL",
            Self::ServerConnectionRefused => "SERVER_CONNECTION_REFUSED",
            Self::ReportExportFailed => "REPORT_EXPORT_FAILED",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
