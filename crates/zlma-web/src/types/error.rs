//! Error types for validation, process invocation, configuration and serving.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use miette::Diagnostic;
use thiserror::Error;

/// A `vif` command or subcommand that is not on the allow-list.
///
/// The `Display` text is what the page shows to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum ValidationError {
    /// The command is not a key of the command table.
    #[error("Invalid command: {cmd}")]
    #[diagnostic(code(zlma_web::unknown_command))]
    UnknownCommand {
        /// The rejected command.
        cmd: String,
    },

    /// The subcommand is not allowed for an otherwise valid command.
    #[error("Invalid subcommand '{sub_cmd}' for command '{cmd}'")]
    #[diagnostic(code(zlma_web::unknown_subcommand))]
    UnknownSubcommand {
        /// The (valid) command.
        cmd: String,
        /// The rejected subcommand.
        sub_cmd: String,
    },
}

/// An external command could not be run to completion.
///
/// A command that runs and exits non-zero is not an error; see
/// [`crate::process::ProcessResult::success`].
#[derive(Debug, Error, Diagnostic)]
pub enum ProcessError {
    /// The executable does not exist.
    #[error("executable not found: {program}")]
    #[diagnostic(code(zlma_web::executable_not_found))]
    NotFound {
        /// Program path as given.
        program: String,
    },

    /// The executable exists but may not be run.
    #[error("permission denied running {program}")]
    #[diagnostic(code(zlma_web::permission_denied))]
    PermissionDenied {
        /// Program path as given.
        program: String,
    },

    /// Any other spawn or wait failure.
    #[error("failed to run {program}: {source}")]
    #[diagnostic(code(zlma_web::invocation_failed))]
    Io {
        /// Program path as given.
        program: String,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// The command outlived the configured timeout and was killed.
    #[error("{command} did not finish within {seconds}s and was killed")]
    #[diagnostic(
        code(zlma_web::timed_out),
        help("raise or remove [process] timeout_seconds in the configuration")
    )]
    TimedOut {
        /// Full command line.
        command: String,
        /// Configured limit.
        seconds: u64,
    },
}

impl ProcessError {
    /// Classify a spawn error by its OS error kind.
    pub fn from_io(program: &str, source: std::io::Error) -> Self {
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound {
                program: program.to_string(),
            },
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied {
                program: program.to_string(),
            },
            _ => Self::Io {
                program: program.to_string(),
                source,
            },
        }
    }
}

/// Configuration file could not be loaded.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// File could not be read.
    #[error("cannot read config file {path}")]
    #[diagnostic(code(zlma_web::config_read))]
    Read {
        /// Config path.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// File is not valid TOML for [`crate::ZlmaConfig`].
    #[error("invalid config file {path}")]
    #[diagnostic(code(zlma_web::config_parse))]
    Parse {
        /// Config path.
        path: String,
        /// TOML decoding error.
        #[source]
        source: toml::de::Error,
    },
}

/// Failure of the HTTP transport itself, outside any page.
///
/// Page-level failures are rendered into the page; this only covers the
/// blocking page task dying before it produced a response.
#[derive(Debug, Error)]
pub enum ServeError {
    /// The blocking task running the page panicked or was cancelled.
    #[error("page task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl IntoResponse for ServeError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Server error response");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(axum::http::header::CONTENT_TYPE, "text/html")],
            "<!DOCTYPE html>\n<html><body><h3>Internal server error</h3></body></html>\n",
        )
            .into_response()
    }
}
