use thiserror::Error;

use crate::backend::BackendKind;

#[derive(Error, Debug)]
pub enum SerikitError {
    #[error("Encode error ({backend}): {message}")]
    Encode { backend: BackendKind, message: String },

    #[error("Deserialization error ({backend}): {message}")]
    Deserialization { backend: BackendKind, message: String },

    #[error("Operation cancelled ({backend})")]
    Cancelled { backend: BackendKind },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Not a JSON backend: {0}")]
    NotJsonBackend(BackendKind),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SerikitError>;

impl SerikitError {
    pub(crate) fn encode(backend: BackendKind, err: impl std::fmt::Display) -> Self {
        SerikitError::Encode {
            backend,
            message: err.to_string(),
        }
    }

    pub(crate) fn deserialization(backend: BackendKind, err: impl std::fmt::Display) -> Self {
        SerikitError::Deserialization {
            backend,
            message: err.to_string(),
        }
    }

    /// Returns `true` for a cooperative cancellation rather than a codec failure.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, SerikitError::Cancelled { .. })
    }
}

/// Maps a `SerikitError` to user-friendly CLI output with actionable suggestions.
pub fn handle_command_error(err: &SerikitError) {
    use crate::output;

    match err {
        SerikitError::Deserialization { backend, message } => {
            output::error(&format!("Could not read {} input: {}", backend, message));
            output::info("Check that the input matches the format given with --from.");
        }
        SerikitError::Encode { backend, message } => {
            output::error(&format!("Could not write {} output: {}", backend, message));
        }
        SerikitError::Cancelled { .. } => {
            output::warning("Conversion cancelled.");
        }
        SerikitError::Transport(msg) => {
            output::error(&format!("Invalid base64url text: {}", msg));
            output::info("Text transport uses the URL-safe alphabet (- and _).");
        }
        SerikitError::NotJsonBackend(kind) => {
            output::error(&format!("{} is not a JSON backend", kind));
            output::info("Use `tree` or `stream`.");
        }
        SerikitError::Config(msg) => {
            output::error(&format!("Configuration error: {}", msg));
            output::info("Check the SERIKIT_* environment variables.");
        }
        SerikitError::Io(e) => {
            output::error(&format!("File error: {}", e));
        }
    }
}
