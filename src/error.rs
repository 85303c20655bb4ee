use std::process::ExitCode;

/// Errors that cause javlabot to exit with a specific code.
#[derive(Debug, thiserror::Error)]
pub enum ExitError {
    #[error("config error: {0}")]
    Config(String),

    #[error("could not connect to {addr}: {reason}")]
    Connect { addr: String, reason: String },

    #[error("{0}")]
    Other(String),
}

impl ExitError {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            ExitError::Config(_) => ExitCode::from(2),
            ExitError::Connect { .. } => ExitCode::from(3),
            ExitError::Other(_) => ExitCode::from(1),
        }
    }
}
