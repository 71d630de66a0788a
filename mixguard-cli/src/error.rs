//! CLI-specific error types and exit code mapping

use mixguard_core::error::MixguardError;

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-friendly message.
/// The `exit_code()` method maps errors to process exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// The run completed but some assertions failed.
    #[error("{failures} assertion(s) failed")]
    RunFailed { failures: usize },

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (file read, stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from mixguard-core.
    #[error("{0}")]
    Core(#[from] MixguardError),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                                  |
    /// |------|------------------------------------------|
    /// | 0    | Success                                  |
    /// | 1    | General / command error                  |
    /// | 2    | Configuration or suite error             |
    /// | 3    | Host setup failed or the run aborted     |
    /// | 4    | Run finished with failed assertions      |
    /// | 10   | IO error                                 |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::RunFailed { .. } => 4,
            Self::Io(_) => 10,
            Self::Core(e) => match e {
                MixguardError::Config(_) | MixguardError::Suite(_) => 2,
                MixguardError::Host(_) | MixguardError::Engine(_) => 3,
                MixguardError::Io(_) => 10,
            },
            Self::JsonSerialize(_) | Self::Command(_) => 1,
        }
    }
}
