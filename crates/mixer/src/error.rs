use thiserror::Error;

/// Errors reported by a mute backend.
#[derive(Debug, Error)]
pub enum MuteError {
    /// The mixer program could not be started.
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The mixer program exited unsuccessfully.
    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },

    /// The mixer program did not finish in time.
    #[error("{program} timed out after {seconds}s")]
    Timeout { program: String, seconds: u64 },

    /// Backend unavailable.
    #[error("mixer unavailable: {0}")]
    Unavailable(String),
}
