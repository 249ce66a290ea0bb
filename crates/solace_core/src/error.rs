use thiserror::Error;

/// Failure kinds at the engine boundary.
///
/// Only `EmptyConversation` ever reaches a caller. The backend variants are
/// recovered inside the engine and exist so the recovery path can log them.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no conversation turns supplied")]
    EmptyConversation,

    #[error("generative backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("generative backend misconfigured: {0}")]
    MisconfiguredBackend(String),
}
