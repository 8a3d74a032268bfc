use thiserror::Error;

/// Failures that end an analysis run
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("invalid streaming history format: {0}")]
    InvalidFormat(String),

    #[error("failed to start worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

/// Any failure talking to the catalog service or the lyrics provider.
///
/// These never end a run; the pipeline maps them to a degraded value.
#[derive(Debug, Error)]
pub enum CollaboratorError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("failed to read response body: {0}")]
    Io(#[from] std::io::Error),

    #[error("authentication failed: {0}")]
    Auth(String),
}

impl From<ureq::Error> for CollaboratorError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(code, _) => CollaboratorError::Status(code),
            ureq::Error::Transport(transport) => {
                CollaboratorError::Transport(transport.to_string())
            }
        }
    }
}

#[derive(Debug, Error)]
#[error("sentiment scoring failed: {0}")]
pub struct SentimentError(pub String);
