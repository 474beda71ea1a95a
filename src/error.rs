use thiserror::Error;

/// Failures talking to the interview backend
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid response body: {0}")]
    Decode(String),
}

/// Everything the session layer can refuse or fail with
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to start interview: {0}")]
    StartFailure(#[source] ApiError),

    #[error("failed to get next question: {0}")]
    TurnFailure(#[source] ApiError),

    #[error("speech recognition is not supported on this system")]
    VoiceUnsupported,

    #[error("speech recognition error: {0}")]
    VoiceRecognition(String),

    #[error("{0}")]
    Invalid(String),

    #[error("resume rejected: {0}")]
    Resume(String),

    #[error("a request is already in flight")]
    Busy,

    #[error("the interview has ended")]
    Ended,

    #[error("no interview in progress")]
    NotStarted,

    #[error("answer is empty")]
    EmptyAnswer,

    #[error("no unconfirmed answer to retry")]
    NothingToRetry,
}

impl SessionError {
    /// Text shown to the user when this error is surfaced as a notice
    pub fn notice(&self) -> String {
        match self {
            SessionError::StartFailure(_) => {
                "Failed to start interview. Please check your connection and try again.".to_string()
            }
            SessionError::TurnFailure(_) => {
                "Failed to communicate with server. Please try again.".to_string()
            }
            SessionError::VoiceUnsupported => {
                "Speech recognition is not supported on this system. Configure voice.command to enable it."
                    .to_string()
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T, E = SessionError> = std::result::Result<T, E>;
