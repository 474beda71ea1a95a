use serde::{Deserialize, Serialize};

/// Response to `POST /api/start`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartResponse {
    pub session_id: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub persona: Option<String>,
    #[serde(default)]
    pub started_at: Option<String>, // ISO-8601, server clock
}

/// Body of `POST /api/next`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextRequest {
    pub session_id: String,
    pub user_text: String,
}

/// Response to `POST /api/next`
///
/// Every field is optional on the wire; a body with none of them set is
/// valid and produces no transcript change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextResponse {
    #[serde(default)]
    pub next_question: Option<String>,
    /// Direct answer to a question the candidate asked
    #[serde(default)]
    pub answer_text: Option<String>,
    #[serde(default)]
    pub feedback: Option<String>,
    #[serde(default)]
    pub end_session: bool,
    #[serde(default)]
    pub summary: Option<String>,
}

impl NextResponse {
    /// True when applying this response would not change the transcript
    pub fn is_empty(&self) -> bool {
        !self.end_session
            && self.next_question.is_none()
            && self.answer_text.is_none()
            && self.feedback.is_none()
    }
}

/// Response to `GET /api/health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}
