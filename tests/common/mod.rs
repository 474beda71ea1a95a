// Shared test doubles for the interview backend

#![allow(dead_code)]

use mock_interview::api::{HealthResponse, InterviewApi, NextRequest, NextResponse, StartResponse};
use mock_interview::client::{ClientEvent, InterviewClient, Update};
use mock_interview::error::{ApiError, SessionError};
use mock_interview::session::{Persona, Role, SessionForm};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::mpsc;

/// Backend double that replays queued results and records every call
#[derive(Default)]
pub struct ScriptedApi {
    start_results: Mutex<VecDeque<Result<StartResponse, ApiError>>>,
    next_results: Mutex<VecDeque<Result<NextResponse, ApiError>>>,
    pub start_forms: Mutex<Vec<SessionForm>>,
    pub next_requests: Mutex<Vec<NextRequest>>,
    /// Artificial latency for each /api/next call
    pub next_delay: Option<Duration>,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            next_delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn push_start(&self, result: Result<StartResponse, ApiError>) {
        self.start_results.lock().unwrap().push_back(result);
    }

    pub fn push_next(&self, result: Result<NextResponse, ApiError>) {
        self.next_results.lock().unwrap().push_back(result);
    }

    pub fn start_count(&self) -> usize {
        self.start_forms.lock().unwrap().len()
    }

    pub fn next_count(&self) -> usize {
        self.next_requests.lock().unwrap().len()
    }

    pub fn next_texts(&self) -> Vec<String> {
        self.next_requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.user_text.clone())
            .collect()
    }
}

#[async_trait::async_trait]
impl InterviewApi for ScriptedApi {
    async fn start(&self, form: &SessionForm) -> Result<StartResponse, ApiError> {
        self.start_forms.lock().unwrap().push(form.clone());
        self.start_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(unscripted()))
    }

    async fn next(&self, request: &NextRequest) -> Result<NextResponse, ApiError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        self.next_requests.lock().unwrap().push(request.clone());

        if let Some(delay) = self.next_delay {
            tokio::time::sleep(delay).await;
        }

        let result = self
            .next_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(unscripted()));
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }

    async fn health(&self) -> Result<HealthResponse, ApiError> {
        Ok(HealthResponse {
            status: "healthy".to_string(),
        })
    }
}

fn unscripted() -> ApiError {
    ApiError::Status {
        status: 500,
        body: "no scripted response".to_string(),
    }
}

pub fn server_error() -> ApiError {
    ApiError::Status {
        status: 500,
        body: "LLM call failed".to_string(),
    }
}

pub fn started(session_id: &str) -> StartResponse {
    StartResponse {
        session_id: session_id.to_string(),
        role: None,
        persona: None,
        started_at: None,
    }
}

pub fn question(text: &str) -> NextResponse {
    NextResponse {
        next_question: Some(text.to_string()),
        ..Default::default()
    }
}

pub fn sales_form() -> SessionForm {
    SessionForm {
        role: Role::Sales,
        persona: Persona::Chatty,
        full_name: "Jordan Smith".to_string(),
        email: "jordan@example.com".to_string(),
        resume: None,
    }
}

/// Wait for the next request completion and apply it
pub async fn pump(
    client: &mut InterviewClient,
    events: &mut mpsc::Receiver<ClientEvent>,
) -> Result<Update, SessionError> {
    let event = tokio::time::timeout(Duration::from_secs(5), events.recv())
        .await
        .expect("timed out waiting for a request completion")
        .expect("event channel closed");
    client.apply(event)
}
