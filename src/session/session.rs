use super::form::SessionForm;
use super::transcript::{MessageKind, Transcript};
use crate::api::{NextRequest, NextResponse, StartResponse};
use crate::error::{ApiError, Result, SessionError};
use tracing::{debug, error, info, warn};

pub const COMPLETION_MESSAGE: &str = "🎉 Interview Complete! Thank you for your time today.";
pub const DEFAULT_SUMMARY: &str = "Interview completed. Thank you for participating!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stage {
    #[default]
    Setup,
    Interview,
}

/// Issued with a start request; its completion must hand it back
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartTicket {
    pub generation: u64,
}

/// Issued with a turn request; its completion must hand it back
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnTicket {
    pub generation: u64,
    pub request: NextRequest,
    /// Transcript index of the user answer this turn carries, if any
    pub message_index: Option<usize>,
}

/// What applying a turn completion did to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Messages were appended starting at this index
    Appended { from: usize },
    /// The interview is over; summary is available
    Ended,
    /// The server sent nothing to show
    NoOp,
    /// The completion belongs to an earlier session lifecycle
    Stale,
}

/// Request that `retry` would send again
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryTarget {
    /// The opening question never arrived
    OpeningQuestion,
    /// Transcript index of an answer that was not delivered
    Answer(usize),
}

/// Comparable view of the externally visible session state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub session_id: Option<String>,
    pub stage: Stage,
    pub ended: bool,
    pub loading: bool,
    pub summary: Option<String>,
    pub message_count: usize,
    pub elapsed_secs: u64,
}

/// Client-side interview state and turn lifecycle
///
/// Requests are not performed here. Each `begin_*`/`submit`/`retry` call
/// validates, updates local state and returns a ticket describing the
/// request to issue; the matching `apply_*` call takes the ticket back
/// together with the server result. Tickets carry the session generation
/// at issue time, so completions that arrive after a reset are dropped.
#[derive(Debug, Default)]
pub struct InterviewSession {
    form: SessionForm,
    session_id: Option<String>,
    stage: Stage,
    ended: bool,
    summary: Option<String>,
    loading: bool,
    transcript: Transcript,
    generation: u64,
    pending_retry: Option<RetryTarget>,
}

impl InterviewSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn form(&self) -> &SessionForm {
        &self.form
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn pending_retry(&self) -> Option<RetryTarget> {
        self.pending_retry
    }

    /// Whether a new answer would be accepted right now
    pub fn can_submit(&self) -> bool {
        self.stage == Stage::Interview && !self.ended && !self.loading
    }

    pub fn typing_indicator_visible(&self) -> bool {
        self.stage == Stage::Interview && self.loading && !self.ended
    }

    pub fn snapshot(&self, elapsed_secs: u64) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.session_id.clone(),
            stage: self.stage,
            ended: self.ended,
            loading: self.loading,
            summary: self.summary.clone(),
            message_count: self.transcript.len(),
            elapsed_secs,
        }
    }

    /// Validate the setup form and mark a start request as in flight
    pub fn begin_start(&mut self, form: SessionForm) -> Result<StartTicket> {
        if self.stage == Stage::Interview {
            return Err(SessionError::Invalid(
                "An interview is already in progress".to_string(),
            ));
        }
        if self.loading {
            return Err(SessionError::Busy);
        }
        form.validate()?;

        self.form = form;
        self.generation += 1;
        self.loading = true;

        Ok(StartTicket {
            generation: self.generation,
        })
    }

    /// Apply the start result; on success returns the opening-question turn
    pub fn apply_start(
        &mut self,
        ticket: StartTicket,
        result: std::result::Result<StartResponse, ApiError>,
    ) -> Result<Option<TurnTicket>> {
        if ticket.generation != self.generation || self.stage != Stage::Setup {
            debug!("Dropping stale start completion (gen {})", ticket.generation);
            return Ok(None);
        }
        self.loading = false;

        let started = match result {
            Ok(started) => started,
            Err(e) => {
                error!("Error starting interview: {}", e);
                return Err(SessionError::StartFailure(e));
            }
        };

        info!("Interview session {} started", started.session_id);
        self.session_id = Some(started.session_id.clone());
        self.stage = Stage::Interview;

        Ok(Some(self.issue_turn(started.session_id, String::new(), None)))
    }

    /// Append the answer optimistically and mark a turn request as in flight
    pub fn submit(&mut self, text: &str) -> Result<TurnTicket> {
        let session_id = self.ready_session()?;
        if text.trim().is_empty() {
            return Err(SessionError::EmptyAnswer);
        }

        let index = self.transcript.push(MessageKind::User, text);
        self.pending_retry = None;

        Ok(self.issue_turn(session_id, text.to_string(), Some(index)))
    }

    /// Resend the most recent failed turn; answers are not re-appended
    pub fn retry(&mut self) -> Result<TurnTicket> {
        let session_id = self.ready_session()?;
        match self.pending_retry.ok_or(SessionError::NothingToRetry)? {
            RetryTarget::OpeningQuestion => {
                info!("Requesting the opening question again");
                Ok(self.issue_turn(session_id, String::new(), None))
            }
            RetryTarget::Answer(index) => {
                let text = self
                    .transcript
                    .get(index)
                    .map(|m| m.text.clone())
                    .ok_or(SessionError::NothingToRetry)?;

                info!("Retrying unconfirmed answer #{}", index);
                Ok(self.issue_turn(session_id, text, Some(index)))
            }
        }
    }

    /// Apply a turn result to the transcript
    pub fn apply_turn(
        &mut self,
        ticket: TurnTicket,
        result: std::result::Result<NextResponse, ApiError>,
    ) -> Result<TurnOutcome> {
        if ticket.generation != self.generation
            || self.session_id.as_deref() != Some(ticket.request.session_id.as_str())
        {
            debug!(
                "Dropping stale turn completion (gen {}, current {})",
                ticket.generation, self.generation
            );
            return Ok(TurnOutcome::Stale);
        }
        self.loading = false;

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                error!("Error getting next question: {}", e);
                self.pending_retry = Some(match ticket.message_index {
                    Some(index) => {
                        self.transcript.mark_unconfirmed(index);
                        RetryTarget::Answer(index)
                    }
                    None => RetryTarget::OpeningQuestion,
                });
                return Err(SessionError::TurnFailure(e));
            }
        };

        // Turns are serialized, so a success settles whatever was pending
        self.pending_retry = None;
        if let Some(index) = ticket.message_index {
            self.transcript.confirm(index);
        }

        if response.is_empty() {
            warn!("Server returned no question, feedback or end marker; nothing to show");
            return Ok(TurnOutcome::NoOp);
        }

        let from = self.transcript.len();

        if let Some(feedback) = response.feedback {
            self.transcript.push(MessageKind::Feedback, feedback);
        }

        if response.end_session {
            self.transcript.push(MessageKind::Agent, COMPLETION_MESSAGE);
            self.summary = Some(
                response
                    .summary
                    .unwrap_or_else(|| DEFAULT_SUMMARY.to_string()),
            );
            self.ended = true;
            info!("Interview session ended after {} messages", self.transcript.len());
            return Ok(TurnOutcome::Ended);
        }

        if let Some(question) = response.next_question {
            self.transcript.push(MessageKind::Agent, question);
        } else if let Some(answer) = response.answer_text {
            self.transcript.push(MessageKind::Agent, answer);
        }

        Ok(TurnOutcome::Appended { from })
    }

    /// Back to setup; any in-flight completion becomes stale
    pub fn reset(&mut self) {
        let generation = self.generation + 1;
        let form = SessionForm {
            resume: None,
            ..std::mem::take(&mut self.form)
        };

        *self = Self {
            form,
            generation,
            ..Self::default()
        };
        info!("Interview session reset");
    }

    fn ready_session(&self) -> Result<String> {
        let session_id = match (&self.session_id, self.stage) {
            (Some(id), Stage::Interview) => id.clone(),
            _ => return Err(SessionError::NotStarted),
        };
        if self.ended {
            return Err(SessionError::Ended);
        }
        if self.loading {
            return Err(SessionError::Busy);
        }
        Ok(session_id)
    }

    fn issue_turn(
        &mut self,
        session_id: String,
        user_text: String,
        message_index: Option<usize>,
    ) -> TurnTicket {
        self.loading = true;
        TurnTicket {
            generation: self.generation,
            request: NextRequest {
                session_id,
                user_text,
            },
            message_index,
        }
    }
}
