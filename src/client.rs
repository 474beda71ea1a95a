use crate::api::{HealthResponse, InterviewApi, NextResponse, StartResponse};
use crate::error::{ApiError, Result};
use crate::session::{
    InterviewSession, SessionForm, SessionSnapshot, SessionTimer, StartTicket, TurnOutcome,
    TurnTicket,
};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::info;

const EVENT_BUFFER: usize = 16;

/// Completion of a request spawned by the client
#[derive(Debug)]
pub enum ClientEvent {
    Started {
        ticket: StartTicket,
        result: std::result::Result<StartResponse, ApiError>,
    },
    Turn {
        ticket: TurnTicket,
        result: std::result::Result<NextResponse, ApiError>,
    },
}

/// What applying a `ClientEvent` changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Update {
    /// Session created; the opening question has been requested
    Started,
    Turn(TurnOutcome),
    /// Completion from an earlier session lifecycle, ignored
    Stale,
}

/// Drives an `InterviewSession` against an `InterviewApi`
///
/// Requests run as spawned tasks and report back through the event channel
/// returned by `new`. The owner feeds each event into `apply`, which keeps
/// every state change on the owner's task.
pub struct InterviewClient {
    api: Arc<dyn InterviewApi>,
    session: InterviewSession,
    timer: SessionTimer,
    events_tx: mpsc::Sender<ClientEvent>,
}

impl InterviewClient {
    pub fn new(api: Arc<dyn InterviewApi>) -> (Self, mpsc::Receiver<ClientEvent>) {
        let (events_tx, events_rx) = mpsc::channel(EVENT_BUFFER);
        let client = Self {
            api,
            session: InterviewSession::new(),
            timer: SessionTimer::new(),
            events_tx,
        };
        (client, events_rx)
    }

    pub fn session(&self) -> &InterviewSession {
        &self.session
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.timer.elapsed_secs()
    }

    pub fn timer_running(&self) -> bool {
        self.timer.is_running()
    }

    /// Elapsed-seconds feed for redrawing the clock
    pub fn clock(&self) -> watch::Receiver<u64> {
        self.timer.subscribe()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.session.snapshot(self.timer.elapsed_secs())
    }

    /// Submit the setup form
    pub fn start(&mut self, form: SessionForm) -> Result<()> {
        let ticket = self.session.begin_start(form)?;
        let form = self.session.form().clone();
        let api = Arc::clone(&self.api);
        let events_tx = self.events_tx.clone();

        tokio::spawn(async move {
            let result = api.start(&form).await;
            Self::deliver(events_tx, ClientEvent::Started { ticket, result }).await;
        });

        Ok(())
    }

    /// Send an answer
    pub fn submit(&mut self, text: &str) -> Result<()> {
        let ticket = self.session.submit(text)?;
        self.dispatch_turn(ticket);
        Ok(())
    }

    /// Resend the last answer whose request failed
    pub fn retry(&mut self) -> Result<()> {
        let ticket = self.session.retry()?;
        self.dispatch_turn(ticket);
        Ok(())
    }

    /// Abandon the interview and return to setup
    pub fn reset(&mut self) {
        self.timer.reset();
        self.session.reset();
    }

    /// Fold a request completion into the session
    pub fn apply(&mut self, event: ClientEvent) -> Result<Update> {
        match event {
            ClientEvent::Started { ticket, result } => {
                match self.session.apply_start(ticket, result)? {
                    Some(first_turn) => {
                        self.timer.reset();
                        self.timer.start();
                        self.dispatch_turn(first_turn);
                        Ok(Update::Started)
                    }
                    None => Ok(Update::Stale),
                }
            }
            ClientEvent::Turn { ticket, result } => {
                let outcome = self.session.apply_turn(ticket, result)?;
                match outcome {
                    TurnOutcome::Stale => Ok(Update::Stale),
                    TurnOutcome::Ended => {
                        self.timer.stop();
                        Ok(Update::Turn(outcome))
                    }
                    _ => Ok(Update::Turn(outcome)),
                }
            }
        }
    }

    pub async fn health(&self) -> std::result::Result<HealthResponse, ApiError> {
        self.api.health().await
    }

    fn dispatch_turn(&self, ticket: TurnTicket) {
        let api = Arc::clone(&self.api);
        let events_tx = self.events_tx.clone();

        tokio::spawn(async move {
            let result = api.next(&ticket.request).await;
            Self::deliver(events_tx, ClientEvent::Turn { ticket, result }).await;
        });
    }

    async fn deliver(events_tx: mpsc::Sender<ClientEvent>, event: ClientEvent) {
        if events_tx.send(event).await.is_err() {
            // Owner is gone; nothing left to update
            info!("Dropping request completion: client closed");
        }
    }
}
