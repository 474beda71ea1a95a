//! Interview session state
//!
//! This module provides the `InterviewSession` abstraction that manages:
//! - The setup form (role, persona, contact details, optional resume)
//! - The turn lifecycle: start, question/answer exchange, end, summary
//! - The append-only transcript
//! - The one-second session clock

mod form;
mod resume;
mod session;
mod timer;
mod transcript;

pub use form::{Persona, Role, SessionForm};
pub use resume::ResumeAttachment;
pub use session::{
    InterviewSession, RetryTarget, SessionSnapshot, Stage, StartTicket, TurnOutcome, TurnTicket,
    COMPLETION_MESSAGE, DEFAULT_SUMMARY,
};
pub use timer::{format_clock, SessionTimer};
pub use transcript::{Message, MessageKind, Transcript};
