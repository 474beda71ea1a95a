pub mod api;
pub mod client;
pub mod config;
pub mod console;
pub mod error;
pub mod session;
pub mod view;
pub mod voice;

pub use api::{HttpInterviewApi, InterviewApi, NextRequest, NextResponse, StartResponse};
pub use client::{ClientEvent, InterviewClient, Update};
pub use config::Config;
pub use console::Console;
pub use error::{ApiError, SessionError};
pub use session::{
    InterviewSession, Message, MessageKind, Persona, ResumeAttachment, RetryTarget, Role,
    SessionForm, SessionTimer, Stage, Transcript, TurnOutcome,
};
pub use view::TranscriptView;
pub use voice::{RecognitionConfig, SpeechRecognizer, VoiceCapability, VoiceInput};
