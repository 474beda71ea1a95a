use super::recognizer::{RecognitionConfig, RecognitionEvent, VoiceCapability};
use crate::error::{Result, SessionError};
use tokio::sync::mpsc;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VoiceState {
    #[default]
    Idle,
    Listening,
}

/// Result of folding a recognition event into the input buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceUpdate {
    /// The input buffer now holds the recognized text
    Transcribed,
    /// Recognition failed; the buffer is untouched
    Failed(String),
    /// The pass ended
    Ended,
}

/// Voice input toggle over an optional recognizer
pub struct VoiceInput {
    capability: VoiceCapability,
    config: RecognitionConfig,
    state: VoiceState,
    events: Option<mpsc::Receiver<RecognitionEvent>>,
}

impl VoiceInput {
    pub fn new(capability: VoiceCapability, config: RecognitionConfig) -> Self {
        Self {
            capability,
            config,
            state: VoiceState::Idle,
            events: None,
        }
    }

    pub fn is_supported(&self) -> bool {
        self.capability.is_available()
    }

    pub fn state(&self) -> VoiceState {
        self.state
    }

    pub fn is_listening(&self) -> bool {
        self.state == VoiceState::Listening
    }

    /// Start listening when idle, stop immediately when listening
    pub async fn toggle(&mut self) -> Result<VoiceState> {
        let recognizer = match &mut self.capability {
            VoiceCapability::Available(recognizer) => recognizer,
            VoiceCapability::Unavailable => return Err(SessionError::VoiceUnsupported),
        };

        match self.state {
            VoiceState::Listening => {
                recognizer.stop().await?;
                self.events = None;
                self.state = VoiceState::Idle;
                info!("Voice input cancelled");
            }
            VoiceState::Idle => {
                self.events = Some(recognizer.start(&self.config).await?);
                self.state = VoiceState::Listening;
            }
        }

        Ok(self.state)
    }

    /// Wait for the next event of the current pass; pends forever when idle
    pub async fn next_event(&mut self) -> RecognitionEvent {
        match self.events.as_mut() {
            Some(rx) => rx.recv().await.unwrap_or(RecognitionEvent::End),
            None => std::future::pending().await,
        }
    }

    /// Fold an event into the state machine and the input buffer
    pub fn apply(&mut self, event: RecognitionEvent, input: &mut String) -> VoiceUpdate {
        self.state = VoiceState::Idle;
        match event {
            RecognitionEvent::Result(text) => {
                *input = text;
                VoiceUpdate::Transcribed
            }
            RecognitionEvent::Error(e) => {
                error!("Speech recognition error: {}", e);
                VoiceUpdate::Failed(e)
            }
            RecognitionEvent::End => {
                self.events = None;
                VoiceUpdate::Ended
            }
        }
    }
}
