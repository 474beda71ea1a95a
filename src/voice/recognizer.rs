use super::command::CommandRecognizer;
use crate::config::VoiceConfig;
use crate::error::Result;
use tokio::sync::mpsc;
use tracing::info;

/// Settings for a single recognition pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionConfig {
    /// Keep listening after the first utterance
    pub continuous: bool,
    /// Emit partial hypotheses before the final result
    pub interim_results: bool,
    /// BCP-47 language tag
    pub language: String,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            continuous: false,
            interim_results: false,
            language: "en-US".to_string(),
        }
    }
}

/// Signal emitted by a recognizer during a pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionEvent {
    /// Final recognized text
    Result(String),
    /// Platform-reported failure; the pass is over
    Error(String),
    /// The pass finished, with or without a result
    End,
}

/// Speech-to-text capability
///
/// Implementations:
/// - `CommandRecognizer`: runs an external speech-to-text program
/// - test doubles that replay scripted events
#[async_trait::async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Begin a recognition pass
    ///
    /// Returns a channel receiver that will receive the pass's events.
    /// The channel closes when the pass is over.
    async fn start(&mut self, config: &RecognitionConfig) -> Result<mpsc::Receiver<RecognitionEvent>>;

    /// Abort the current pass, if any
    async fn stop(&mut self) -> Result<()>;

    /// Get recognizer name for logging
    fn name(&self) -> &str;
}

/// Whether speech recognition exists on this host
pub enum VoiceCapability {
    Available(Box<dyn SpeechRecognizer>),
    Unavailable,
}

impl VoiceCapability {
    /// Pick the recognizer described by the voice configuration
    pub fn from_config(config: &VoiceConfig) -> Self {
        match config.command.as_deref().map(str::trim) {
            Some(program) if !program.is_empty() => {
                info!("Voice input via external command: {}", program);
                VoiceCapability::Available(Box::new(CommandRecognizer::new(
                    program,
                    config.args.clone(),
                )))
            }
            _ => {
                info!("Voice input unavailable: no voice.command configured");
                VoiceCapability::Unavailable
            }
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, VoiceCapability::Available(_))
    }
}

impl std::fmt::Debug for VoiceCapability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VoiceCapability::Available(r) => write!(f, "Available({})", r.name()),
            VoiceCapability::Unavailable => f.write_str("Unavailable"),
        }
    }
}
