pub mod command;
pub mod input;
pub mod recognizer;

pub use command::CommandRecognizer;
pub use input::{VoiceInput, VoiceState, VoiceUpdate};
pub use recognizer::{RecognitionConfig, RecognitionEvent, SpeechRecognizer, VoiceCapability};
