use super::recognizer::{RecognitionConfig, RecognitionEvent, SpeechRecognizer};
use crate::error::{Result, SessionError};
use std::process::Stdio;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Environment variable carrying the requested language to the program
pub const LANGUAGE_ENV: &str = "MOCK_INTERVIEW_LANG";

/// Recognizer backed by an external speech-to-text program
///
/// The program is expected to record one utterance and print the final
/// transcription on stdout. A non-zero exit is reported as a recognition
/// error. Stopping a pass kills the program.
pub struct CommandRecognizer {
    program: String,
    args: Vec<String>,
    task: Option<JoinHandle<()>>,
}

impl CommandRecognizer {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            task: None,
        }
    }
}

#[async_trait::async_trait]
impl SpeechRecognizer for CommandRecognizer {
    async fn start(&mut self, config: &RecognitionConfig) -> Result<mpsc::Receiver<RecognitionEvent>> {
        self.stop().await?;

        if config.continuous || config.interim_results {
            warn!("{} only supports single final-result passes", self.program);
        }

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .env(LANGUAGE_ENV, &config.language)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                SessionError::VoiceRecognition(format!("failed to launch {}: {}", self.program, e))
            })?;

        info!("Listening via {} ({})", self.program, config.language);

        let (tx, rx) = mpsc::channel(4);
        let program = self.program.clone();

        self.task = Some(tokio::spawn(async move {
            let mut text = String::new();
            if let Some(mut stdout) = child.stdout.take() {
                if let Err(e) = stdout.read_to_string(&mut text).await {
                    let _ = tx.send(RecognitionEvent::Error(e.to_string())).await;
                    let _ = tx.send(RecognitionEvent::End).await;
                    return;
                }
            }

            match child.wait().await {
                Ok(status) if status.success() => {
                    let text = text.trim();
                    if text.is_empty() {
                        debug!("{} recognized no speech", program);
                    } else {
                        let _ = tx.send(RecognitionEvent::Result(text.to_string())).await;
                    }
                }
                Ok(status) => {
                    let _ = tx
                        .send(RecognitionEvent::Error(format!("{} exited with {}", program, status)))
                        .await;
                }
                Err(e) => {
                    let _ = tx.send(RecognitionEvent::Error(e.to_string())).await;
                }
            }

            let _ = tx.send(RecognitionEvent::End).await;
        }));

        Ok(rx)
    }

    async fn stop(&mut self) -> Result<()> {
        if let Some(task) = self.task.take() {
            // Dropping the child inside the task kills the program
            task.abort();
            debug!("Stopped recognition pass of {}", self.program);
        }
        Ok(())
    }

    fn name(&self) -> &str {
        &self.program
    }
}

impl Drop for CommandRecognizer {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
