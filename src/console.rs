//! Line-oriented terminal front end
//!
//! Multiplexes four event sources on one task:
//! - lines typed by the candidate (answers and `/commands`)
//! - request completions from the `InterviewClient`
//! - voice recognition events
//! - session clock ticks

use crate::client::{ClientEvent, InterviewClient, Update};
use crate::error::SessionError;
use crate::session::{RetryTarget, SessionForm, Stage, TurnOutcome};
use crate::view::TranscriptView;
use crate::voice::{VoiceInput, VoiceState, VoiceUpdate};
use anyhow::{Context, Result};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

const HELP: &str = "\
Type your answer and press Enter to send it.
  /voice   start or stop voice input
  /send    send the text captured by voice input
  /retry   resend an answer that failed to reach the server
  /status  show interviewer, role and elapsed time
  /transcript  show the whole conversation so far
  /end     end the interview and return to setup
  /quit    exit";

/// The clock is printed each time it crosses a multiple of this
const CLOCK_ANNOUNCE_SECS: u64 = 60;

/// What the loop should do after handling a line
enum Flow {
    Continue,
    Quit,
}

pub struct Console<W: Write> {
    client: InterviewClient,
    events: mpsc::Receiver<ClientEvent>,
    voice: VoiceInput,
    view: TranscriptView,
    clock: watch::Receiver<u64>,
    input: String,
    out: W,
}

impl<W: Write> Console<W> {
    pub fn new(
        client: InterviewClient,
        events: mpsc::Receiver<ClientEvent>,
        voice: VoiceInput,
        view: TranscriptView,
        out: W,
    ) -> Self {
        let clock = client.clock();
        Self {
            client,
            events,
            voice,
            view,
            clock,
            input: String::new(),
            out,
        }
    }

    pub fn client(&self) -> &InterviewClient {
        &self.client
    }

    /// Fill missing form fields from `reader`, start the interview and run
    /// until `/quit` or end of input
    pub async fn run<R>(&mut self, form: SessionForm, reader: R) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = reader.lines();

        self.say(&self.view.setup_banner())?;
        let form = match self.complete_form(form, &mut lines).await? {
            Some(form) => form,
            None => return Ok(()),
        };
        self.begin(form)?;

        loop {
            tokio::select! {
                Some(event) = self.events.recv() => self.on_client_event(event)?,
                event = self.voice.next_event() => {
                    let update = self.voice.apply(event, &mut self.input);
                    self.on_voice_update(update)?;
                }
                Ok(()) = self.clock.changed() => self.on_tick()?,
                line = lines.next_line() => {
                    let line = line.context("Failed to read input")?;
                    match line {
                        Some(line) => {
                            if let Flow::Quit = self.on_line(line.trim_end()).await? {
                                break;
                            }
                        }
                        None => break,
                    }
                }
            }
        }

        if self.voice.is_listening() {
            let _ = self.voice.toggle().await;
        }
        info!("Console closed");
        Ok(())
    }

    async fn complete_form<R>(
        &mut self,
        mut form: SessionForm,
        lines: &mut Lines<R>,
    ) -> Result<Option<SessionForm>>
    where
        R: AsyncBufRead + Unpin,
    {
        self.say(&format!(
            "👔 Position: {}\n👤 Interviewer style: {}",
            form.role, form.persona
        ))?;

        while form.full_name.trim().is_empty() {
            match self.prompt("🧑 Full name: ", lines).await? {
                Some(name) => form.full_name = name,
                None => return Ok(None),
            }
        }

        loop {
            if !form.email.trim().is_empty() {
                match form.validate() {
                    Ok(()) => break,
                    Err(e) => self.notice(&e.notice())?,
                }
            }
            match self.prompt("📧 Email: ", lines).await? {
                Some(email) => form.email = email,
                None => return Ok(None),
            }
        }

        if let Some(resume) = &form.resume {
            self.say(&format!("📄 Resume: {}", resume.filename))?;
        }

        Ok(Some(form))
    }

    async fn prompt<R>(&mut self, label: &str, lines: &mut Lines<R>) -> Result<Option<String>>
    where
        R: AsyncBufRead + Unpin,
    {
        write!(self.out, "{}", label)?;
        self.out.flush()?;
        let line = lines.next_line().await.context("Failed to read input")?;
        Ok(line.map(|l| l.trim().to_string()))
    }

    fn begin(&mut self, form: SessionForm) -> Result<()> {
        match self.client.start(form) {
            Ok(()) => self.say("🎯 Starting Interview..."),
            Err(e) => self.notice(&e.notice()),
        }
    }

    fn on_client_event(&mut self, event: ClientEvent) -> Result<()> {
        match self.client.apply(event) {
            Ok(Update::Started) => {
                let session = self.client.session();
                let header = self.view.header(session.form().role, self.client.elapsed_secs());
                let notice = TranscriptView::start_notice(chrono::Local::now().date_naive());
                self.say(&header)?;
                self.say(&notice)?;
                self.say("Type /help for commands.")?;
            }
            Ok(Update::Turn(outcome)) => {
                self.flush_transcript()?;
                if outcome == TurnOutcome::Ended {
                    let panel = self
                        .view
                        .summary_panel(self.client.session(), self.client.elapsed_secs());
                    if let Some(panel) = panel {
                        self.say(&panel)?;
                    }
                    self.say("Type /end to start a new interview or /quit to exit.")?;
                }
            }
            Ok(Update::Stale) => debug!("Ignored completion from a previous session"),
            Err(e @ SessionError::StartFailure(_)) => {
                self.notice(&e.notice())?;
                self.say("Press Enter to try again or /quit to exit.")?;
            }
            Err(e @ SessionError::TurnFailure(_)) => {
                self.notice(&e.notice())?;
                match self.client.session().pending_retry() {
                    Some(RetryTarget::OpeningQuestion) => {
                        self.say("The first question did not arrive. Type /retry to request it again.")?;
                    }
                    Some(RetryTarget::Answer(index)) => {
                        if let Some(line) = self.view.render_entry(self.client.session(), index) {
                            self.say(&line)?;
                        }
                        self.say("Your answer was not delivered. Type /retry to resend it.")?;
                    }
                    None => {}
                }
            }
            Err(e) => self.notice(&e.notice())?,
        }

        if let Some(typing) = self.view.typing_indicator(self.client.session()) {
            self.say(&typing)?;
        }
        Ok(())
    }

    fn on_tick(&mut self) -> Result<()> {
        let secs = *self.clock.borrow_and_update();
        let session = self.client.session();
        if secs == 0
            || secs % CLOCK_ANNOUNCE_SECS != 0
            || session.stage() != Stage::Interview
            || session.is_ended()
        {
            return Ok(());
        }

        let header = self.view.header(session.form().role, secs);
        self.say(&header)
    }

    fn on_voice_update(&mut self, update: VoiceUpdate) -> Result<()> {
        match update {
            VoiceUpdate::Transcribed => self.say(&format!(
                "🎤 {}\n(Enter /send to submit it, or type a new answer)",
                self.input
            )),
            VoiceUpdate::Failed(_) => self.say("🎤 Voice input stopped."),
            VoiceUpdate::Ended => Ok(()),
        }
    }

    async fn on_line(&mut self, line: &str) -> Result<Flow> {
        let command = line.trim();
        match command {
            "/quit" => return Ok(Flow::Quit),
            "/help" => self.say(HELP)?,
            "/status" => {
                let session = self.client.session();
                let header = self.view.header(session.form().role, self.client.elapsed_secs());
                let undelivered = session.transcript().unconfirmed_count();
                self.say(&header)?;
                if undelivered > 0 {
                    self.say(&format!(
                        "{} answer(s) not delivered; type /transcript to see them",
                        undelivered
                    ))?;
                }
            }
            "/transcript" => {
                let lines = self.view.render_all(self.client.session());
                for line in lines {
                    writeln!(self.out, "{}", line)?;
                }
                self.out.flush()?;
            }
            "/end" => self.end_interview().await?,
            "/voice" => self.toggle_voice().await?,
            "/retry" => {
                let result = self.client.retry();
                self.after_request(result)?;
            }
            "/send" => {
                let text = std::mem::take(&mut self.input);
                self.send(&text)?;
            }
            "" | "/start" if self.client.session().stage() == Stage::Setup => {
                let form = self.client.session().form().clone();
                self.begin(form)?;
            }
            _ if command.starts_with('/') => {
                self.notice(&format!("Unknown command {}. Type /help for commands.", command))?;
            }
            _ if self.client.session().stage() == Stage::Setup => {}
            "" => {}
            _ => {
                self.input.clear();
                self.send(line)?;
            }
        }
        Ok(Flow::Continue)
    }

    fn send(&mut self, text: &str) -> Result<()> {
        let result = self.client.submit(text);
        self.after_request(result)
    }

    fn after_request(&mut self, result: std::result::Result<(), SessionError>) -> Result<()> {
        match result {
            Ok(()) => {
                self.flush_transcript()?;
                if let Some(typing) = self.view.typing_indicator(self.client.session()) {
                    self.say(&typing)?;
                }
                Ok(())
            }
            Err(SessionError::Busy) => {
                self.notice("Please wait for the interviewer to respond.")
            }
            Err(SessionError::Ended) => {
                self.notice("The interview has ended. Type /end to start a new one.")
            }
            Err(e) => self.notice(&e.notice()),
        }
    }

    async fn toggle_voice(&mut self) -> Result<()> {
        if self.client.session().stage() != Stage::Interview {
            return self.notice("Voice input is available once the interview has started.");
        }
        if self.client.session().is_loading() {
            return self.notice("Please wait for the interviewer to respond.");
        }
        match self.voice.toggle().await {
            Ok(VoiceState::Listening) => self.say("🎤 Listening..."),
            Ok(VoiceState::Idle) => self.say("🎤 Voice input stopped."),
            Err(e) => self.notice(&e.notice()),
        }
    }

    async fn end_interview(&mut self) -> Result<()> {
        if self.voice.is_listening() {
            let _ = self.voice.toggle().await;
        }
        self.client.reset();
        self.view.clear();
        self.input.clear();
        self.say(&self.view.setup_banner())?;
        self.say("Press Enter to begin a new interview with the same details, or /quit to exit.")
    }

    fn flush_transcript(&mut self) -> Result<()> {
        for line in self.view.take_new(self.client.session()) {
            writeln!(self.out, "{}", line)?;
        }
        self.out.flush()?;
        Ok(())
    }

    fn say(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "{}", text)?;
        self.out.flush()?;
        Ok(())
    }

    fn notice(&mut self, text: &str) -> Result<()> {
        self.say(&format!("⚠️  {}", text))
    }
}
