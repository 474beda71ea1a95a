//! Plain-text rendering of the interview screen
//!
//! The view owns no session state. It remembers how many transcript entries
//! it has already emitted so each redraw only yields the newest ones.

use crate::session::{format_clock, InterviewSession, Message, MessageKind, Role, Stage};
use chrono::NaiveDate;
use rand::seq::SliceRandom;

pub const TYPING_INDICATOR: &str = "• • •";
const UNDELIVERED_MARKER: &str = "  (not delivered)";
const FALLBACK_INTERVIEWER: &str = "Interviewer";

pub struct TranscriptView {
    company_name: String,
    interviewer_name: String,
    rendered: usize,
}

impl TranscriptView {
    pub fn new(company_name: impl Into<String>, interviewer_name: impl Into<String>) -> Self {
        Self {
            company_name: company_name.into(),
            interviewer_name: interviewer_name.into(),
            rendered: 0,
        }
    }

    /// Use a random interviewer from `names`
    pub fn with_random_interviewer(company_name: impl Into<String>, names: &[String]) -> Self {
        let interviewer = names
            .choose(&mut rand::thread_rng())
            .cloned()
            .unwrap_or_else(|| FALLBACK_INTERVIEWER.to_string());
        Self::new(company_name, interviewer)
    }

    pub fn interviewer_name(&self) -> &str {
        &self.interviewer_name
    }

    pub fn interviewer_initial(&self) -> char {
        self.interviewer_name.chars().next().unwrap_or('?')
    }

    pub fn setup_banner(&self) -> String {
        format!(
            "💼 {}\nWelcome to your mock interview session",
            self.company_name
        )
    }

    pub fn header(&self, role: Role, elapsed_secs: u64) -> String {
        format!(
            "💼 {} | 👤 {} • {} | ⏱️ {}",
            self.company_name,
            self.interviewer_name,
            role.header_label(),
            format_clock(elapsed_secs)
        )
    }

    pub fn start_notice(date: NaiveDate) -> String {
        format!(
            "📹 Interview Recording Started • {}",
            date.format("%-m/%-d/%Y")
        )
    }

    pub fn render_message(&self, message: &Message) -> String {
        match message.kind {
            MessageKind::Agent => format!(
                "[{}] {}: {}",
                self.interviewer_initial(),
                self.interviewer_name,
                message.text
            ),
            MessageKind::User => format!("[Y] You: {}", message.text),
            MessageKind::Feedback => format!("    {}\n    💡 Feedback", message.text),
        }
    }

    /// Lines for every entry appended since the previous call
    pub fn take_new(&mut self, session: &InterviewSession) -> Vec<String> {
        let messages = session.transcript().messages();
        if messages.len() < self.rendered {
            self.rendered = 0;
        }

        let lines = messages[self.rendered..]
            .iter()
            .map(|m| self.render_message(m))
            .collect();
        self.rendered = messages.len();
        lines
    }

    /// Redraw the whole transcript, marking answers that never got a reply
    pub fn render_all(&mut self, session: &InterviewSession) -> Vec<String> {
        let transcript = session.transcript();
        self.rendered = transcript.len();

        (0..transcript.len())
            .filter_map(|i| self.render_entry(session, i))
            .collect()
    }

    /// One transcript entry, with the undelivered marker when it applies
    pub fn render_entry(&self, session: &InterviewSession, index: usize) -> Option<String> {
        let transcript = session.transcript();
        let line = self.render_message(transcript.get(index)?);
        if transcript.is_unconfirmed(index) {
            Some(format!("{}{}", line, UNDELIVERED_MARKER))
        } else {
            Some(line)
        }
    }

    pub fn typing_indicator(&self, session: &InterviewSession) -> Option<String> {
        session.typing_indicator_visible().then(|| {
            format!(
                "[{}] {}: {}",
                self.interviewer_initial(),
                self.interviewer_name,
                TYPING_INDICATOR
            )
        })
    }

    /// Shown once the interview has ended
    pub fn summary_panel(&self, session: &InterviewSession, elapsed_secs: u64) -> Option<String> {
        if session.stage() != Stage::Interview || !session.is_ended() {
            return None;
        }

        Some(format!(
            "📊 Interview Performance Summary\nTotal Duration: {}\n\n{}",
            format_clock(elapsed_secs),
            session.summary().unwrap_or_default()
        ))
    }

    /// Forget what has been emitted, e.g. after a reset
    pub fn clear(&mut self) {
        self.rendered = 0;
    }
}
