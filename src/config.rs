use anyhow::{Context, Result};
use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "config/mock-interview";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub interview: InterviewConfig,
    pub voice: VoiceConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InterviewConfig {
    pub company_name: String,
    pub interviewer_names: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VoiceConfig {
    /// External speech-to-text program; voice input is unavailable when unset
    pub command: Option<String>,
    pub args: Vec<String>,
    pub language: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            request_timeout_secs: 120, // LLM-backed turns are slow
            connect_timeout_secs: 5,
        }
    }
}

impl Default for InterviewConfig {
    fn default() -> Self {
        Self {
            company_name: "TechCorp".to_string(),
            interviewer_names: [
                "Sarah Chen",
                "Michael Rodriguez",
                "Emily Thompson",
                "David Kumar",
                "Jessica Williams",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            command: None,
            args: Vec::new(),
            language: "en-US".to_string(),
        }
    }
}

impl Config {
    /// Layered load: defaults, then the optional file at `path`, then
    /// `MOCK_INTERVIEW__SECTION__KEY` environment variables.
    ///
    /// `MOCK_INTERVIEW__VOICE__ARGS` is split on spaces.
    pub fn load(path: &str) -> Result<Self> {
        let server = ServerConfig::default();
        let interview = InterviewConfig::default();
        let voice = VoiceConfig::default();

        let settings = config::Config::builder()
            .set_default("server.base_url", server.base_url)?
            .set_default("server.request_timeout_secs", server.request_timeout_secs)?
            .set_default("server.connect_timeout_secs", server.connect_timeout_secs)?
            .set_default("interview.company_name", interview.company_name)?
            .set_default("interview.interviewer_names", interview.interviewer_names)?
            .set_default("voice.args", Vec::<String>::new())?
            .set_default("voice.language", voice.language)?
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("MOCK_INTERVIEW")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(" ")
                    .with_list_parse_key("voice.args"),
            )
            .build()
            .with_context(|| format!("Failed to read configuration from {}", path))?;

        settings
            .try_deserialize()
            .context("Invalid configuration")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            interview: InterviewConfig::default(),
            voice: VoiceConfig::default(),
        }
    }
}
