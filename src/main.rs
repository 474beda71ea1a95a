use anyhow::{Context, Result};
use clap::Parser;
use mock_interview::config::DEFAULT_CONFIG_PATH;
use mock_interview::{
    Config, Console, HttpInterviewApi, InterviewApi, InterviewClient, Persona, RecognitionConfig,
    ResumeAttachment, Role, SessionForm, TranscriptView, VoiceCapability, VoiceInput,
};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Practice a job interview against the interview backend
#[derive(Debug, Parser)]
#[command(name = "mock-interview", version)]
struct Args {
    /// Configuration file (without extension is fine)
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// Backend base URL, overrides server.base_url
    #[arg(long)]
    server: Option<String>,

    /// Position applying for
    #[arg(long, value_enum, default_value_t = Role::SoftwareEngineer)]
    role: Role,

    /// Interviewer style
    #[arg(long, value_enum, default_value_t = Persona::Neutral)]
    persona: Persona,

    /// Full name (prompted for when missing)
    #[arg(long)]
    name: Option<String>,

    /// Email (prompted for when missing)
    #[arg(long)]
    email: Option<String>,

    /// Plain text (.txt) resume for personalized questions
    #[arg(long)]
    resume: Option<String>,

    /// Only check that the backend is reachable, then exit
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut cfg = Config::load(&args.config)?;
    if let Some(server) = args.server {
        cfg.server.base_url = server;
    }
    info!("Backend: {}", cfg.server.base_url);

    let api = HttpInterviewApi::new(&cfg.server).context("Failed to build HTTP client")?;

    if args.check {
        let health = api
            .health()
            .await
            .with_context(|| format!("Backend at {} is not reachable", api.base_url()))?;
        println!("{}: {}", api.base_url(), health.status);
        return Ok(());
    }

    match api.health().await {
        Ok(health) => info!("Backend status: {}", health.status),
        Err(e) => warn!("Backend health check failed: {}", e),
    }

    let resume = args
        .resume
        .as_deref()
        .map(ResumeAttachment::load)
        .transpose()?;

    let form = SessionForm {
        role: args.role,
        persona: args.persona,
        full_name: args.name.unwrap_or_default(),
        email: args.email.unwrap_or_default(),
        resume,
    };

    let (client, events) = InterviewClient::new(Arc::new(api));
    let voice = VoiceInput::new(
        VoiceCapability::from_config(&cfg.voice),
        RecognitionConfig {
            language: cfg.voice.language.clone(),
            ..RecognitionConfig::default()
        },
    );
    let view = TranscriptView::with_random_interviewer(
        cfg.interview.company_name.clone(),
        &cfg.interview.interviewer_names,
    );

    let mut console = Console::new(client, events, voice, view, std::io::stdout());
    console
        .run(form, tokio::io::BufReader::new(tokio::io::stdin()))
        .await
}
