use super::resume::ResumeAttachment;
use crate::error::{Result, SessionError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Position the candidate is interviewing for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    #[value(name = "software_engineer")]
    SoftwareEngineer,
    Sales,
    Retail,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::SoftwareEngineer, Role::Sales, Role::Retail];

    /// Wire id sent to the backend
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SoftwareEngineer => "software_engineer",
            Role::Sales => "sales",
            Role::Retail => "retail",
        }
    }

    /// Label used on the setup form
    pub fn label(&self) -> &'static str {
        match self {
            Role::SoftwareEngineer => "Software Engineer",
            Role::Sales => "Sales Representative",
            Role::Retail => "Retail Associate",
        }
    }

    /// Short form shown in the interview header
    pub fn header_label(&self) -> String {
        self.as_str().replace('_', " ")
    }
}

/// Interviewer style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Persona {
    #[default]
    Neutral,
    Confused,
    Efficient,
    Chatty,
}

impl Persona {
    pub const ALL: [Persona; 4] = [
        Persona::Neutral,
        Persona::Confused,
        Persona::Efficient,
        Persona::Chatty,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Persona::Neutral => "neutral",
            Persona::Confused => "confused",
            Persona::Efficient => "efficient",
            Persona::Chatty => "chatty",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Persona::Neutral => "Professional & Balanced",
            Persona::Confused => "Inquisitive & Detail-Oriented",
            Persona::Efficient => "Direct & Time-Conscious",
            Persona::Chatty => "Friendly & Conversational",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Role {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == wanted)
            .ok_or_else(|| SessionError::Invalid(format!("unknown role '{}'", s)))
    }
}

impl FromStr for Persona {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        Persona::ALL
            .into_iter()
            .find(|p| p.as_str() == wanted)
            .ok_or_else(|| SessionError::Invalid(format!("unknown persona '{}'", s)))
    }
}

/// Setup form contents, submitted once to start a session
#[derive(Debug, Clone, Default)]
pub struct SessionForm {
    pub role: Role,
    pub persona: Persona,
    pub full_name: String,
    pub email: String,
    pub resume: Option<ResumeAttachment>,
}

impl SessionForm {
    /// Check the required fields; the resume is optional
    pub fn validate(&self) -> Result<()> {
        if self.full_name.trim().is_empty() {
            return Err(SessionError::Invalid("Full name is required".to_string()));
        }

        let email = self.email.trim();
        if email.is_empty() {
            return Err(SessionError::Invalid("Email is required".to_string()));
        }
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
            _ => Err(SessionError::Invalid(format!(
                "'{}' is not a valid email address",
                email
            ))),
        }
    }
}
