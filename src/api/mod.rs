//! Wire layer for the interview backend
//!
//! - POST /api/start - multipart setup form, returns a session id
//! - POST /api/next - candidate answer in, next question / feedback / summary out
//! - GET /api/health - liveness probe

pub mod client;
pub mod messages;

pub use client::{HttpInterviewApi, InterviewApi};
pub use messages::{HealthResponse, NextRequest, NextResponse, StartResponse};
