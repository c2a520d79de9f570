use async_trait::async_trait;
use thiserror::Error;

pub mod gemini;
pub mod handlers;

pub use gemini::GeminiClient;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("text generation request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("text generation returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("unexpected text generation response: {0}")]
    Envelope(String),
}

/// One-shot prompt in, text out.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}
