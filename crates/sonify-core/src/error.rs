//! Error types for sonify

use thiserror::Error;

/// Failure of the external sentiment-analysis collaborator
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SentimentError {
    #[error("Sentiment service is not configured")]
    NotConfigured,
    #[error("Sentiment request failed: {0}")]
    Request(String),
    #[error("Sentiment service returned status {0}")]
    Status(u16),
    #[error("Malformed sentiment response: {0}")]
    Malformed(String),
}

#[derive(Debug, Error)]
pub enum SonifyError {
    #[error("A sonification is already running")]
    Busy,
    #[error("Sentiment analysis failed: {0}")]
    Sentiment(#[from] SentimentError),
    #[error("Audio error: {0}")]
    Audio(String),
}

pub type Result<T> = std::result::Result<T, SonifyError>;
