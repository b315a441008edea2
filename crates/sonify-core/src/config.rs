//! Runtime configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::sentiment::PolarityMapping;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SonifyConfig {
    #[serde(default)]
    pub sentiment: SentimentConfig,
    #[serde(default)]
    pub playback: PlaybackConfig,
}

/// Endpoint and credentials of the sentiment-analysis service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentimentConfig {
    pub url: String,
    pub api_key: String,
    pub api_host: String,
    pub timeout_secs: u64,
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: String::new(),
            api_host: String::new(),
            timeout_secs: 10,
        }
    }
}

impl SentimentConfig {
    pub fn is_configured(&self) -> bool {
        !self.url.trim().is_empty()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Time each word stays audible, in milliseconds
    pub dwell_ms: u64,
    /// Output gain after the waveshaper
    pub gain_db: f32,
    pub polarity: PolarityMapping,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            dwell_ms: 500,
            gain_db: 0.0,
            polarity: PolarityMapping::Inverted,
        }
    }
}

impl PlaybackConfig {
    pub fn dwell(&self) -> Duration {
        Duration::from_millis(self.dwell_ms)
    }
}
