//! Sentiment results and their mapping onto distortion intensity

use serde::{Deserialize, Serialize};

use crate::error::SentimentError;

/// Outcome of analysing a text, as reported by the sentiment service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    /// Category label such as "positive", "negative" or "neutral"
    #[serde(rename = "type")]
    pub kind: String,
    /// Polarity from -1 (negative) to 1 (positive)
    pub score: f64,
}

impl SentimentResult {
    pub fn new(kind: impl Into<String>, score: f64) -> Self {
        Self { kind: kind.into(), score }
    }

    /// Reject non-finite scores and clamp the rest into [-1, 1].
    ///
    /// Returns the normalized result and whether clamping was needed.
    pub fn normalized(self) -> Result<(Self, bool), SentimentError> {
        if !self.score.is_finite() {
            return Err(SentimentError::Malformed(format!("score is {}", self.score)));
        }
        let clamped = self.score.clamp(-1.0, 1.0);
        let changed = clamped != self.score;
        Ok((Self { score: clamped, ..self }, changed))
    }
}

/// How sentiment polarity maps onto distortion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolarityMapping {
    /// `(-score + 1) * 100`: positive text gets the cleanest sound
    #[default]
    Inverted,
    /// `(score + 1) * 100`: positive text gets the most distortion
    Direct,
}

impl PolarityMapping {
    pub fn intensity(self, score: f64) -> DistortionIntensity {
        let signed = match self {
            Self::Inverted => score * -1.0,
            Self::Direct => score,
        };
        DistortionIntensity((signed + 1.0) * 100.0)
    }
}

/// Waveshaper steepness derived from a sentiment score, nominally in [0, 200]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct DistortionIntensity(pub f64);

impl DistortionIntensity {
    pub fn value(self) -> f64 {
        self.0
    }
}
