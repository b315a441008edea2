//! Playback state and events

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Time each word stays audible
pub const DEFAULT_DWELL: Duration = Duration::from_millis(500);

/// Scheduler playback state
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlaybackState {
    #[default]
    Idle,
    Playing {
        /// Position of the word in the queue
        index: usize,
        word: String,
    },
}

impl PlaybackState {
    pub fn is_playing(&self) -> bool {
        matches!(self, Self::Playing { .. })
    }

    /// Word currently sounding, if any
    pub fn word(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::Playing { word, .. } => Some(word),
        }
    }
}

/// Notifications emitted while a queue plays
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackEvent {
    ToneStarted { index: usize, word: String, frequency_hz: f64 },
    ToneStopped { index: usize, word: String },
    Finished(PlaybackSummary),
}

/// Outcome of a completed playback run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlaybackSummary {
    /// Tones started and stopped during the run
    pub tones_played: usize,
    /// Whether the run ended early through cancellation
    pub cancelled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_accessors() {
        let idle = PlaybackState::default();
        assert!(!idle.is_playing());
        assert_eq!(idle.word(), None);

        let playing = PlaybackState::Playing { index: 0, word: "bad".into() };
        assert!(playing.is_playing());
        assert_eq!(playing.word(), Some("bad"));
    }
}
