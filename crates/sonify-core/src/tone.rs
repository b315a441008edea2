//! Mapping of words to tones

use serde::{Deserialize, Serialize};

/// Pitch step per UTF-16 code unit of a word
pub const HZ_PER_CHAR: f64 = 50.0;

/// Oscillator waveform shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Waveform {
    Sine,
    #[default]
    Square,
    Sawtooth,
    Triangle,
}

/// A single word to be played as a tone
#[derive(Debug, Clone, PartialEq)]
pub struct ToneRequest {
    pub word: String,
    pub frequency_hz: f64,
    pub waveform: Waveform,
}

impl ToneRequest {
    /// Build the tone for `word`; its pitch is the length in UTF-16 code
    /// units times [`HZ_PER_CHAR`]. Returns `None` for an empty word.
    pub fn new(word: &str) -> Option<Self> {
        let units = word.encode_utf16().count();
        if units == 0 {
            return None;
        }
        Some(Self {
            word: word.to_string(),
            frequency_hz: units as f64 * HZ_PER_CHAR,
            waveform: Waveform::Square,
        })
    }
}
