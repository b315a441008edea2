//! sonify-core: Domain types for text sonification

mod config;
pub mod curve;
mod error;
pub mod playback;
pub mod sentiment;
pub mod text;
mod tone;

pub use config::{PlaybackConfig, SentimentConfig, SonifyConfig};
pub use curve::{distortion_curve, TransferCurve, CURVE_SAMPLES, DEFAULT_INTENSITY};
pub use error::{Result, SentimentError, SonifyError};
pub use playback::{PlaybackEvent, PlaybackState, PlaybackSummary, DEFAULT_DWELL};
pub use sentiment::{DistortionIntensity, PolarityMapping, SentimentResult};
pub use text::{tokenize, PlaybackQueue};
pub use tone::{ToneRequest, Waveform, HZ_PER_CHAR};
