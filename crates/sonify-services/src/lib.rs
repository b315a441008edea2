//! sonify-services: Audio engine, scheduling, and service layer

pub mod audio_effects;
pub mod audio_engine;
pub mod audio_io;
pub mod oscillator;
pub mod scheduler;
pub mod sentiment_client;
pub mod sonifier;

pub use audio_effects::{AudioEffect, BandPassEffect, GainEffect, SignalChain, WaveShaperEffect};
pub use audio_engine::{AudioEngine, AudioEngineError, EngineState, VoiceHandle};
pub use audio_io::{AudioOutputError, RealtimeOutputStream};
pub use oscillator::Oscillator;
pub use scheduler::{ActiveTone, CancelToken, PlaybackHandle, PlaybackScheduler, ToneSource};
pub use sentiment_client::{HttpSentimentClient, SentimentAnalyzer};
pub use sonifier::{Sonification, SonificationReport, Sonifier};
