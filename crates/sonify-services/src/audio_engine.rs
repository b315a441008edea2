//! Audio engine for word tones

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use sonify_core::{ToneRequest, TransferCurve};
use thiserror::Error;
use tracing::{debug, info};

use crate::audio_effects::SignalChain;
use crate::audio_io::{AudioOutputError, RealtimeOutputStream};
use crate::oscillator::Oscillator;
use crate::scheduler::{ActiveTone, ToneSource};

#[derive(Debug, Error)]
pub enum AudioEngineError {
    #[error("Audio output error: {0}")]
    Output(#[from] AudioOutputError),
    #[error("Engine already running")]
    AlreadyRunning,
    #[error("Engine not running")]
    NotRunning,
}

/// One sounding oscillator feeding the signal chain
#[derive(Debug)]
struct Voice {
    id: u64,
    oscillator: Oscillator,
}

/// Audio engine state shared between the scheduler and the audio thread
pub struct EngineState {
    /// Sample rate voices and filters are running at
    sample_rate: AtomicU32,
    next_voice_id: AtomicU64,
    /// Active voices, summed before the chain
    voices: Arc<Mutex<Vec<Voice>>>,
    /// The single signal chain every voice plays through
    chain: Mutex<SignalChain>,
}

impl EngineState {
    pub fn new(sample_rate: u32, gain_db: f32) -> Self {
        Self {
            sample_rate: AtomicU32::new(sample_rate),
            next_voice_id: AtomicU64::new(1),
            voices: Arc::new(Mutex::new(Vec::new())),
            chain: Mutex::new(SignalChain::new(sample_rate as f32, gain_db)),
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate.load(Ordering::SeqCst)
    }

    /// Number of tones currently sounding
    pub fn active_voices(&self) -> usize {
        self.voices.lock().map(|v| v.len()).unwrap_or(0)
    }

    /// Access the signal chain (locks mutex)
    pub fn with_chain<F, R>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&mut SignalChain) -> R,
    {
        self.chain.lock().ok().map(|mut c| f(&mut c))
    }

    /// Render interleaved output: voices are mixed to mono, run through the
    /// chain, then copied to every channel.
    pub fn render(&self, buffer: &mut [f32], sample_rate: u32, channels: u16) {
        self.sync_sample_rate(sample_rate);

        let channels = channels.max(1) as usize;
        let num_frames = buffer.len() / channels;
        let mut mono = vec![0.0f32; num_frames];

        let Ok(mut voices) = self.voices.lock() else {
            buffer.fill(0.0);
            return;
        };
        for voice in voices.iter_mut() {
            for sample in mono.iter_mut() {
                *sample += voice.oscillator.next_sample() as f32;
            }
        }
        drop(voices);

        if let Ok(mut chain) = self.chain.lock() {
            chain.process(&mut mono);
        }

        for (frame, sample) in buffer.chunks_mut(channels).zip(mono) {
            frame.fill(sample);
        }
    }

    fn sync_sample_rate(&self, sample_rate: u32) {
        if self.sample_rate.swap(sample_rate, Ordering::SeqCst) == sample_rate {
            return;
        }
        if let Ok(mut chain) = self.chain.lock() {
            chain.set_sample_rate(sample_rate as f32);
        }
        if let Ok(mut voices) = self.voices.lock() {
            for voice in voices.iter_mut() {
                voice.oscillator.set_sample_rate(sample_rate as f64);
            }
        }
        info!(sample_rate, "Engine sample rate changed");
    }
}

/// Handle to a voice started by [`EngineState::play_tone`]
#[must_use = "a tone sounds until it is stopped"]
pub struct VoiceHandle {
    id: u64,
    voices: Arc<Mutex<Vec<Voice>>>,
}

impl VoiceHandle {
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl ActiveTone for VoiceHandle {
    fn stop(self) {
        if let Ok(mut voices) = self.voices.lock() {
            voices.retain(|v| v.id != self.id);
        }
        debug!(voice = self.id, "Voice stopped");
    }
}

impl ToneSource for EngineState {
    type Tone = VoiceHandle;

    fn play_tone(&self, request: &ToneRequest) -> VoiceHandle {
        let id = self.next_voice_id.fetch_add(1, Ordering::SeqCst);
        let oscillator = Oscillator::new(
            request.waveform,
            request.frequency_hz,
            self.sample_rate() as f64,
        );
        if let Ok(mut voices) = self.voices.lock() {
            voices.push(Voice { id, oscillator });
        }
        debug!(voice = id, word = %request.word, frequency_hz = request.frequency_hz, "Voice started");
        VoiceHandle { id, voices: self.voices.clone() }
    }

    fn install_curve(&self, curve: TransferCurve) {
        let intensity = curve.intensity();
        if self.with_chain(|chain| chain.install_curve(curve)).is_some() {
            info!(intensity, "Installed distortion curve");
        }
    }
}

/// Owns the output stream that renders [`EngineState`] to the sound card
pub struct AudioEngine {
    state: Arc<EngineState>,
    stream: Option<RealtimeOutputStream>,
}

impl AudioEngine {
    pub fn new(sample_rate: u32, gain_db: f32) -> Self {
        Self {
            state: Arc::new(EngineState::new(sample_rate, gain_db)),
            stream: None,
        }
    }

    /// Get shared state for tone playback
    pub fn state(&self) -> Arc<EngineState> {
        self.state.clone()
    }

    /// Open the default output device and start rendering
    pub fn start(&mut self) -> Result<(), AudioEngineError> {
        if self.stream.is_some() {
            return Err(AudioEngineError::AlreadyRunning);
        }

        let state = self.state.clone();
        let stream = RealtimeOutputStream::start(move |buffer, sample_rate, channels| {
            state.render(buffer, sample_rate, channels);
        })?;

        self.stream = Some(stream);
        info!("Audio engine started");
        Ok(())
    }

    /// Stop the audio engine
    pub fn stop(&mut self) -> Result<(), AudioEngineError> {
        let stream = self.stream.take().ok_or(AudioEngineError::NotRunning)?;
        stream.stop();
        info!("Audio engine stopped");
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.stream.is_some()
    }
}

impl Drop for AudioEngine {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rms(samples: &[f32]) -> f32 {
        (samples.iter().map(|s| s * s).sum::<f32>() / samples.len() as f32).sqrt()
    }

    fn tone(word: &str) -> ToneRequest {
        ToneRequest::new(word).unwrap()
    }

    #[test]
    fn test_play_and_stop_voice() {
        let state = EngineState::new(44100, 0.0);
        let handle = state.play_tone(&tone("hello"));
        assert_eq!(state.active_voices(), 1);
        handle.stop();
        assert_eq!(state.active_voices(), 0);
    }

    #[test]
    fn test_stop_only_removes_own_voice() {
        let state = EngineState::new(44100, 0.0);
        let first = state.play_tone(&tone("bad"));
        let second = state.play_tone(&tone("day"));
        assert_ne!(first.id(), second.id());
        first.stop();
        assert_eq!(state.active_voices(), 1);
        second.stop();
        assert_eq!(state.active_voices(), 0);
    }

    #[test]
    fn test_render_is_silent_without_voices() {
        let state = EngineState::new(44100, 0.0);
        let mut buffer = vec![1.0f32; 1024];
        state.render(&mut buffer, 44100, 2);
        assert!(buffer.iter().all(|s| s.abs() < 1e-3));
    }

    #[test]
    fn test_render_copies_mono_to_channels() {
        let state = EngineState::new(44100, 0.0);
        let handle = state.play_tone(&tone("hello"));
        let mut buffer = vec![0.0f32; 2 * 4410];
        state.render(&mut buffer, 44100, 2);
        handle.stop();

        assert!(rms(&buffer) > 0.01);
        for frame in buffer.chunks(2) {
            assert_eq!(frame[0], frame[1]);
        }
    }

    #[test]
    fn test_curve_changes_output() {
        let render_with = |intensity: f64| {
            let state = EngineState::new(44100, 0.0);
            state.install_curve(TransferCurve::generate(intensity));
            let handle = state.play_tone(&tone("bad"));
            let mut buffer = vec![0.0f32; 8820];
            state.render(&mut buffer, 44100, 1);
            handle.stop();
            rms(&buffer)
        };
        assert!(render_with(200.0) > render_with(0.0));
    }

    #[test]
    fn test_sample_rate_follows_device() {
        let state = EngineState::new(44100, 0.0);
        let mut buffer = vec![0.0f32; 64];
        state.render(&mut buffer, 48000, 2);
        assert_eq!(state.sample_rate(), 48000);
    }

    #[test]
    fn test_engine_not_running() {
        let mut engine = AudioEngine::new(44100, 0.0);
        assert!(!engine.is_running());
        assert!(matches!(engine.stop(), Err(AudioEngineError::NotRunning)));
    }
}
