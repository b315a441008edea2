//! Audio effect stages and the fixed sonification signal chain

mod native;

pub use native::{BandPassEffect, GainEffect, WaveShaperEffect};

use std::fmt::Debug;

use sonify_core::TransferCurve;

/// Centre frequency of the chain's band-pass stage
pub const FILTER_CENTER_HZ: f32 = 500.0;
/// Resonance of the band-pass stage
pub const FILTER_Q: f32 = 1.0;

/// Audio effect that can process samples in-place
pub trait AudioEffect: Send + Debug {
    fn name(&self) -> &str;
    fn process(&mut self, samples: &mut [f32]);
    /// Update sample rate for effects that depend on it
    fn set_sample_rate(&mut self, _sample_rate: f32) {}
}

/// Band-pass filter -> waveshaper -> gain, connected once and shared by every tone.
///
/// Only the waveshaper curve changes over the chain's lifetime.
#[derive(Debug)]
pub struct SignalChain {
    filter: BandPassEffect,
    shaper: WaveShaperEffect,
    gain: GainEffect,
}

impl SignalChain {
    /// Build the chain with the idle distortion curve installed
    pub fn new(sample_rate: f32, gain_db: f32) -> Self {
        Self {
            filter: BandPassEffect::new(FILTER_CENTER_HZ, FILTER_Q, sample_rate),
            shaper: WaveShaperEffect::new(TransferCurve::default()),
            gain: GainEffect::new(gain_db),
        }
    }

    pub fn process(&mut self, samples: &mut [f32]) {
        for stage in self.stages_mut() {
            stage.process(samples);
        }
    }

    /// Replace the waveshaper curve; the previous curve is dropped
    pub fn install_curve(&mut self, curve: TransferCurve) {
        self.shaper.set_curve(curve);
    }

    pub fn curve(&self) -> &TransferCurve {
        self.shaper.curve()
    }

    /// Stages in signal order
    pub fn stages(&self) -> [&dyn AudioEffect; 3] {
        [&self.filter, &self.shaper, &self.gain]
    }

    pub fn stages_mut(&mut self) -> [&mut dyn AudioEffect; 3] {
        [&mut self.filter, &mut self.shaper, &mut self.gain]
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        for stage in self.stages_mut() {
            stage.set_sample_rate(sample_rate);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_order() {
        let chain = SignalChain::new(44100.0, 0.0);
        let names: Vec<&str> = chain.stages().iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["Band Pass", "Wave Shaper", "Gain"]);
    }

    #[test]
    fn test_starts_with_idle_curve() {
        let chain = SignalChain::new(44100.0, 0.0);
        assert_eq!(chain.curve().intensity(), 0.0);
    }

    #[test]
    fn test_install_curve_replaces_previous() {
        let mut chain = SignalChain::new(44100.0, 0.0);
        chain.install_curve(TransferCurve::generate(180.0));
        assert_eq!(chain.curve().intensity(), 180.0);
        chain.install_curve(TransferCurve::generate(20.0));
        assert_eq!(chain.curve().intensity(), 20.0);
    }

    #[test]
    fn test_silence_stays_silent() {
        let mut chain = SignalChain::new(44100.0, 0.0);
        chain.install_curve(TransferCurve::generate(200.0));
        let mut buffer = vec![0.0f32; 256];
        chain.process(&mut buffer);
        assert!(buffer.iter().all(|s| s.abs() < 1e-3));
    }

    #[test]
    fn test_output_bounded_by_curve() {
        let mut chain = SignalChain::new(44100.0, 0.0);
        chain.install_curve(TransferCurve::generate(200.0));
        let peak = chain
            .curve()
            .samples()
            .iter()
            .fold(0.0f32, |acc, s| acc.max(s.abs()));

        let mut buffer: Vec<f32> = (0..4410)
            .map(|i| if (i / 44) % 2 == 0 { 1.0 } else { -1.0 })
            .collect();
        chain.process(&mut buffer);
        assert!(buffer.iter().all(|s| s.abs() <= peak + 1e-6));
        assert!(buffer.iter().any(|s| s.abs() > 0.01));
    }
}
