//! Native audio effects using fundsp

use std::fmt;

use fundsp::hacker::*;
use sonify_core::TransferCurve;

use super::AudioEffect;

/// Fixed output gain
#[derive(Debug)]
pub struct GainEffect {
    gain_linear: f32,
}

impl GainEffect {
    pub fn new(gain_db: f32) -> Self {
        Self { gain_linear: db_amp(gain_db) as f32 }
    }
}

impl AudioEffect for GainEffect {
    fn name(&self) -> &str { "Gain" }

    fn process(&mut self, samples: &mut [f32]) {
        for sample in samples.iter_mut() {
            *sample *= self.gain_linear;
        }
    }
}

/// Band-pass filter around a centre frequency
pub struct BandPassEffect {
    center_hz: f32,
    q: f32,
    filter: An<FixedSvf<f64, BandpassMode<f64>>>,
}

impl BandPassEffect {
    pub fn new(center_hz: f32, q: f32, sample_rate: f32) -> Self {
        let mut filter = bandpass_hz(center_hz, q);
        filter.set_sample_rate(sample_rate as f64);
        Self { center_hz, q, filter }
    }
}

impl fmt::Debug for BandPassEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BandPassEffect")
            .field("center_hz", &self.center_hz)
            .field("q", &self.q)
            .finish()
    }
}

impl AudioEffect for BandPassEffect {
    fn name(&self) -> &str { "Band Pass" }

    fn process(&mut self, samples: &mut [f32]) {
        for sample in samples.iter_mut() {
            let input = Frame::from([*sample]);
            let output = self.filter.tick(&input);
            *sample = output[0];
        }
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.filter.set_sample_rate(sample_rate as f64);
    }
}

/// Waveshaper that maps each sample through a transfer curve
#[derive(Debug)]
pub struct WaveShaperEffect {
    curve: TransferCurve,
}

impl WaveShaperEffect {
    pub fn new(curve: TransferCurve) -> Self {
        Self { curve }
    }

    pub fn set_curve(&mut self, curve: TransferCurve) {
        self.curve = curve;
    }

    pub fn curve(&self) -> &TransferCurve {
        &self.curve
    }
}

impl AudioEffect for WaveShaperEffect {
    fn name(&self) -> &str { "Wave Shaper" }

    fn process(&mut self, samples: &mut [f32]) {
        for sample in samples.iter_mut() {
            *sample = self.curve.shape(*sample);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f32, sample_rate: f32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| (std::f32::consts::TAU * freq * i as f32 / sample_rate).sin())
            .collect()
    }

    fn rms(samples: &[f32]) -> f32 {
        (samples.iter().map(|s| s * s).sum::<f32>() / samples.len() as f32).sqrt()
    }

    #[test]
    fn test_gain() {
        let mut buffer = vec![1.0f32; 4];
        GainEffect::new(-6.0).process(&mut buffer);
        assert!((buffer[0] - 0.501).abs() < 0.01);

        let mut buffer = vec![0.5f32; 4];
        GainEffect::new(0.0).process(&mut buffer);
        assert!((buffer[0] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_band_pass_attenuates_far_frequencies() {
        let sample_rate = 44100.0;
        let mut near = sine(500.0, sample_rate, 8820);
        let mut far = sine(8000.0, sample_rate, 8820);

        BandPassEffect::new(500.0, 1.0, sample_rate).process(&mut near);
        BandPassEffect::new(500.0, 1.0, sample_rate).process(&mut far);

        // Skip the filter's settling time
        assert!(rms(&near[4410..]) > 4.0 * rms(&far[4410..]));
    }

    #[test]
    fn test_wave_shaper_follows_curve() {
        let curve = TransferCurve::generate(100.0);
        let mut shaper = WaveShaperEffect::new(curve.clone());
        let mut buffer = vec![-1.0, -0.25, 0.25, 1.0];
        shaper.process(&mut buffer);
        assert_eq!(buffer[0], curve.shape(-1.0));
        assert_eq!(buffer[3], curve.shape(1.0));
        assert!(buffer[1] < 0.0 && buffer[2] > 0.0);
    }

    #[test]
    fn test_wave_shaper_set_curve() {
        let mut shaper = WaveShaperEffect::new(TransferCurve::default());
        shaper.set_curve(TransferCurve::generate(75.0));
        assert_eq!(shaper.curve().intensity(), 75.0);

        let mut buffer = vec![0.5];
        shaper.process(&mut buffer);
        assert_eq!(buffer[0], TransferCurve::generate(75.0).shape(0.5));
    }
}
