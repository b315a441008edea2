//! Band-limited oscillator using PolyBLEP

use std::f64::consts::PI;

use sonify_core::Waveform;

#[derive(Debug, Clone)]
pub struct Oscillator {
    pub waveform: Waveform,
    /// Requested pitch; may exceed what the current rate can represent
    requested: f64,
    /// Pitch actually generated, limited to Nyquist
    frequency: f64,
    phase: f64,
    sample_rate: f64,
}

impl Oscillator {
    pub fn new(waveform: Waveform, frequency: f64, sample_rate: f64) -> Self {
        Self {
            waveform,
            requested: frequency,
            frequency: nyquist_limited(frequency, sample_rate),
            phase: 0.0,
            sample_rate,
        }
    }

    /// Frequency being generated, in Hz
    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate;
        self.frequency = nyquist_limited(self.requested, sample_rate);
    }

    /// Generate the next sample in [-1, 1]
    pub fn next_sample(&mut self) -> f64 {
        let inc = self.frequency / self.sample_rate;
        let sample = match self.waveform {
            Waveform::Sine => (2.0 * PI * self.phase).sin(),
            Waveform::Square => self.square(inc),
            Waveform::Sawtooth => 2.0 * self.phase - 1.0 - poly_blep(self.phase, inc),
            Waveform::Triangle => {
                if self.phase < 0.5 {
                    4.0 * self.phase - 1.0
                } else {
                    3.0 - 4.0 * self.phase
                }
            }
        };

        self.phase = (self.phase + inc).rem_euclid(1.0);

        sample
    }

    fn square(&self, inc: f64) -> f64 {
        let mut value = if self.phase < 0.5 { 1.0 } else { -1.0 };
        value += poly_blep(self.phase, inc);
        value -= poly_blep((self.phase + 0.5) % 1.0, inc);
        value
    }
}

fn nyquist_limited(frequency: f64, sample_rate: f64) -> f64 {
    frequency.clamp(0.0, sample_rate / 2.0)
}

/// Correction around a waveform discontinuity; `t` is the phase, `dt` the increment.
fn poly_blep(t: f64, dt: f64) -> f64 {
    if t < dt {
        let t = t / dt;
        2.0 * t - t * t - 1.0
    } else if t > 1.0 - dt {
        let t = (t - 1.0) / dt;
        t * t + 2.0 * t + 1.0
    } else {
        0.0
    }
}
