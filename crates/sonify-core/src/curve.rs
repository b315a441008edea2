//! Distortion transfer curves for the waveshaper stage

use std::f64::consts::PI;

/// Number of samples in every transfer curve
pub const CURVE_SAMPLES: usize = 44100;

/// Intensity used when no usable amount is supplied
pub const DEFAULT_INTENSITY: f64 = 50.0;

/// Sampled waveshaping transfer function over the input domain [-1, 1]
#[derive(Debug, Clone, PartialEq)]
pub struct TransferCurve {
    samples: Vec<f32>,
    intensity: f64,
}

impl TransferCurve {
    /// Generate a curve whose steepness grows with `intensity`.
    ///
    /// Sample `i` sits at `x = 2i / N - 1` and holds
    /// `((3 + k) * x * 20 * (PI / 180)) / (PI + k * |x|)`.
    /// Intensities at or below `-PI` would zero the denominator at the edges
    /// and are treated as zero; anything above `-PI` is used as given.
    pub fn generate(intensity: f64) -> Self {
        let k = match intensity {
            k if !k.is_finite() => DEFAULT_INTENSITY,
            k if k <= -PI => 0.0,
            k => k,
        };
        let slope = 20.0 * (PI / 180.0);

        let samples = (0..CURVE_SAMPLES)
            .map(|i| {
                let x = (i as f64 * 2.0) / CURVE_SAMPLES as f64 - 1.0;
                (((3.0 + k) * x * slope) / (PI + k * x.abs())) as f32
            })
            .collect();

        Self { samples, intensity: k }
    }

    /// Intensity this curve was generated from
    pub fn intensity(&self) -> f64 {
        self.intensity
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Map one input sample through the curve.
    ///
    /// Inputs are clamped to [-1, 1] and looked up with linear interpolation
    /// between neighbouring curve points.
    pub fn shape(&self, input: f32) -> f32 {
        if input.is_nan() {
            return 0.0;
        }
        let last = self.samples.len() - 1;
        let position = (input.clamp(-1.0, 1.0) + 1.0) * 0.5 * last as f32;
        let index = (position.floor() as usize).min(last);
        if index == last {
            return self.samples[last];
        }
        let frac = position - index as f32;
        let a = self.samples[index];
        let b = self.samples[index + 1];
        a + (b - a) * frac
    }
}

impl Default for TransferCurve {
    /// The idle curve installed before any sentiment is known
    fn default() -> Self {
        Self::generate(0.0)
    }
}

/// Build a distortion curve, falling back to [`DEFAULT_INTENSITY`] when the
/// amount is missing or not a finite number. Amounts at or below `-PI` give
/// the idle curve (see [`TransferCurve::generate`]).
pub fn distortion_curve(amount: Option<f64>) -> TransferCurve {
    let k = amount.filter(|k| k.is_finite()).unwrap_or(DEFAULT_INTENSITY);
    TransferCurve::generate(k)
}
