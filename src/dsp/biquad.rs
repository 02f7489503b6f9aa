//! Second-order IIR section
//!
//! A single biquad in direct form I. Transfer function:
//! H(z) = (a0 + a1*z^-1 + a2*z^-2) / (1 + b1*z^-1 + b2*z^-2)
//!
//! Note the naming: `a*` are the feed-forward gains and `b*` the feedback
//! gains, with the feedback `b0` already normalized to 1.

/// Normalized biquad coefficients
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadCoefficients {
    pub a0: f32,
    pub a1: f32,
    pub a2: f32,
    pub b1: f32,
    pub b2: f32,
}

impl BiquadCoefficients {
    /// Pass-through coefficients (output equals input)
    pub const IDENTITY: Self = Self {
        a0: 1.0,
        a1: 0.0,
        a2: 0.0,
        b1: 0.0,
        b2: 0.0,
    };
}

impl Default for BiquadCoefficients {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Flush values in the sub-normal range to exactly zero
#[inline]
pub fn underflow_clamp(value: f32) -> f32 {
    if value > -f32::MIN_POSITIVE && value < f32::MIN_POSITIVE {
        0.0
    } else {
        value
    }
}

/// One channel's biquad: coefficients plus its delay line
#[derive(Debug, Clone, Default)]
pub struct BiquadStage {
    coeffs: BiquadCoefficients,
    x1: f32, // x[n-1]
    x2: f32, // x[n-2]
    y1: f32, // y[n-1]
    y2: f32, // y[n-2]
}

impl BiquadStage {
    /// Create a stage with identity coefficients and cleared state
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a single sample
    #[inline]
    pub fn process(&mut self, sample: f32) -> f32 {
        let c = &self.coeffs;
        let output = c.a0 * sample + c.a1 * self.x1 + c.a2 * self.x2
            - c.b1 * self.y1
            - c.b2 * self.y2;
        let output = underflow_clamp(output);

        // Shift delay line
        self.y2 = self.y1;
        self.y1 = output;
        self.x2 = self.x1;
        self.x1 = sample;

        output
    }

    /// Clear the delay line. Coefficients are kept.
    pub fn reset(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }

    pub fn coefficients(&self) -> BiquadCoefficients {
        self.coeffs
    }

    /// Replace the coefficients without touching the delay line
    pub fn set_coefficients(&mut self, coeffs: BiquadCoefficients) {
        self.coeffs = coeffs;
    }

    /// Whether the delay line holds any non-zero value
    pub fn is_quiescent(&self) -> bool {
        self.x1 == 0.0 && self.x2 == 0.0 && self.y1 == 0.0 && self.y2 == 0.0
    }
}
