//! Analysis window functions applied before the spectral transform.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SonalyzeError;

/// Weighting curve multiplied into the transform frame to reduce spectral
/// leakage.
///
/// Parses case-insensitively from `"none"`, `"hamming"` and `"hanning"`;
/// anything else is an [`SonalyzeError::UnsupportedWindow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowFunction {
    /// No weighting (rectangular window).
    None,
    /// Hamming window: `0.54 − 0.46·cos(2πk / (N−1))`.
    Hamming,
    /// Hanning window: `0.5·(1 − cos(2πk / (N−1)))`.
    Hanning,
}

impl WindowFunction {
    /// Symmetric coefficient vector of length `n`.
    ///
    /// Uses the symmetric definition (denominator `n − 1`), so a tapered
    /// window starts and ends at its minimum coefficient: 0.0 for
    /// hanning, 0.08 for hamming. `n` of 0 or 1 degenerates to all-ones.
    pub fn coefficients(self, n: usize) -> Vec<f32> {
        use std::f32::consts::TAU;

        if self == WindowFunction::None || n <= 1 {
            return vec![1.0; n];
        }

        let denom = (n - 1) as f32;
        (0..n)
            .map(|k| {
                let phase = (TAU * k as f32 / denom).cos();
                match self {
                    WindowFunction::None => 1.0,
                    WindowFunction::Hamming => 0.54 - 0.46 * phase,
                    WindowFunction::Hanning => 0.5 * (1.0 - phase),
                }
            })
            .collect()
    }
}

impl fmt::Display for WindowFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Hamming => write!(f, "hamming"),
            Self::Hanning => write!(f, "hanning"),
        }
    }
}

impl FromStr for WindowFunction {
    type Err = SonalyzeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("none") {
            Ok(Self::None)
        } else if s.eq_ignore_ascii_case("hamming") {
            Ok(Self::Hamming)
        } else if s.eq_ignore_ascii_case("hanning") {
            Ok(Self::Hanning)
        } else {
            Err(SonalyzeError::UnsupportedWindow(s.to_string()))
        }
    }
}
