//! Single-sided magnitude spectrum of a sample-buffer frame.
//!
//! ## Normalization
//!
//! The N-point forward transform is divided by N, then every retained bin
//! except DC is doubled, folding the negative-frequency half into the
//! `[0, N/2)` bins that are kept. Bin `k` sits at `k · rate / N` Hz.

pub mod window;

pub use window::WindowFunction;

use rustfft::{num_complex::Complex, FftPlanner};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::buffer::SampleBuffer;
use crate::error::{Result, SonalyzeError};

/// Computes single-sided spectra; owns a transform planner so repeated
/// calls at the same frame length reuse cached FFT plans.
pub struct SpectrumAnalyzer {
    planner: FftPlanner<f32>,
}

impl SpectrumAnalyzer {
    pub fn new() -> Self {
        Self {
            planner: FftPlanner::new(),
        }
    }

    /// Single-sided normalized magnitude spectrum of the first
    /// `N = round(sample_rate · window_ms / 1000)` samples of `buffer`.
    ///
    /// The frame is zero-padded when the buffer is shorter than `N`, and
    /// weighted by `window` before the transform, so the output length is
    /// `floor(N/2)` for every non-empty buffer: bin 0 holds `|X[0]| / N`,
    /// every later bin `2·|X[k]| / N`. A `window_ms` that rounds to a
    /// zero-length frame yields an empty spectrum.
    ///
    /// # Errors
    /// [`SonalyzeError::EmptyInput`] when the buffer holds no samples.
    pub fn analyze(
        &mut self,
        buffer: &SampleBuffer,
        window_ms: f64,
        window: WindowFunction,
    ) -> Result<Vec<f32>> {
        if buffer.samples.is_empty() {
            return Err(SonalyzeError::EmptyInput);
        }

        let n = (buffer.sample_rate as f64 * window_ms / 1000.0).round() as usize;
        if n == 0 {
            return Ok(Vec::new());
        }

        let coeffs = window.coefficients(n);
        let mut frame = vec![Complex::new(0.0f32, 0.0); n];
        for (slot, (&s, &c)) in frame.iter_mut().zip(buffer.samples.iter().zip(&coeffs)) {
            *slot = Complex::new(s * c, 0.0);
        }

        let fft = self.planner.plan_fft_forward(n);
        fft.process(&mut frame);

        let scale = 1.0 / n as f32;
        let spectrum: Vec<f32> = frame[..n / 2]
            .iter()
            .enumerate()
            .map(|(k, bin)| {
                let amplitude = bin.norm() * scale;
                if k == 0 {
                    amplitude
                } else {
                    2.0 * amplitude
                }
            })
            .collect();

        debug!(
            name = %buffer.name,
            frame_len = n,
            bins = spectrum.len(),
            window = %window,
            "computed single-sided spectrum"
        );
        Ok(spectrum)
    }
}

impl Default for SpectrumAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

// ── Spectrogram parameter preparation ────────────────────────────────────

/// Window / hop geometry of the short-time frontend: 25 ms windows with a
/// 10 ms hop, i.e. 15 ms of overlap between consecutive frames.
const SPECTROGRAM_WINDOW_MS: f64 = 25.0;
const SPECTROGRAM_HOP_MS: f64 = 10.0;

/// Short-time-transform geometry handed to an external spectrogram
/// renderer. The engine prepares the parameters; the overlapped transform
/// itself is the renderer's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpectrogramParams {
    /// Transform window length in samples.
    pub window_len: usize,
    /// Samples shared between consecutive windows.
    pub overlap: usize,
    /// Analysis window applied to each transform frame.
    pub window: WindowFunction,
}

impl SpectrogramParams {
    /// Default geometry for a buffer at `sample_rate`.
    pub fn for_sample_rate(sample_rate: u32) -> Self {
        let window_len = (sample_rate as f64 * SPECTROGRAM_WINDOW_MS / 1000.0).round() as usize;
        let hop = (sample_rate as f64 * SPECTROGRAM_HOP_MS / 1000.0).round() as usize;
        Self {
            window_len,
            overlap: window_len.saturating_sub(hop),
            window: WindowFunction::Hanning,
        }
    }
}
