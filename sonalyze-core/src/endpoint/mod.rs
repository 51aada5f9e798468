//! Speech endpoint detection.
//!
//! ## Pipeline
//!
//! ```text
//! SampleBuffer
//!   └─► threshold::noise_floor (100 ms prefix)   amplitude threshold
//!       └─► classify (energy windows)            per-sample mask
//!           └─► smooth::bridge_speech_gaps (p)   ┐ hysteresis
//!               smooth::suppress_speech_bursts (r) ┘ smoothing
//!               └─► border extraction            transition timestamps
//! ```
//!
//! `trim` runs the same pipeline and then drops every noise-labelled
//! sample from the buffer, exactly once per buffer.

pub mod classify;
pub mod smooth;
pub mod threshold;

use tracing::{debug, info};

use crate::buffer::SampleBuffer;

/// Tunable parameters of the endpoint pipeline.
#[derive(Debug, Clone)]
pub struct EndpointConfig {
    /// Energy-classification window width in milliseconds. Default: 10.
    pub window_ms: f64,
    /// Noise gaps shorter than this many samples between speech bursts
    /// are relabelled speech. Default: 500.
    pub bridge_gap: usize,
    /// Speech bursts shorter than this many samples between noise spans
    /// are relabelled noise. Default: 5000.
    pub suppress_burst: usize,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            window_ms: 10.0,
            bridge_gap: 500,
            suppress_burst: 5_000,
        }
    }
}

/// Result of endpoint detection: the smoothed per-sample speech mask and
/// the border timestamps bracketing every speech run.
#[derive(Debug, Clone)]
pub struct Endpoints {
    /// One label per sample; `true` = speech.
    pub mask: Vec<bool>,
    /// Second offsets of the first and last sample of every speech run,
    /// ascending.
    pub borders: Vec<f64>,
}

impl Endpoints {
    /// Returns true when at least one sample is labelled speech.
    pub fn any_speech(&self) -> bool {
        self.mask.iter().any(|&m| m)
    }
}

/// Front of the endpoint-detection pipeline.
#[derive(Debug, Clone, Default)]
pub struct EndpointDetector {
    config: EndpointConfig,
}

impl EndpointDetector {
    pub fn new(config: EndpointConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EndpointConfig {
        &self.config
    }

    /// Classification window width in samples at `sample_rate`.
    fn window_len(&self, sample_rate: u32) -> usize {
        (sample_rate as f64 * self.config.window_ms / 1000.0).round() as usize
    }

    /// Run the full detection pipeline without touching the buffer.
    ///
    /// Degenerate inputs stay well-defined: an all-zero buffer produces a
    /// zero threshold, an all-noise mask (window averages are never
    /// *strictly* above zero) and no borders.
    pub fn detect(&self, buffer: &SampleBuffer) -> Endpoints {
        let threshold = threshold::noise_floor(buffer);
        let raw = classify::classify(
            &buffer.samples,
            threshold,
            self.window_len(buffer.sample_rate),
        );
        let bridged = smooth::bridge_speech_gaps(&raw, self.config.bridge_gap);
        let mask = smooth::suppress_speech_bursts(&bridged, self.config.suppress_burst);
        let borders = borders(&mask, buffer.sample_rate);

        debug!(
            name = %buffer.name,
            threshold,
            speech_samples = mask.iter().filter(|&&m| m).count(),
            borders = borders.len(),
            "endpoint detection finished"
        );

        Endpoints { mask, borders }
    }

    /// Remove every noise-labelled sample from `buffer`.
    ///
    /// Runs [`detect`](Self::detect), records whether any speech was seen,
    /// then retains only the speech-labelled samples and marks the buffer
    /// cleaned. A buffer that is already cleaned is left untouched, so the
    /// operation is idempotent.
    pub fn trim(&self, buffer: &mut SampleBuffer) {
        if buffer.cleaned {
            debug!(name = %buffer.name, "already cleaned — skipping trim");
            return;
        }

        let endpoints = self.detect(buffer);
        let before = buffer.samples.len();
        buffer.speech_detected = endpoints.any_speech();

        let mut idx = 0;
        buffer.samples.retain(|_| {
            let keep = endpoints.mask[idx];
            idx += 1;
            keep
        });
        buffer.cleaned = true;

        info!(
            name = %buffer.name,
            before,
            after = buffer.samples.len(),
            speech_detected = buffer.speech_detected,
            "trimmed non-speech samples"
        );
    }
}

/// Transition sample indices converted to second offsets.
///
/// An index is a border when it is labelled speech and sits at the edge of
/// a speech run (noise is assumed just outside both buffer ends), so every
/// speech run contributes its first and its last index. A run of length
/// one contributes a single timestamp.
fn borders(mask: &[bool], sample_rate: u32) -> Vec<f64> {
    let mut out = Vec::new();
    for i in 0..mask.len() {
        if !mask[i] {
            continue;
        }
        let speech_before = i > 0 && mask[i - 1];
        let speech_after = i + 1 < mask.len() && mask[i + 1];
        if !speech_before || !speech_after {
            out.push(i as f64 / sample_rate as f64);
        }
    }
    out
}
