//! Noise-floor estimation from a silence-assumed leading prefix.

use tracing::debug;

use crate::buffer::SampleBuffer;

/// Length of the leading prefix assumed to contain no speech, in ms.
const PREFIX_MS: f64 = 100.0;

/// Estimate the background-noise amplitude threshold of `buffer`.
///
/// Looks at the first 100 ms of samples (all of them when the buffer is
/// shorter) and returns `mean(|x|) + 2·stddev(|x|)` over that prefix,
/// using the population standard deviation. An empty buffer yields 0.0.
pub fn noise_floor(buffer: &SampleBuffer) -> f32 {
    let prefix_len = (buffer.sample_rate as f64 * PREFIX_MS / 1000.0).round() as usize;
    let prefix = &buffer.samples[..prefix_len.min(buffer.samples.len())];
    if prefix.is_empty() {
        return 0.0;
    }

    let n = prefix.len() as f32;
    let mean = prefix.iter().map(|s| s.abs()).sum::<f32>() / n;
    let variance = prefix
        .iter()
        .map(|s| {
            let d = s.abs() - mean;
            d * d
        })
        .sum::<f32>()
        / n;
    let threshold = mean + 2.0 * variance.sqrt();

    debug!(
        name = %buffer.name,
        prefix_samples = prefix.len(),
        threshold,
        "estimated noise floor"
    );
    threshold
}
