//! Named sample sequence shared by every analysis stage.

/// A named, contiguous block of mono samples at a known sample rate.
///
/// Loaded audio is normalized to [-1.0, 1.0); synthesized audio keeps its
/// raw harmonic sum (magnitude may exceed 1) until it is encoded.
#[derive(Debug, Clone)]
pub struct SampleBuffer {
    /// Identifier, unique within the caller's registry.
    pub name: String,
    /// Sample rate in Hz (e.g. 8000, 44100, 48000).
    pub sample_rate: u32,
    /// Mono f32 samples.
    pub samples: Vec<f32>,
    /// Set once by [`crate::endpoint::EndpointDetector::trim`]; further
    /// trims of this buffer are no-ops.
    pub cleaned: bool,
    /// Whether the trim that set `cleaned` saw at least one speech sample.
    /// Meaningless until `cleaned` is true.
    pub speech_detected: bool,
}

impl SampleBuffer {
    pub fn new(name: impl Into<String>, sample_rate: u32, samples: Vec<f32>) -> Self {
        Self {
            name: name.into(),
            sample_rate,
            samples,
            cleaned: false,
            speech_detected: false,
        }
    }

    /// Returns the duration of this buffer in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Returns true if the buffer contains no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
