//! Synthetic multi-harmonic wave generation.
//!
//! The only nondeterministic operation in the engine. The random source is
//! injected by the caller, so a seeded generator reproduces a wave
//! exactly; the synthesizer never owns a process-global generator.

use rand::Rng;
use tracing::info;

use crate::buffer::SampleBuffer;

/// Sample rate of every synthesized buffer, in Hz.
pub const SYNTH_SAMPLE_RATE: u32 = 44_100;

/// Amplitudes are drawn from {0.1, 0.2, …, 1.0}.
const AMPLITUDE_STEPS: u32 = 10;
/// Frequencies are drawn from the integer range 10..=100 Hz.
const FREQ_MIN_HZ: u32 = 10;
const FREQ_MAX_HZ: u32 = 100;

/// Build `name` as the sum of `harmonics` randomly parameterized sinusoids
/// lasting `duration_ms` milliseconds at 44 100 Hz.
///
/// Each harmonic draws an amplitude uniformly from {0.1, …, 1.0} and an
/// integer frequency uniformly from 10..=100 Hz, then adds
/// `a·sin(2π·f·t)` into the output. Zero harmonics yield an all-zero
/// buffer of the same length. The result is never marked cleaned.
pub fn generate_wave<R: Rng>(
    name: impl Into<String>,
    harmonics: u32,
    duration_ms: f64,
    rng: &mut R,
) -> SampleBuffer {
    let len = (SYNTH_SAMPLE_RATE as f64 * duration_ms / 1000.0).round() as usize;
    let mut samples = vec![0.0f32; len];

    for _ in 0..harmonics {
        let amplitude = rng.gen_range(1..=AMPLITUDE_STEPS) as f32 / AMPLITUDE_STEPS as f32;
        let frequency = rng.gen_range(FREQ_MIN_HZ..=FREQ_MAX_HZ) as f32;
        for (i, sample) in samples.iter_mut().enumerate() {
            let t = i as f32 / SYNTH_SAMPLE_RATE as f32;
            *sample += amplitude * (std::f32::consts::TAU * frequency * t).sin();
        }
    }

    let name = name.into();
    info!(
        name = %name,
        harmonics,
        duration_ms,
        samples = samples.len(),
        "synthesized wave"
    );
    SampleBuffer::new(name, SYNTH_SAMPLE_RATE, samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn zero_harmonics_is_all_zeros() {
        let mut rng = StdRng::seed_from_u64(7);
        let buf = generate_wave("flat", 0, 250.0, &mut rng);
        assert_eq!(buf.samples.len(), 11_025);
        assert!(buf.samples.iter().all(|&s| s == 0.0));
        assert!(!buf.cleaned);
        assert_eq!(buf.sample_rate, SYNTH_SAMPLE_RATE);
    }

    #[test]
    fn duration_rounds_to_the_nearest_sample() {
        let mut rng = StdRng::seed_from_u64(7);
        // 10.5 ms at 44.1 kHz = 463.05 samples → 463.
        let buf = generate_wave("rounded", 0, 10.5, &mut rng);
        assert_eq!(buf.samples.len(), 463);
    }

    #[test]
    fn same_seed_reproduces_the_wave() {
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        let wave_a = generate_wave("a", 5, 100.0, &mut a);
        let wave_b = generate_wave("b", 5, 100.0, &mut b);
        assert_eq!(wave_a.samples, wave_b.samples);
    }

    #[test]
    fn different_seeds_differ() {
        let mut a = StdRng::seed_from_u64(1);
        let mut b = StdRng::seed_from_u64(2);
        let wave_a = generate_wave("a", 3, 100.0, &mut a);
        let wave_b = generate_wave("b", 3, 100.0, &mut b);
        assert_ne!(wave_a.samples, wave_b.samples);
    }

    #[test]
    fn amplitude_is_bounded_by_the_harmonic_count() {
        let mut rng = StdRng::seed_from_u64(1234);
        let buf = generate_wave("bounded", 8, 500.0, &mut rng);
        assert!(buf.samples.iter().all(|&s| s.abs() <= 8.0));
    }

    #[test]
    fn every_wave_starts_at_zero() {
        // sin(0) = 0 regardless of the drawn parameters.
        let mut rng = StdRng::seed_from_u64(99);
        let buf = generate_wave("origin", 6, 50.0, &mut rng);
        assert_eq!(buf.samples[0], 0.0);
    }
}
