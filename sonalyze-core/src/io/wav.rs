//! WAV container decode/encode via `hound`.
//!
//! Decoding accepts 16-bit linear PCM, mono or stereo. Stereo pairs are
//! downmixed by floor-averaging in integer arithmetic *before*
//! normalization, so the mono result is exact in the PCM domain.

use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use tracing::{info, warn};

use crate::buffer::SampleBuffer;
use crate::error::{Result, SonalyzeError};

/// Scale between 16-bit PCM and the normalized f32 sample domain.
const PCM_SCALE: f32 = 32_768.0;

/// Decode `path` into a [`SampleBuffer`] called `name`.
///
/// # Errors
/// - [`SonalyzeError::UnsupportedFormat`] for anything but 16-bit PCM with
///   one or two channels.
/// - [`SonalyzeError::Container`] for malformed WAV data.
pub fn load_wav(name: impl Into<String>, path: &Path) -> Result<SampleBuffer> {
    let mut reader = WavReader::open(path)?;
    let spec = reader.spec();

    if spec.sample_format != SampleFormat::Int || spec.bits_per_sample != 16 {
        return Err(SonalyzeError::UnsupportedFormat(format!(
            "expected 16-bit PCM, got {}-bit {:?}",
            spec.bits_per_sample, spec.sample_format
        )));
    }

    let interleaved = reader
        .samples::<i16>()
        .collect::<std::result::Result<Vec<i16>, _>>()?;

    let pcm: Vec<i16> = match spec.channels {
        1 => interleaved,
        2 => interleaved
            .chunks_exact(2)
            .map(|pair| (pair[0] as i32 + pair[1] as i32).div_euclid(2) as i16)
            .collect(),
        n => {
            return Err(SonalyzeError::UnsupportedFormat(format!(
                "expected mono or stereo, got {n} channels"
            )))
        }
    };

    let samples: Vec<f32> = pcm.iter().map(|&s| s as f32 / PCM_SCALE).collect();

    let name = name.into();
    info!(
        name = %name,
        path = %path.display(),
        sample_rate = spec.sample_rate,
        channels = spec.channels,
        samples = samples.len(),
        "loaded wave"
    );
    Ok(SampleBuffer::new(name, spec.sample_rate, samples))
}

/// Encode `buffer` as 16-bit mono PCM at its sample rate.
///
/// Samples are scaled by `i16::MAX`, rounded and clamped; values outside
/// [-1.0, 1.0] (possible for synthesized harmonic sums) clip at the
/// container boundary, which is logged but not an error.
pub fn save_wav(buffer: &SampleBuffer, path: &Path) -> Result<()> {
    let spec = WavSpec {
        channels: 1,
        sample_rate: buffer.sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec)?;
    let mut clipped = 0usize;
    for &s in &buffer.samples {
        let scaled = (s * i16::MAX as f32).round();
        if !(i16::MIN as f32..=i16::MAX as f32).contains(&scaled) {
            clipped += 1;
        }
        writer.write_sample(scaled.clamp(i16::MIN as f32, i16::MAX as f32) as i16)?;
    }
    writer.finalize()?;

    if clipped > 0 {
        warn!(name = %buffer.name, clipped, "samples clipped during 16-bit encode");
    }
    info!(
        name = %buffer.name,
        path = %path.display(),
        samples = buffer.samples.len(),
        "saved wave"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_pcm(path: &Path, channels: u16, sample_rate: u32, pcm: &[i16]) {
        let spec = WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(path, spec).unwrap();
        for &s in pcm {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn mono_file_loads_normalized() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mono.wav");
        write_pcm(&path, 1, 8000, &[0, 16_384, -16_384, 32_767]);

        let buf = load_wav("mono", &path).unwrap();
        assert_eq!(buf.sample_rate, 8000);
        assert_eq!(buf.samples.len(), 4);
        assert_eq!(buf.samples[0], 0.0);
        assert!((buf.samples[1] - 0.5).abs() < 1e-6);
        assert!((buf.samples[2] + 0.5).abs() < 1e-6);
        assert!(!buf.cleaned);
    }

    #[test]
    fn stereo_pairs_are_floor_averaged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stereo.wav");
        // Pairs: (100, 201) → 150 (floor of 150.5), (-3, 0) → -2 (floor
        // division rounds toward negative infinity).
        write_pcm(&path, 2, 44_100, &[100, 201, -3, 0]);

        let buf = load_wav("stereo", &path).unwrap();
        assert_eq!(buf.samples.len(), 2);
        assert!((buf.samples[0] - 150.0 / PCM_SCALE).abs() < 1e-9);
        assert!((buf.samples[1] - -2.0 / PCM_SCALE).abs() < 1e-9);
    }

    #[test]
    fn round_trip_preserves_length_rate_and_amplitudes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roundtrip.wav");
        let samples: Vec<f32> = (0..800)
            .map(|i| 0.4 * (std::f32::consts::TAU * 440.0 * i as f32 / 8000.0).sin())
            .collect();
        let buf = SampleBuffer::new("tone", 8000, samples.clone());

        save_wav(&buf, &path).unwrap();
        let reloaded = load_wav("tone", &path).unwrap();

        assert_eq!(reloaded.sample_rate, 8000);
        assert_eq!(reloaded.samples.len(), 800);
        for (orig, read) in samples.iter().zip(&reloaded.samples) {
            // One 16-bit quantization step of tolerance.
            assert!((orig - read).abs() <= 1.5 / PCM_SCALE, "{orig} vs {read}");
        }
    }

    #[test]
    fn out_of_range_samples_clip_instead_of_failing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.wav");
        let buf = SampleBuffer::new("loud", 8000, vec![2.5, -2.5, 0.0]);

        save_wav(&buf, &path).unwrap();
        let reloaded = load_wav("loud", &path).unwrap();
        assert!((reloaded.samples[0] - i16::MAX as f32 / PCM_SCALE).abs() < 1e-6);
        assert!((reloaded.samples[1] - i16::MIN as f32 / PCM_SCALE).abs() < 1e-6);
    }

    #[test]
    fn missing_file_is_a_container_error() {
        let err = load_wav("ghost", Path::new("/nonexistent/ghost.wav")).unwrap_err();
        assert!(matches!(err, SonalyzeError::Container(_)));
    }
}
