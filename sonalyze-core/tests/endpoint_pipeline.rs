//! End-to-end pipeline coverage: synthesis → endpoint detection → trim →
//! spectrum, driven through the public API only.

use approx::assert_abs_diff_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

use sonalyze_core::endpoint::{EndpointConfig, EndpointDetector};
use sonalyze_core::render::{prepare_plot, PlotData};
use sonalyze_core::synth::generate_wave;
use sonalyze_core::{PlotKind, SampleBuffer, SonalyzeError, SpectrumAnalyzer, WindowFunction};

fn detector() -> EndpointDetector {
    EndpointDetector::new(EndpointConfig {
        window_ms: 10.0,
        bridge_gap: 100,
        suppress_burst: 100,
    })
}

/// A second of 8 kHz silence with a loud burst in the middle.
fn burst_buffer() -> SampleBuffer {
    let mut samples = vec![0.0f32; 8000];
    for (i, s) in samples[3200..4800].iter_mut().enumerate() {
        *s = 0.6 * (std::f32::consts::TAU * 440.0 * i as f32 / 8000.0).sin();
    }
    SampleBuffer::new("burst", 8000, samples)
}

#[test]
fn detection_then_trim_isolates_the_burst() {
    let mut buf = burst_buffer();
    let det = detector();

    let endpoints = det.detect(&buf);
    assert_eq!(endpoints.mask.len(), 8000);
    assert_eq!(endpoints.borders.len(), 2);
    assert!(endpoints.borders[0] >= 0.39 && endpoints.borders[0] <= 0.41);
    assert!(endpoints.borders[1] >= 0.59 && endpoints.borders[1] <= 0.61);

    let before = buf.samples.len();
    det.trim(&mut buf);
    assert!(buf.cleaned);
    assert!(buf.speech_detected);
    assert!(buf.samples.len() <= before);
    assert_eq!(buf.samples.len(), 1600);

    // A second trim must change nothing.
    let snapshot = buf.samples.clone();
    det.trim(&mut buf);
    assert_eq!(buf.samples, snapshot);
}

#[test]
fn silence_cleans_to_nothing_without_errors() {
    let mut buf = SampleBuffer::new("silence", 8000, vec![0.0; 1000]);
    let det = detector();

    let endpoints = det.detect(&buf);
    assert!(endpoints.borders.is_empty());
    assert!(!endpoints.any_speech());

    det.trim(&mut buf);
    assert!(buf.cleaned);
    assert!(!buf.speech_detected);
    assert!(buf.samples.is_empty());
}

#[test]
fn trimmed_burst_keeps_its_spectral_peak() {
    let mut buf = burst_buffer();
    let det = detector();
    det.trim(&mut buf);

    // 1600 surviving samples at 8 kHz → a 200 ms frame of 1600 samples,
    // 800 bins at 5 Hz each; 440 Hz lands on bin 88.
    let spectrum = SpectrumAnalyzer::new()
        .analyze(&buf, 200.0, WindowFunction::None)
        .unwrap();
    assert_eq!(spectrum.len(), 800);

    let peak = spectrum
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(k, _)| k)
        .unwrap();
    assert_eq!(peak, 88);
    assert_abs_diff_eq!(spectrum[88], 0.6, epsilon = 0.01);
}

#[test]
fn synthesized_wave_flows_through_the_whole_pipeline() {
    let mut rng = StdRng::seed_from_u64(2024);
    let buf = generate_wave("synthetic", 4, 500.0, &mut rng);
    assert_eq!(buf.samples.len(), 22_050);

    // Spectrum of the full buffer: every drawn harmonic is below 101 Hz,
    // so all energy sits in the first few bins (bin width = 2 Hz).
    let spectrum = SpectrumAnalyzer::new()
        .analyze(&buf, 500.0, WindowFunction::Hanning)
        .unwrap();
    assert_eq!(spectrum.len(), 11_025);
    let above_cutoff = spectrum[60..]
        .iter()
        .fold(0.0f32, |acc, &m| acc.max(m));
    assert!(above_cutoff < 0.05, "unexpected energy above 120 Hz: {above_cutoff}");

    let data = prepare_plot(PlotKind::Spectrogram, &[&buf], &detector()).unwrap();
    let PlotData::Spectrogram(req) = data else {
        panic!("expected spectrogram request");
    };
    assert_eq!(req.sample_rate, 44_100);
    assert_eq!(req.params.window_len, 1103);
}

#[test]
fn empty_buffer_spectrum_reports_empty_input() {
    let buf = SampleBuffer::new("void", 44_100, vec![]);
    let err = SpectrumAnalyzer::new()
        .analyze(&buf, 100.0, WindowFunction::Hamming)
        .unwrap_err();
    assert!(matches!(err, SonalyzeError::EmptyInput));
}
