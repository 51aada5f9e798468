//! Renderer-facing plot data.
//!
//! The engine prepares serializable series; drawing them is an external
//! collaborator's job. All types serialize with camelCase fields so the
//! exported JSON is consumable as-is by plotting frontends.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::debug;

use crate::buffer::SampleBuffer;
use crate::endpoint::EndpointDetector;
use crate::error::{Result, SonalyzeError};
use crate::spectrum::{SpectrogramParams, SpectrumAnalyzer, WindowFunction};

/// Which visualization surface a plot request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlotKind {
    Waveform,
    Spectrogram,
    Histogram,
}

impl fmt::Display for PlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Waveform => write!(f, "waveform"),
            Self::Spectrogram => write!(f, "spectrogram"),
            Self::Histogram => write!(f, "histogram"),
        }
    }
}

impl FromStr for PlotKind {
    type Err = SonalyzeError;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("waveform") {
            Ok(Self::Waveform)
        } else if s.eq_ignore_ascii_case("spectrogram") {
            Ok(Self::Spectrogram)
        } else if s.eq_ignore_ascii_case("histogram") {
            Ok(Self::Histogram)
        } else {
            Err(SonalyzeError::UnsupportedPlot(s.to_string()))
        }
    }
}

/// Amplitude-over-time series for one buffer, with border overlay markers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WaveformSeries {
    pub name: String,
    /// `(seconds, amplitude)` per sample.
    pub points: Vec<(f64, f32)>,
    /// Endpoint timestamps to draw as vertical markers; empty for buffers
    /// that have already been cleaned.
    pub borders: Vec<f64>,
}

/// Magnitude-per-frequency pairs for one buffer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistogramSeries {
    pub name: String,
    /// `(frequency_hz, magnitude)` per retained bin.
    pub bins: Vec<(f32, f32)>,
}

/// Short-time-transform request for the external spectrogram renderer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpectrogramRequest {
    pub name: String,
    pub sample_rate: u32,
    pub params: SpectrogramParams,
}

/// Prepared data for one plot invocation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlotData {
    Waveform(Vec<WaveformSeries>),
    Spectrogram(SpectrogramRequest),
    Histogram(Vec<HistogramSeries>),
}

/// Assemble plot data for `buffers`.
///
/// Waveform series carry endpoint borders computed with `detector`
/// (suppressed for cleaned buffers, whose endpoints are already cut).
/// Spectrograms accept exactly one buffer.
///
/// # Errors
/// - [`SonalyzeError::InvalidPlotArity`] for a spectrogram over anything
///   but a single buffer.
/// - [`SonalyzeError::EmptyInput`] from the histogram spectrum of an
///   empty buffer.
pub fn prepare_plot(
    kind: PlotKind,
    buffers: &[&SampleBuffer],
    detector: &EndpointDetector,
) -> Result<PlotData> {
    debug!(kind = %kind, buffers = buffers.len(), "preparing plot data");

    match kind {
        PlotKind::Waveform => Ok(PlotData::Waveform(
            buffers
                .iter()
                .map(|b| waveform_series(b, detector))
                .collect(),
        )),
        PlotKind::Spectrogram => {
            if buffers.len() != 1 {
                return Err(SonalyzeError::InvalidPlotArity(buffers.len()));
            }
            let buffer = buffers[0];
            Ok(PlotData::Spectrogram(SpectrogramRequest {
                name: buffer.name.clone(),
                sample_rate: buffer.sample_rate,
                params: SpectrogramParams::for_sample_rate(buffer.sample_rate),
            }))
        }
        PlotKind::Histogram => {
            let mut analyzer = SpectrumAnalyzer::new();
            let series = buffers
                .iter()
                .map(|b| histogram_series(b, &mut analyzer))
                .collect::<Result<Vec<_>>>()?;
            Ok(PlotData::Histogram(series))
        }
    }
}

fn waveform_series(buffer: &SampleBuffer, detector: &EndpointDetector) -> WaveformSeries {
    let step = 1.0 / buffer.sample_rate as f64;
    let points = buffer
        .samples
        .iter()
        .enumerate()
        .map(|(i, &a)| (i as f64 * step, a))
        .collect();
    let borders = if buffer.cleaned {
        Vec::new()
    } else {
        detector.detect(buffer).borders
    };
    WaveformSeries {
        name: buffer.name.clone(),
        points,
        borders,
    }
}

fn histogram_series(
    buffer: &SampleBuffer,
    analyzer: &mut SpectrumAnalyzer,
) -> Result<HistogramSeries> {
    // Whole-buffer frame: bin k sits at k · rate / N Hz.
    let window_ms = buffer.samples.len() as f64 * 1000.0 / buffer.sample_rate as f64;
    let magnitudes = analyzer.analyze(buffer, window_ms, WindowFunction::None)?;
    let bin_hz = buffer.sample_rate as f32 / buffer.samples.len() as f32;
    let bins = magnitudes
        .iter()
        .enumerate()
        .map(|(k, &m)| (k as f32 * bin_hz, m))
        .collect();
    Ok(HistogramSeries {
        name: buffer.name.clone(),
        bins,
    })
}
