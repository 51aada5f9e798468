//! # sonalyze-core
//!
//! Offline speech endpoint analysis SDK.
//!
//! ## Architecture
//!
//! ```text
//! WAV file → io::wav::load_wav → SampleBuffer
//!                                     │
//!                         EndpointDetector::detect
//!               (noise floor → energy windows → hysteresis)
//!                                     │
//!                          mask + border timestamps
//!                             │                │
//!                 trim (drop noise)    render / spectrum
//! ```
//!
//! Buffers are plain values; any registry of named buffers belongs to the
//! caller. All operations are synchronous and single-threaded; the only
//! nondeterminism is the random source the caller injects into
//! [`synth::generate_wave`].

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod buffer;
pub mod endpoint;
pub mod error;
pub mod io;
pub mod render;
pub mod spectrum;
pub mod synth;

// Convenience re-exports for downstream crates
pub use buffer::SampleBuffer;
pub use endpoint::{EndpointConfig, EndpointDetector, Endpoints};
pub use error::{Result, SonalyzeError};
pub use render::{PlotData, PlotKind};
pub use spectrum::{SpectrogramParams, SpectrumAnalyzer, WindowFunction};
