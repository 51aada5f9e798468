use thiserror::Error;

/// All errors produced by sonalyze-core.
///
/// Every variant is recoverable at the session boundary: the caller reports
/// the condition and carries on.
#[derive(Debug, Error)]
pub enum SonalyzeError {
    #[error("sound wave not loaded: {name}")]
    BufferNotFound { name: String },

    #[error("cannot compute a spectrum of an empty sample buffer")]
    EmptyInput,

    #[error("unsupported window function {0:?} — expected none, hamming or hanning")]
    UnsupportedWindow(String),

    #[error("unsupported plot type {0:?} — expected waveform, spectrogram or histogram")]
    UnsupportedPlot(String),

    #[error("spectrogram plots accept exactly one sound wave, got {0}")]
    InvalidPlotArity(usize),

    #[error("unsupported sample container: {0}")]
    UnsupportedFormat(String),

    #[error("WAV container error: {0}")]
    Container(#[from] hound::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SonalyzeError>;
