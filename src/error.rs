use thiserror::Error;

use crate::model::{Mode, Quarters};

/// Errors raised by the preprocessing pipeline.
///
/// Per-score variants (`UnsupportedMode`, `NonQuantizableDuration`,
/// `PitchOutOfRange`, `ScoreParse`) are isolated by the corpus builder;
/// the rest invalidate the whole run.
#[derive(Debug, Error)]
pub enum PreprocessError {
    #[error("I/O error while {context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON error while {context}: {source}")]
    Json {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("malformed score: {message}")]
    ScoreParse { message: String },
    #[error("cannot normalize a {mode} score: only major and minor keys have a canonical tonic")]
    UnsupportedMode { mode: Mode },
    #[error("duration {duration} is not a whole multiple of the {time_step} time step")]
    NonQuantizableDuration {
        duration: Quarters,
        time_step: Quarters,
    },
    #[error("transposing pitch {pitch} by {shift} semitones leaves the MIDI range")]
    PitchOutOfRange { pitch: u8, shift: i8 },
    #[error("symbol {symbol:?} has no vocabulary entry; the mapping was built from different data")]
    UnknownSymbol { symbol: String },
    #[error("corpus uses {observed} distinct codes but the mapping defines {mapped}")]
    VocabularyMismatch { observed: usize, mapped: usize },
    #[error("corpus of {tokens} tokens is too short for sequence length {sequence_length}")]
    CorpusTooShort {
        tokens: usize,
        sequence_length: usize,
    },
    #[error("tensor error while {context}: {source}")]
    Tensor {
        context: &'static str,
        #[source]
        source: candle_core::Error,
    },
}

impl PreprocessError {
    pub(crate) fn io(context: &'static str, source: std::io::Error) -> Self {
        Self::Io { context, source }
    }

    pub(crate) fn json(context: &'static str, source: serde_json::Error) -> Self {
        Self::Json { context, source }
    }

    pub(crate) fn score_parse(message: impl Into<String>) -> Self {
        Self::ScoreParse {
            message: message.into(),
        }
    }

    pub(crate) fn tensor(context: &'static str, source: candle_core::Error) -> Self {
        Self::Tensor { context, source }
    }
}
