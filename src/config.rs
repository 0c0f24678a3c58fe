use std::path::PathBuf;

use crate::model::{acceptable_durations, Quarters};

/// Everything the pipeline is parameterized on, passed explicitly to each
/// stage. Defaults mirror the corpus this tool was built for: 16th-note
/// quantization and 64-step training windows (four 4/4 bars).
#[derive(Debug, Clone)]
pub struct Config {
    /// Root of the raw MusicXML dataset, walked recursively.
    pub dataset_dir: PathBuf,
    /// Directory receiving one encoded text artifact per accepted score.
    pub encoded_dir: PathBuf,
    /// The single concatenated, boundary-delimited corpus file.
    pub corpus_path: PathBuf,
    /// The persisted symbol-to-integer vocabulary.
    pub mapping_path: PathBuf,
    /// Training context length, and also the length of the boundary run
    /// separating songs in the assembled corpus.
    pub sequence_length: usize,
    /// Quantization unit for the time-step encoding.
    pub time_step: Quarters,
    /// Durations a score may use and still enter the corpus.
    pub allowed_durations: Vec<Quarters>,
}

impl Config {
    pub const DEFAULT_SEQUENCE_LENGTH: usize = 64;
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset_dir: PathBuf::from("scores"),
            encoded_dir: PathBuf::from("dataset"),
            corpus_path: PathBuf::from("file_dataset.txt"),
            mapping_path: PathBuf::from("mapping.json"),
            sequence_length: Self::DEFAULT_SEQUENCE_LENGTH,
            time_step: Quarters::sixteenth(),
            allowed_durations: acceptable_durations(),
        }
    }
}
