//! Corpus building and assembly: directory walk, per-score processing with
//! failure isolation, and the single boundary-delimited corpus file.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::Config;
use crate::error::PreprocessError;
use crate::musicxml;
use crate::pipeline::filter::ExclusionReason;
use crate::pipeline::{encode, filter, normalize};

/// The song-boundary token. The assembler inserts a run of these, as long
/// as one training window, after every song.
pub const BOUNDARY: &str = "/";

/// What came out of a corpus build: accepted songs in deterministic id
/// order, plus counts for everything that did not make it.
#[derive(Debug, Default)]
pub struct BuildSummary {
    /// Score id → space-joined token text, ordered by id.
    pub songs: BTreeMap<String, String>,
    /// Scores screened out by the duration filter.
    pub excluded: usize,
    /// Scores that failed to parse, normalize or encode.
    pub failed: usize,
}

impl BuildSummary {
    pub fn accepted(&self) -> usize {
        self.songs.len()
    }
}

enum Outcome {
    Encoded(String),
    Excluded(ExclusionReason),
}

/// Walks the dataset, runs filter → normalize → encode per score, and
/// persists one text artifact per accepted song. A failing score is logged
/// and counted; it never aborts the batch.
pub fn build(config: &Config) -> Result<BuildSummary> {
    let mut paths = Vec::new();
    collect_score_paths(&config.dataset_dir, &mut paths)
        .with_context(|| format!("walking {}", config.dataset_dir.display()))?;
    paths.sort();
    log::info!("found {} score files under {}", paths.len(), config.dataset_dir.display());

    fs::create_dir_all(&config.encoded_dir)
        .with_context(|| format!("creating {}", config.encoded_dir.display()))?;

    let mut summary = BuildSummary::default();
    for path in &paths {
        let id = score_id(&config.dataset_dir, path);
        match process(path, config) {
            Ok(Outcome::Encoded(text)) => {
                let artifact = config.encoded_dir.join(format!("{id}.txt"));
                fs::write(&artifact, &text)
                    .with_context(|| format!("writing {}", artifact.display()))?;
                summary.songs.insert(id, text);
            }
            Ok(Outcome::Excluded(reason)) => {
                summary.excluded += 1;
                log::debug!("excluding {}: {reason}", path.display());
            }
            Err(err) => {
                summary.failed += 1;
                log::warn!("skipping {}: {err}", path.display());
            }
        }
    }
    log::info!(
        "corpus build: {} accepted, {} excluded, {} failed",
        summary.accepted(),
        summary.excluded,
        summary.failed
    );
    Ok(summary)
}

fn process(path: &Path, config: &Config) -> Result<Outcome, PreprocessError> {
    let score = musicxml::load(path)?;
    if let Err(reason) = filter::screen(&score, &config.allowed_durations) {
        return Ok(Outcome::Excluded(reason));
    }
    let normalized = normalize::normalize(&score)?;
    let tokens = encode::encode(&normalized, config.time_step)?;
    Ok(Outcome::Encoded(encode::join(&tokens)))
}

/// Concatenates accepted songs in id order, appending a boundary run of
/// `sequence_length` tokens after each one, then persists and returns the
/// corpus text.
pub fn assemble(
    summary: &BuildSummary,
    sequence_length: usize,
    corpus_path: &Path,
) -> Result<String> {
    let delimiter = vec![BOUNDARY; sequence_length].join(" ");
    let mut pieces = Vec::with_capacity(summary.songs.len() * 2);
    for text in summary.songs.values() {
        pieces.push(text.as_str());
        pieces.push(delimiter.as_str());
    }
    let corpus = pieces.join(" ");
    fs::write(corpus_path, &corpus)
        .with_context(|| format!("writing {}", corpus_path.display()))?;
    Ok(corpus)
}

fn collect_score_paths(dir: &Path, out: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_score_paths(&path, out)?;
        } else if path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| musicxml::EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
            .unwrap_or(false)
        {
            out.push(path);
        }
    }
    Ok(())
}

/// Stable identifier for a score: its dataset-relative path with the
/// extension dropped and separators flattened, so artifacts trace back to
/// their source file.
fn score_id(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.with_extension("")
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("_")
}
