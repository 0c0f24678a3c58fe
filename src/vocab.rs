//! The corpus vocabulary: a persisted bijection from symbol tokens to
//! dense integer codes.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::PreprocessError;

/// Token → code mapping with contiguous codes `0..len`. Immutable once
/// built; re-deriving it from a different corpus invalidates every integer
/// sequence produced under the old one, so it is persisted alongside them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mapping {
    codes: BTreeMap<String, u32>,
}

impl Mapping {
    /// Builds the mapping from corpus text. Codes are assigned in
    /// lexicographic token order, so the same corpus always yields the same
    /// mapping.
    pub fn build(corpus: &str) -> Self {
        let distinct: BTreeSet<&str> = corpus.split_whitespace().collect();
        let codes = distinct
            .into_iter()
            .enumerate()
            .map(|(code, token)| (token.to_string(), code as u32))
            .collect();
        Self { codes }
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Looks a token up; a miss means the mapping and the corpus come from
    /// different data, which callers treat as fatal.
    pub fn code(&self, symbol: &str) -> Result<u32, PreprocessError> {
        self.codes
            .get(symbol)
            .copied()
            .ok_or_else(|| PreprocessError::UnknownSymbol {
                symbol: symbol.to_string(),
            })
    }

    pub fn save(&self, path: &Path) -> Result<(), PreprocessError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| PreprocessError::json("serializing mapping", e))?;
        fs::write(path, json).map_err(|e| PreprocessError::io("writing mapping", e))
    }

    pub fn load(path: &Path) -> Result<Self, PreprocessError> {
        let text =
            fs::read_to_string(path).map_err(|e| PreprocessError::io("reading mapping", e))?;
        serde_json::from_str(&text).map_err(|e| PreprocessError::json("parsing mapping", e))
    }
}
