//! Generated samples and the ordered set they are judged in.

use serde::{Deserialize, Serialize};

use crate::domain::errors::{DomainError, DomainResult};

/// One generated response to the input prompt.
///
/// Immutable once produced; the text is stored already trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sample(String);

impl Sample {
    /// Create a sample from raw completion output, trimming surrounding whitespace.
    pub fn from_completion(raw: &str) -> Self {
        Self(raw.trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// First `max_chars` characters of the sample, never splitting a UTF-8 sequence.
    pub fn preview(&self, max_chars: usize) -> &str {
        char_prefix(&self.0, max_chars)
    }

    /// Number of characters (Unicode scalar values) in the sample.
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }
}

impl AsRef<str> for Sample {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Sample {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered, non-empty sequence of samples.
///
/// Indices are 0-based here and shown 1-based to the judge model. Order only
/// matters for correlating the judge's answer with a sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Sample>", into = "Vec<Sample>")]
pub struct SampleSet(Vec<Sample>);

impl SampleSet {
    /// Build a set from samples in call order.
    ///
    /// # Errors
    /// Returns `DomainError::InvalidSampleCount(0)` for an empty vector.
    pub fn new(samples: Vec<Sample>) -> DomainResult<Self> {
        if samples.is_empty() {
            return Err(DomainError::InvalidSampleCount(0));
        }
        Ok(Self(samples))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept alongside `len` for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Sample> {
        self.0.get(index)
    }

    /// Sample at `index`, or the first one when `index` is past the end.
    pub fn get_or_first(&self, index: usize) -> Option<&Sample> {
        self.0.get(index).or_else(|| self.0.first())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<Sample> {
        self.0
    }
}

impl TryFrom<Vec<Sample>> for SampleSet {
    type Error = DomainError;

    fn try_from(samples: Vec<Sample>) -> Result<Self, Self::Error> {
        Self::new(samples)
    }
}

impl From<SampleSet> for Vec<Sample> {
    fn from(set: SampleSet) -> Self {
        set.into_vec()
    }
}

impl<'a> IntoIterator for &'a SampleSet {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Prefix of `text` holding at most `max_chars` characters.
pub(crate) fn char_prefix(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}
