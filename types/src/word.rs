//! Word domain types: the vocabulary the exploration loop moves between rounds.
//!
//! Every type here enforces its invariant at construction time so the engine
//! never has to re-check it:
//!
//! | Type | Invariant |
//! |------|-----------|
//! | [`Word`] | non-empty, ASCII letters only |
//! | [`SeedSet`] | 1..=[`MAX_SEED_WORDS`] words, case-insensitively unique |
//! | [`CandidatePool`] | seed prefix, <= [`MAX_POOL_SIZE`] words, case-insensitively unique |
//! | [`Selection`] | ordered subsequence of one pool, <= [`MAX_SELECTION`] words |

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum number of seed words carried into a round.
pub const MAX_SEED_WORDS: usize = 10;
/// Maximum number of words offered in one round.
pub const MAX_POOL_SIZE: usize = 100;
/// Maximum number of words a selection keeps.
pub const MAX_SELECTION: usize = 10;
/// Number of related words requested per seed word.
pub const RELATED_WORDS_PER_QUERY: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WordError {
    #[error("word must not be empty")]
    Empty,
    #[error("word '{0}' must contain only ASCII letters")]
    NotAlphabetic(String),
}

/// A single alphabetic token.
///
/// Equality and hashing ignore ASCII case; [`Word::as_str`] returns the
/// original spelling for display.
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Word(String);

impl Word {
    pub fn parse(raw: &str) -> Result<Self, WordError> {
        if raw.is_empty() {
            return Err(WordError::Empty);
        }
        if !raw.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(WordError::NotAlphabetic(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercased form used for comparisons.
    #[must_use]
    pub fn canonical(&self) -> String {
        self.0.to_ascii_lowercase()
    }
}

impl PartialEq for Word {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for Word {}

impl Hash for Word {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for byte in self.0.bytes() {
            state.write_u8(byte.to_ascii_lowercase());
        }
        state.write_u8(0xff);
    }
}

impl fmt::Debug for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Word({:?})", self.0)
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Word {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl TryFrom<String> for Word {
    type Error = WordError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for Word {
    type Error = WordError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Word> for String {
    fn from(value: Word) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeedParseError {
    #[error("no valid words entered")]
    Empty,
}

/// The input words of one round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedSet(Vec<Word>);

impl SeedSet {
    /// Builds a seed set, dropping later case-insensitive duplicates and
    /// keeping at most [`MAX_SEED_WORDS`].
    pub fn new(words: impl IntoIterator<Item = Word>) -> Result<Self, SeedParseError> {
        let mut unique: Vec<Word> = Vec::new();
        for word in words {
            if unique.len() == MAX_SEED_WORDS {
                break;
            }
            if !unique.contains(&word) {
                unique.push(word);
            }
        }
        if unique.is_empty() {
            return Err(SeedParseError::Empty);
        }
        Ok(Self(unique))
    }

    /// Parses one line of free text.
    ///
    /// Tokens are split on commas and whitespace; tokens that are not purely
    /// alphabetic are skipped, the rest are lowercased.
    pub fn parse_input(input: &str) -> Result<Self, SeedParseError> {
        let words = input
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter_map(|token| Word::parse(&token.to_ascii_lowercase()).ok());
        Self::new(words)
    }

    #[must_use]
    pub fn words(&self) -> &[Word] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept for API symmetry with the other collections.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Word> {
        self.0.iter()
    }

    /// Comma-separated display form, e.g. `cat, dog`.
    #[must_use]
    pub fn joined(&self) -> String {
        self.0
            .iter()
            .map(Word::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl<'a> IntoIterator for &'a SeedSet {
    type Item = &'a Word;
    type IntoIter = std::slice::Iter<'a, Word>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Words offered to the user in one round.
///
/// The seed words always come first, in seed order. Appends that would
/// duplicate an existing word or exceed [`MAX_POOL_SIZE`] are rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidatePool {
    words: Vec<Word>,
    seed_count: usize,
}

impl CandidatePool {
    #[must_use]
    pub fn from_seeds(seeds: &SeedSet) -> Self {
        Self {
            words: seeds.words().to_vec(),
            seed_count: seeds.len(),
        }
    }

    /// Appends `word` unless it is already present or the pool is full.
    /// Returns whether the word was added.
    pub fn push(&mut self, word: Word) -> bool {
        if self.is_full() || self.contains(&word) {
            return false;
        }
        self.words.push(word);
        true
    }

    #[must_use]
    pub fn contains(&self, word: &Word) -> bool {
        self.words.contains(word)
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.words.len() >= MAX_POOL_SIZE
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    #[must_use]
    pub fn seed_count(&self) -> usize {
        self.seed_count
    }

    #[must_use]
    pub fn is_seed(&self, index: usize) -> bool {
        index < self.seed_count
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Word> {
        self.words.get(index)
    }

    #[must_use]
    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Word> {
        self.words.iter()
    }
}

/// The words a user marked in one round, in pool order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection(Vec<Word>);

impl Selection {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Collects the pool entries whose index is marked, in pool order,
    /// keeping the first [`MAX_SELECTION`].
    #[must_use]
    pub fn from_marked(pool: &CandidatePool, marked: &[bool]) -> Self {
        let words = pool
            .iter()
            .zip(marked)
            .filter(|(_, marked)| **marked)
            .map(|(word, _)| word.clone())
            .take(MAX_SELECTION)
            .collect();
        Self(words)
    }

    #[must_use]
    pub fn words(&self) -> &[Word] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The next round's seeds, or `None` when nothing was selected.
    #[must_use]
    pub fn into_seed_set(self) -> Option<SeedSet> {
        SeedSet::new(self.0).ok()
    }
}
