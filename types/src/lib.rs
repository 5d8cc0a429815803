//! Core domain types for Wordwalk.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer of the application.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory
#![allow(clippy::missing_panics_doc)] // Panics are documented in assertions

mod model;
mod word;

pub use model::{ApiKey, ModelName, ModelParseError, PredefinedModel, Provider, ProviderParseError};
pub use word::{
    CandidatePool, MAX_POOL_SIZE, MAX_SEED_WORDS, MAX_SELECTION, RELATED_WORDS_PER_QUERY,
    SeedParseError, SeedSet, Selection, Word, WordError,
};

/// Display options shared by the engine (config) and the TUI (rendering).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiOptions {
    pub ascii_only: bool,
    pub high_contrast: bool,
}
