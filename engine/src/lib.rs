//! Core engine for Wordwalk: pool building, selection state and the
//! exploration loop.
//!
//! This crate has no terminal dependencies. Front ends implement
//! [`WordSelector`] and drive an [`ExplorationLoop`].

mod config;
mod exploration;
mod pool;
mod selection;

pub use config::{
    AppConfig, ApiKeys, ConfigError, PROVIDER_ENV_VAR, WordwalkConfig, config_path,
    expand_env_vars, resolve_api_key, resolve_model, resolve_provider,
};
pub use exploration::{
    ExplorationLoop, LoopPhase, Outcome, RoundEvent, RoundReport, RoundState, TerminationReason,
};
pub use pool::PoolBuilder;
pub use selection::{SelectionEvent, SelectionRow, SelectionState, SelectionStep, WordSelector};

pub use wordwalk_providers::{self, ApiConfig, LlmWordProvider, RelatedWordProvider};
pub use wordwalk_types::{
    CandidatePool, MAX_POOL_SIZE, MAX_SELECTION, Provider, SeedSet, Selection, UiOptions, Word,
};
