//! The round-by-round exploration state machine.
//!
//! ```text
//! AwaitingInitialSeeds --valid input--> RoundActive(1)
//! AwaitingInitialSeeds --no valid words--> Terminated
//! RoundActive(n) --non-empty selection--> RoundActive(n + 1)
//! RoundActive(n) --empty selection / round limit--> Terminated
//! ```

use std::num::NonZeroUsize;

use rand::Rng;
use wordwalk_providers::RelatedWordProvider;
use wordwalk_types::{SeedSet, Selection};

use crate::pool::PoolBuilder;
use crate::selection::WordSelector;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundState {
    /// 1-based.
    pub round: usize,
    pub seeds: SeedSet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    /// The initial input contained no valid word.
    NoValidSeeds,
    /// The user confirmed (or cancelled) with nothing marked.
    EmptySelection,
    /// The configured round limit was reached.
    RoundLimit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Words to report to the user; `None` only when no round ever started.
    pub picked: Option<SeedSet>,
    pub rounds_completed: usize,
    pub reason: TerminationReason,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopPhase {
    AwaitingInitialSeeds,
    RoundActive(RoundState),
    Terminated(Outcome),
}

/// Summary of one finished round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundReport {
    pub round: usize,
    pub pool_size: usize,
    pub selection: Selection,
}

/// Observer notifications, emitted around each round.
#[derive(Debug, Clone, Copy)]
pub enum RoundEvent<'a> {
    Started { round: usize, seeds: &'a SeedSet },
    Completed(&'a RoundReport),
}

type RoundHook = Box<dyn FnMut(&RoundEvent<'_>)>;

/// Drives rounds until the user stops selecting.
///
/// "Picked words" is always the last non-empty [`SeedSet`] the loop worked
/// with: the seeds of the round in which the user selected nothing, or the
/// final selection when the round limit ends the walk.
pub struct ExplorationLoop<P, R, S> {
    pool_builder: PoolBuilder<P, R>,
    selector: S,
    max_rounds: Option<NonZeroUsize>,
    phase: LoopPhase,
    hook: Option<RoundHook>,
}

impl<P, R, S> ExplorationLoop<P, R, S>
where
    P: RelatedWordProvider,
    R: Rng,
    S: WordSelector,
{
    pub fn new(provider: P, rng: R, selector: S) -> Self {
        Self {
            pool_builder: PoolBuilder::new(provider, rng),
            selector,
            max_rounds: None,
            phase: LoopPhase::AwaitingInitialSeeds,
            hook: None,
        }
    }

    #[must_use]
    pub fn with_max_rounds(mut self, max_rounds: Option<NonZeroUsize>) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    #[must_use]
    pub fn on_round(mut self, hook: impl FnMut(&RoundEvent<'_>) + 'static) -> Self {
        self.hook = Some(Box::new(hook));
        self
    }

    pub fn phase(&self) -> &LoopPhase {
        &self.phase
    }

    pub fn selector(&self) -> &S {
        &self.selector
    }

    pub fn provider(&self) -> &P {
        self.pool_builder.provider()
    }

    /// Parses the initial input and enters round 1, or terminates when the
    /// input holds no valid word. Ignored outside `AwaitingInitialSeeds`.
    pub fn start(&mut self, input: &str) -> &LoopPhase {
        if self.phase != LoopPhase::AwaitingInitialSeeds {
            tracing::warn!(phase = ?self.phase, "Exploration already started");
            return &self.phase;
        }

        self.phase = match SeedSet::parse_input(input) {
            Ok(seeds) => {
                tracing::info!(seeds = %seeds.joined(), "Exploration started");
                LoopPhase::RoundActive(RoundState { round: 1, seeds })
            }
            Err(e) => {
                tracing::info!(error = %e, "No valid initial seeds");
                LoopPhase::Terminated(Outcome {
                    picked: None,
                    rounds_completed: 0,
                    reason: TerminationReason::NoValidSeeds,
                })
            }
        };
        &self.phase
    }

    fn emit(&mut self, event: &RoundEvent<'_>) {
        if let Some(hook) = self.hook.as_mut() {
            hook(event);
        }
    }

    /// Runs one round. A no-op unless a round is active.
    ///
    /// A selector error propagates and leaves the current round in place.
    pub async fn step(&mut self) -> anyhow::Result<&LoopPhase> {
        let LoopPhase::RoundActive(state) = &self.phase else {
            return Ok(&self.phase);
        };
        let RoundState { round, seeds } = state.clone();

        self.emit(&RoundEvent::Started {
            round,
            seeds: &seeds,
        });

        let pool = self.pool_builder.build_pool(&seeds).await;
        let selection = self.selector.select(&pool, round).await?;

        let report = RoundReport {
            round,
            pool_size: pool.len(),
            selection,
        };
        tracing::info!(
            round,
            pool = report.pool_size,
            selected = report.selection.len(),
            "Round completed"
        );
        self.emit(&RoundEvent::Completed(&report));

        let limit_reached = self.max_rounds.is_some_and(|max| round >= max.get());
        self.phase = match report.selection.into_seed_set() {
            None => LoopPhase::Terminated(Outcome {
                picked: Some(seeds),
                rounds_completed: round,
                reason: TerminationReason::EmptySelection,
            }),
            Some(next) if limit_reached => LoopPhase::Terminated(Outcome {
                picked: Some(next),
                rounds_completed: round,
                reason: TerminationReason::RoundLimit,
            }),
            Some(next) => LoopPhase::RoundActive(RoundState {
                round: round + 1,
                seeds: next,
            }),
        };
        Ok(&self.phase)
    }

    /// Starts from `input` and steps until the loop terminates.
    pub async fn run(&mut self, input: &str) -> anyhow::Result<Outcome> {
        self.start(input);
        loop {
            if let LoopPhase::Terminated(outcome) = self.step().await? {
                tracing::info!(
                    rounds = outcome.rounds_completed,
                    reason = ?outcome.reason,
                    "Exploration finished"
                );
                return Ok(outcome.clone());
            }
        }
    }
}
