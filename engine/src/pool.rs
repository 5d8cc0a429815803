//! Candidate pool construction.

use rand::{Rng, RngExt};
use wordwalk_providers::RelatedWordProvider;
use wordwalk_types::{CandidatePool, SeedSet, Word};

/// Builds the candidate pool for one round.
///
/// Seeds always come first, in seed order. The remaining slots (up to
/// [`wordwalk_types::MAX_POOL_SIZE`]) are filled by drawing uniformly at
/// random from the deduplicated related words of every seed.
#[derive(Debug)]
pub struct PoolBuilder<P, R> {
    provider: P,
    rng: R,
}

impl<P: RelatedWordProvider, R: Rng> PoolBuilder<P, R> {
    pub fn new(provider: P, rng: R) -> Self {
        Self { provider, rng }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub async fn build_pool(&mut self, seeds: &SeedSet) -> CandidatePool {
        let mut pool = CandidatePool::from_seeds(seeds);
        let mut remaining: Vec<Word> = Vec::new();

        for seed in seeds {
            let related = self.provider.related_words(seed).await;
            if related.is_empty() {
                tracing::debug!(%seed, "No related words for seed");
            }
            for word in related {
                if !pool.contains(&word) && !remaining.contains(&word) {
                    remaining.push(word);
                }
            }
        }

        let candidates = remaining.len();
        while !pool.is_full() && !remaining.is_empty() {
            let index = self.rng.random_range(0..remaining.len());
            pool.push(remaining.swap_remove(index));
        }

        tracing::debug!(
            seeds = seeds.len(),
            candidates,
            pool = pool.len(),
            "Candidate pool built"
        );
        pool
    }
}
