//! # Trainer Options

use serde::{Deserialize, Serialize};

use crate::{
    errors::{LatticeError, WLResult},
    training::{SeedOptions, UnigramTrainer},
};

/// Options for [`UnigramTrainer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnigramTrainerOptions {
    /// Pruning stops once the vocabulary is at most this size.
    pub target_vocab_size: usize,

    /// The longest piece, in codepoints.
    pub max_token_len: usize,

    /// Seed candidates seen fewer times are dropped.
    pub seed_min_count: u64,

    /// Keep at most this many seed candidates.
    pub max_candidates: usize,

    /// The most EM iterations to run.
    pub max_iters: usize,

    /// Training never stops on size alone before this many iterations.
    ///
    /// The count is inclusive: with the default of 5, a vocabulary already
    /// within the target stops after iteration 5. Trainers that break only
    /// once the iteration exceeds 5 run one more; use 6 to match them.
    pub min_iters: usize,

    /// Added to every observed expected count before renormalizing.
    pub smoothing: f64,

    /// Each prune removes at least this fraction of the vocabulary.
    pub prune_fraction: f64,
}

impl Default for UnigramTrainerOptions {
    fn default() -> Self {
        Self {
            target_vocab_size: 8000,
            max_token_len: 24,
            seed_min_count: 2,
            max_candidates: 200_000,
            max_iters: 20,
            min_iters: 5,
            smoothing: 1e-5,
            prune_fraction: 0.2,
        }
    }
}

impl UnigramTrainerOptions {
    /// Create new options.
    ///
    /// ## Arguments
    /// * `target_vocab_size` - The target vocabulary size.
    pub fn new(target_vocab_size: usize) -> Self {
        Self {
            target_vocab_size,
            ..Default::default()
        }
    }

    /// Sets the target vocabulary size.
    pub fn with_target_vocab_size(
        self,
        target_vocab_size: usize,
    ) -> Self {
        Self {
            target_vocab_size,
            ..self
        }
    }

    /// Sets the longest piece, in codepoints.
    pub fn with_max_token_len(
        self,
        max_token_len: usize,
    ) -> Self {
        Self {
            max_token_len,
            ..self
        }
    }

    /// Sets the seed candidate minimum count.
    pub fn with_seed_min_count(
        self,
        seed_min_count: u64,
    ) -> Self {
        Self {
            seed_min_count,
            ..self
        }
    }

    /// Sets the maximum number of seed candidates.
    pub fn with_max_candidates(
        self,
        max_candidates: usize,
    ) -> Self {
        Self {
            max_candidates,
            ..self
        }
    }

    /// Sets the maximum number of EM iterations.
    pub fn with_max_iters(
        self,
        max_iters: usize,
    ) -> Self {
        Self { max_iters, ..self }
    }

    /// Sets the minimum number of EM iterations.
    pub fn with_min_iters(
        self,
        min_iters: usize,
    ) -> Self {
        Self { min_iters, ..self }
    }

    /// Sets the additive smoothing constant.
    pub fn with_smoothing(
        self,
        smoothing: f64,
    ) -> Self {
        Self { smoothing, ..self }
    }

    /// Sets the minimum fraction of the vocabulary removed per prune.
    pub fn with_prune_fraction(
        self,
        prune_fraction: f64,
    ) -> Self {
        Self {
            prune_fraction,
            ..self
        }
    }

    /// The [`SeedOptions`] these options imply.
    pub fn seed_options(&self) -> SeedOptions {
        SeedOptions {
            max_token_len: self.max_token_len,
            min_count: self.seed_min_count,
            max_candidates: self.max_candidates,
        }
    }

    /// Check that the options are usable.
    pub fn validate(&self) -> WLResult<()> {
        if self.target_vocab_size == 0 {
            return Err(LatticeError::InvalidOptions(
                "target_vocab_size must be > 0".to_string(),
            ));
        }
        if self.max_token_len == 0 {
            return Err(LatticeError::InvalidOptions(
                "max_token_len must be > 0".to_string(),
            ));
        }
        if !(self.smoothing >= 0.0 && self.smoothing.is_finite()) {
            return Err(LatticeError::InvalidOptions(format!(
                "smoothing must be a finite value >= 0: {}",
                self.smoothing
            )));
        }
        if !(0.0..=1.0).contains(&self.prune_fraction) {
            return Err(LatticeError::InvalidOptions(format!(
                "prune_fraction must be in [0, 1]: {}",
                self.prune_fraction
            )));
        }
        Ok(())
    }

    /// Initializes a [`UnigramTrainer`] from these options.
    pub fn init(self) -> UnigramTrainer {
        UnigramTrainer::new(self)
    }
}
