//! # Vocabulary Training
//!
//! Training a unigram vocabulary runs in three stages:
//! 1. Seed: count frequent substrings of the marked corpus
//!    ([`extract_seed_candidates`]); this over-complete vocabulary
//!    covers every single codepoint.
//! 2. EM: alternate the forward-backward expectation pass with
//!    renormalization ([`UnigramTrainer::run_em`]).
//! 3. Prune: after each M-step, drop the lowest-probability pieces
//!    until the target size is reached ([`prune_vocab`]).
//!
//! The sentinel piece is never pruned.
//!
//! ## Training Example
//!
//! ```rust
//! use wordlattice::training::UnigramTrainerOptions;
//!
//! let corpus = [
//!     "[Q]what is a token?[A]a piece of text",
//!     "[Q]what is a piece?[A]a token of text",
//! ];
//!
//! let mut trainer = UnigramTrainerOptions::new(30)
//!     .with_max_token_len(8)
//!     .with_seed_min_count(1)
//!     .init();
//!
//! trainer.update_from_samples(corpus);
//!
//! let results = trainer.train().expect("training failed");
//! assert!(results.vocab.len() <= 30);
//!
//! let tokenizer = results.to_tokenizer("<unk>").unwrap();
//! let pieces = tokenizer.encode("a piece of text");
//! assert!(!pieces.is_empty());
//! ```

mod pruner;
mod seed_candidates;
mod trainer_options;
mod training_stats;
mod unigram_trainer;

#[doc(inline)]
pub use pruner::{prune_count, prune_vocab};
#[doc(inline)]
pub use seed_candidates::{
    SeedOptions,
    count_seed_candidates,
    extract_marked_seed_candidates,
    extract_seed_candidates,
    select_seed_candidates,
};
#[doc(inline)]
pub use trainer_options::UnigramTrainerOptions;
#[doc(inline)]
pub use training_stats::{IterationStats, TrainingStats};
#[doc(inline)]
pub use unigram_trainer::{
    CorpusExpectation,
    EXPECTATION_CHUNK_SIZE,
    TrainResults,
    UnigramTrainer,
    maximize,
    train_unigram_vocab,
};
