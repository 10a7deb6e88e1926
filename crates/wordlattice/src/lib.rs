//! # `wordlattice` Unigram Tokenizer Training
//!
//! This trains and runs unigram language-model subword tokenizers.
//!
//! A unigram vocabulary assigns each piece a probability; a segmentation
//! of a text is scored by the product of its pieces' probabilities.
//! Training starts from an over-complete set of frequent substrings and
//! refines it by expectation-maximization over token lattices, pruning
//! the least likely pieces until the target size is reached.
//!
//! See:
//! * [`normalize`] for text normalization and word-start marking.
//! * [`vocab`] for the ``{ piece -> probability }`` model.
//! * [`lattice`] for forward-backward expectation and Viterbi decoding.
//! * [`training`] to train a [`vocab::UnigramVocab`].
//! * [`tokenizer`] to encode text into pieces, and decode it back.
//! * [`io`] to save and load trained models as JSON.
//!
//! ## Crate Features
//!
//! #### feature: ``default``
//!
//! * ``ahash``
//! * ``rayon``
//!
//! #### feature: ``ahash``
//!
//! This swaps all HashMap/HashSet implementations for ``ahash``; which is a performance
//! win on many/(most?) modern CPUs.
//!
//! This is done by the ``types::WLHash{*}`` type alias machinery.
//!
//! #### feature: ``rayon``
//!
//! This parallelizes the expectation pass of training, and batch encoding.
//!
//! Lines are folded in fixed-size chunks; chunk results are merged in
//! corpus order, so training output does not depend on the thread count.
//!
//! #### feature: ``tracing``
//!
//! This enables a number of ``tracing`` instrumentation points.
//! This is only useful for timing tracing of the library itself.
//!
//! ## Training a Tokenizer
//!
//! ```rust
//! use wordlattice::{UnigramModel, UnigramTrainerOptions};
//!
//! let corpus = [
//!     "[Q]how are pieces scored?[A]by their unigram probability",
//!     "[Q]how are pieces chosen?[A]by the best path through the lattice",
//! ];
//!
//! let mut trainer = UnigramTrainerOptions::new(40)
//!     .with_max_token_len(8)
//!     .with_seed_min_count(1)
//!     .init();
//! trainer.update_from_samples(corpus);
//!
//! let model: UnigramModel = trainer.train()?.into();
//! let tokenizer = model.to_tokenizer(wordlattice::tokenizer::DEFAULT_UNK)?;
//!
//! let ids = tokenizer.encode_ids("how are pieces chosen?");
//! assert!(!ids.is_empty());
//! # Ok::<(), wordlattice::LatticeError>(())
//! ```
#![warn(missing_docs, unused)]

pub mod errors;
pub mod io;
pub mod lattice;
pub mod normalize;
pub mod tokenizer;
pub mod training;
pub mod types;
pub mod vocab;

#[doc(inline)]
pub use errors::{LatticeError, WLResult};
#[doc(inline)]
pub use io::UnigramModel;
#[doc(inline)]
pub use tokenizer::UnigramTokenizer;
#[doc(inline)]
pub use training::UnigramTrainerOptions;
#[doc(inline)]
pub use vocab::UnigramVocab;
