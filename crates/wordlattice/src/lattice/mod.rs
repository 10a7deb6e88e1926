//! # Segmentation Lattice
//!
//! A [`Lattice`] is the implicit DAG of every piece-aligned segmentation
//! of a [`crate::normalize::MarkedText`]: node `i` is a codepoint offset,
//! and an edge ``(i, i + l)`` exists iff ``text[i..i + l]`` is a vocabulary piece.
//!
//! Two dynamic programs run over it:
//! * [`Lattice::expectation`] - forward-backward; posterior expected piece counts.
//! * [`Lattice::viterbi`] - the single best segmentation.
//!
//! All arithmetic is in the log domain; see [`LogProb`].
//!
//! ```rust
//! use wordlattice::{
//!     lattice::Lattice,
//!     normalize::MarkedText,
//!     vocab::{PieceMap, UnigramVocab},
//! };
//!
//! let probs: PieceMap<f64> = [("\u{2581}", 0.1), ("a", 0.4), ("b", 0.3), ("ab", 0.2)]
//!     .into_iter()
//!     .collect();
//! let vocab = UnigramVocab::from_probs(probs);
//!
//! let text = MarkedText::from_raw("ab").unwrap();
//! let lattice = Lattice::new(&text, &vocab, 8);
//!
//! assert_eq!(lattice.viterbi().pieces(), &["\u{2581}", "ab"]);
//! ```

mod forward_backward;
mod log_prob;
mod token_lattice;
mod viterbi;

#[doc(inline)]
pub use forward_backward::LineExpectation;
#[doc(inline)]
pub use log_prob::LogProb;
#[doc(inline)]
pub use token_lattice::{Lattice, LatticeEdge};
#[doc(inline)]
pub use viterbi::BestPath;
