//! # Vocabulary
//!
//! * [`PieceMap`] - an insertion-ordered ``{ piece -> V }`` table.
//! * [`UnigramVocab`] - the ``{ piece -> p }`` probability model.

mod piece_map;
mod unigram_vocab;

#[doc(inline)]
pub use piece_map::PieceMap;
#[doc(inline)]
pub use unigram_vocab::UnigramVocab;
