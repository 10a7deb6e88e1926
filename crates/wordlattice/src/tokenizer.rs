//! # Unigram Tokenizer

use compact_str::CompactString;

use crate::{
    errors::{LatticeError, WLResult},
    lattice::Lattice,
    normalize::{MarkedText, SENTINEL},
    types::PROB_FLOOR,
    vocab::UnigramVocab,
};

/// The default unknown-piece symbol.
pub const DEFAULT_UNK: &str = "<unk>";

/// Encoder/decoder over a frozen [`UnigramVocab`].
///
/// Encoding picks the Viterbi segmentation; any emitted piece the
/// vocabulary lacks is replaced by the unknown symbol. The text under
/// such pieces is lost; decoding cannot restore it.
///
/// Ids are 1-based vocabulary positions; `0` is reserved.
/// An unknown symbol absent from the vocabulary is appended to it,
/// so its id is one past the model's last id.
#[derive(Debug, Clone)]
pub struct UnigramTokenizer {
    vocab: UnigramVocab,
    max_token_len: usize,
    unk: CompactString,
}

impl UnigramTokenizer {
    /// Create a tokenizer.
    ///
    /// The unknown symbol is added to the vocabulary (at [`PROB_FLOOR`],
    /// without renormalizing) if it is absent.
    ///
    /// ## Arguments
    /// * `vocab` - the frozen vocabulary.
    /// * `max_token_len` - the longest piece to consider, in codepoints.
    /// * `unk` - the unknown-piece symbol.
    pub fn new(
        vocab: UnigramVocab,
        max_token_len: usize,
        unk: &str,
    ) -> WLResult<Self> {
        if unk.is_empty() {
            return Err(LatticeError::InvalidOptions(
                "unknown symbol must be non-empty".to_string(),
            ));
        }
        if max_token_len == 0 {
            return Err(LatticeError::InvalidOptions(
                "max_token_len must be > 0".to_string(),
            ));
        }

        Ok(Self {
            vocab: vocab.with_piece(unk, PROB_FLOOR),
            max_token_len,
            unk: unk.into(),
        })
    }

    /// The vocabulary, including the unknown symbol.
    pub fn vocab(&self) -> &UnigramVocab {
        &self.vocab
    }

    /// The longest piece considered, in codepoints.
    pub fn max_token_len(&self) -> usize {
        self.max_token_len
    }

    /// The unknown-piece symbol.
    pub fn unk(&self) -> &str {
        &self.unk
    }

    /// Encode text into pieces.
    pub fn encode(
        &self,
        text: &str,
    ) -> Vec<String> {
        let Some(marked) = MarkedText::from_raw(text) else {
            return Vec::new();
        };

        let path = Lattice::new(&marked, &self.vocab, self.max_token_len).viterbi();
        if !path.is_found() {
            log::debug!("no segmentation for {:?}; emitting codepoints", marked.as_str());
        }

        path.into_pieces()
            .into_iter()
            .map(|piece| {
                let piece = if self.vocab.contains(piece) {
                    piece
                } else {
                    self.unk.as_str()
                };
                piece.to_string()
            })
            .collect()
    }

    /// Encode a batch of texts.
    pub fn encode_batch<S>(
        &self,
        batch: &[S],
    ) -> Vec<Vec<String>>
    where
        S: AsRef<str> + Sync,
    {
        #[cfg(feature = "rayon")]
        let encoded = {
            use rayon::prelude::*;
            batch.par_iter().map(|text| self.encode(text.as_ref())).collect()
        };
        #[cfg(not(feature = "rayon"))]
        let encoded = batch.iter().map(|text| self.encode(text.as_ref())).collect();

        encoded
    }

    /// Decode pieces into text.
    ///
    /// Concatenates the pieces, turns sentinels back into spaces,
    /// and strips the ends.
    pub fn decode<S: AsRef<str>>(
        &self,
        pieces: &[S],
    ) -> String {
        let joined: String = pieces
            .iter()
            .map(|piece| piece.as_ref())
            .collect::<String>()
            .replace(SENTINEL, " ");
        joined.trim().to_string()
    }

    /// The id of a piece.
    pub fn piece_to_id(
        &self,
        piece: &str,
    ) -> Option<u32> {
        self.vocab.lookup(piece).map(|idx| idx as u32 + 1)
    }

    /// The piece for an id.
    pub fn id_to_piece(
        &self,
        id: u32,
    ) -> Option<&str> {
        let idx = (id as usize).checked_sub(1)?;
        self.vocab.piece_at(idx)
    }

    /// The id of the unknown symbol.
    pub fn unk_id(&self) -> u32 {
        self.piece_to_id(&self.unk).unwrap_or(0)
    }

    /// Encode text into ids.
    ///
    /// Unknown pieces encode as [`UnigramTokenizer::unk_id`]. When the
    /// unknown symbol was appended, that id has no entry in the model
    /// file's `decoding` table; [`UnigramTokenizer::decode_ids`] maps it back.
    pub fn encode_ids(
        &self,
        text: &str,
    ) -> Vec<u32> {
        self.encode(text)
            .iter()
            .map(|piece| self.piece_to_id(piece).unwrap_or(0))
            .collect()
    }

    /// Decode ids into text.
    ///
    /// The reserved id `0`, and ids outside the vocabulary,
    /// decode as the unknown symbol.
    pub fn decode_ids(
        &self,
        ids: &[u32],
    ) -> String {
        let pieces: Vec<&str> = ids
            .iter()
            .map(|&id| self.id_to_piece(id).unwrap_or(self.unk.as_str()))
            .collect();
        self.decode(&pieces)
    }
}
