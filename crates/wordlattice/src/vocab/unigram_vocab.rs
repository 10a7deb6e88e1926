//! # Unigram ``{ piece -> probability }`` Vocabulary

use num_traits::ToPrimitive;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{types::PROB_FLOOR, vocab::PieceMap};

/// A unigram language model over pieces.
///
/// Holds ``{ piece -> p }`` in insertion order, and a cache of ``ln(p)``
/// aligned with the piece positions.
#[derive(Debug, Clone, PartialEq)]
pub struct UnigramVocab {
    probs: PieceMap<f64>,
    log_probs: Vec<f64>,
}

impl Default for UnigramVocab {
    fn default() -> Self {
        Self::from_probs(PieceMap::default())
    }
}

impl UnigramVocab {
    /// Normalize counts into probabilities.
    ///
    /// Each count is divided by the total; a zero total assigns
    /// the uniform `1/len`. Every probability is then clamped up to
    /// [`PROB_FLOOR`]; so the result may sum to slightly more than 1.
    ///
    /// ## Arguments
    /// * `counts` - ``{ piece -> count }``; order is preserved.
    pub fn from_counts<C: ToPrimitive>(counts: PieceMap<C>) -> Self {
        let counts = counts.map_values(|_, c| c.to_f64().unwrap_or(0.0));
        let total: f64 = counts.values().sum();

        let probs = if total == 0.0 {
            let uniform = 1.0 / counts.len() as f64;
            counts.map_values(|_, _| uniform)
        } else {
            counts.map_values(|_, c| (c / total).max(PROB_FLOOR))
        };

        Self::from_probs(probs)
    }

    /// Wrap probabilities as-is.
    pub fn from_probs(probs: PieceMap<f64>) -> Self {
        let log_probs = probs.values().map(|p| p.ln()).collect();
        Self { probs, log_probs }
    }

    /// Re-apply [`Self::from_counts`] to the current probabilities.
    pub fn renormalized(self) -> Self {
        Self::from_counts(self.probs)
    }

    /// Add `piece` with probability `prob`, if it is absent.
    ///
    /// Does not renormalize.
    pub fn with_piece(
        mut self,
        piece: &str,
        prob: f64,
    ) -> Self {
        if !self.probs.contains(piece) {
            self.probs.insert(piece, prob);
            self.log_probs.push(prob.ln());
        }
        self
    }

    /// The number of pieces.
    pub fn len(&self) -> usize {
        self.probs.len()
    }

    /// Is the vocabulary empty?
    pub fn is_empty(&self) -> bool {
        self.probs.is_empty()
    }

    /// Does the vocabulary contain `piece`?
    pub fn contains(
        &self,
        piece: &str,
    ) -> bool {
        self.probs.contains(piece)
    }

    /// The insertion position of `piece`.
    pub fn lookup(
        &self,
        piece: &str,
    ) -> Option<usize> {
        self.probs.position(piece)
    }

    /// The probability of `piece`.
    pub fn prob(
        &self,
        piece: &str,
    ) -> Option<f64> {
        self.probs.get(piece).copied()
    }

    /// The log-probability of `piece`.
    pub fn log_prob(
        &self,
        piece: &str,
    ) -> Option<f64> {
        self.lookup(piece).map(|idx| self.log_probs[idx])
    }

    /// The log-probability at an insertion position.
    pub fn log_prob_at(
        &self,
        idx: usize,
    ) -> f64 {
        self.log_probs[idx]
    }

    /// The piece at an insertion position.
    pub fn piece_at(
        &self,
        idx: usize,
    ) -> Option<&str> {
        self.probs.get_index(idx).map(|(piece, _)| piece)
    }

    /// The sum of all probabilities.
    pub fn total(&self) -> f64 {
        self.probs.values().sum()
    }

    /// The longest piece, in codepoints.
    pub fn max_piece_len(&self) -> usize {
        self.probs
            .pieces()
            .map(|piece| piece.chars().count())
            .max()
            .unwrap_or(0)
    }

    /// Iterate over ``(piece, p)`` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.probs.iter().map(|(k, &p)| (k, p))
    }

    /// Iterate over pieces in insertion order.
    pub fn pieces(&self) -> impl Iterator<Item = &str> {
        self.probs.pieces()
    }

    /// The underlying ``{ piece -> p }`` map.
    pub fn probs(&self) -> &PieceMap<f64> {
        &self.probs
    }

    /// Release the underlying ``{ piece -> p }`` map.
    pub fn into_probs(self) -> PieceMap<f64> {
        self.probs
    }
}

impl Serialize for UnigramVocab {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        self.probs.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for UnigramVocab {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        PieceMap::<f64>::deserialize(deserializer).map(Self::from_probs)
    }
}
