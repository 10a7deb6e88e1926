//! # Token Lattice

use crate::{normalize::MarkedText, vocab::UnigramVocab};

/// An edge ``(start, start + len)`` labelled with a vocabulary piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatticeEdge {
    /// The edge length, in codepoints.
    pub len: usize,

    /// The piece's position in the vocabulary.
    pub piece: usize,
}

/// The segmentation lattice of one [`MarkedText`] under a [`UnigramVocab`].
///
/// Node `i` in ``0..=n`` is a codepoint offset; `edges[i]` holds every
/// vocabulary piece starting at `i`, in ascending length order.
///
/// Built per call; never persisted.
#[derive(Debug, Clone)]
pub struct Lattice<'a> {
    text: &'a MarkedText,
    vocab: &'a UnigramVocab,
    edges: Vec<Vec<LatticeEdge>>,
}

impl<'a> Lattice<'a> {
    /// Build the lattice.
    ///
    /// ## Arguments
    /// * `text` - the marked text to segment.
    /// * `vocab` - the pieces and their probabilities.
    /// * `max_token_len` - the longest piece to consider, in codepoints.
    pub fn new(
        text: &'a MarkedText,
        vocab: &'a UnigramVocab,
        max_token_len: usize,
    ) -> Self {
        let n = text.len();
        let edges = (0..n)
            .map(|start| {
                let max_len = max_token_len.min(n - start);
                (1..=max_len)
                    .filter_map(|len| {
                        vocab
                            .lookup(text.slice(start, start + len))
                            .map(|piece| LatticeEdge { len, piece })
                    })
                    .collect()
            })
            .collect();

        Self { text, vocab, edges }
    }

    /// The segmented text.
    pub fn text(&self) -> &'a MarkedText {
        self.text
    }

    /// The vocabulary.
    pub fn vocab(&self) -> &'a UnigramVocab {
        self.vocab
    }

    /// The number of codepoints; the final node.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Is the lattice over empty text?
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// The edges leaving node `start`.
    pub fn edges_from(
        &self,
        start: usize,
    ) -> &[LatticeEdge] {
        &self.edges[start]
    }

    /// The log-probability of an edge's piece.
    pub fn edge_log_prob(
        &self,
        edge: &LatticeEdge,
    ) -> f64 {
        self.vocab.log_prob_at(edge.piece)
    }

    /// The text covered by an edge leaving `start`.
    pub fn edge_text(
        &self,
        start: usize,
        edge: &LatticeEdge,
    ) -> &'a str {
        self.text.slice(start, start + edge.len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::testing::{marked, toy_vocab};

    #[test]
    fn test_edges() {
        let vocab = toy_vocab();
        let text = marked("ab");
        let lattice = Lattice::new(&text, &vocab, 8);

        assert_eq!(lattice.len(), 3);
        assert!(!lattice.is_empty());

        let texts = |start: usize| {
            lattice
                .edges_from(start)
                .iter()
                .map(|e| lattice.edge_text(start, e))
                .collect::<Vec<_>>()
        };
        assert_eq!(texts(0), vec!["\u{2581}"]);
        assert_eq!(texts(1), vec!["a", "ab"]);
        assert_eq!(texts(2), vec!["b"]);

        let edge = lattice.edges_from(1)[1];
        assert_eq!(edge.len, 2);
        assert!((lattice.edge_log_prob(&edge) - 0.2f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_max_token_len_limits_edges() {
        let vocab = toy_vocab();
        let text = marked("ab");
        let lattice = Lattice::new(&text, &vocab, 1);

        assert_eq!(lattice.edges_from(1).len(), 1);
        assert!(lattice.edges_from(1).iter().all(|e| e.len == 1));
    }
}
