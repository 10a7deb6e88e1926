//! # Forward-Backward Expectation

use crate::{
    lattice::{Lattice, LogProb},
    vocab::PieceMap,
};

/// The expected piece usage of one line.
#[derive(Debug, Clone, PartialEq)]
pub struct LineExpectation {
    /// ``ln Z``: the log of the total probability of all segmentations.
    pub log_likelihood: f64,

    /// Posterior expected count per piece, in lattice encounter order.
    pub counts: PieceMap<f64>,
}

impl Lattice<'_> {
    /// ``alpha[i]``: log-sum over all segmentations of the prefix ``[0, i)``.
    pub fn forward(&self) -> Vec<LogProb> {
        let n = self.len();
        let mut alpha = vec![LogProb::Impossible; n + 1];
        alpha[0] = LogProb::ONE;

        for start in 0..n {
            let head = alpha[start];
            if !head.is_possible() {
                continue;
            }
            for edge in self.edges_from(start) {
                let end = start + edge.len;
                alpha[end] = alpha[end].plus(head.times_ln(self.edge_log_prob(edge)));
            }
        }

        alpha
    }

    /// ``beta[i]``: log-sum over all segmentations of the suffix ``[i, n)``.
    pub fn backward(&self) -> Vec<LogProb> {
        let n = self.len();
        let mut beta = vec![LogProb::Impossible; n + 1];
        beta[n] = LogProb::ONE;

        for start in (0..n).rev() {
            let mut acc = LogProb::Impossible;
            for edge in self.edges_from(start) {
                acc = acc.plus(beta[start + edge.len].times_ln(self.edge_log_prob(edge)));
            }
            beta[start] = acc;
        }

        beta
    }

    /// The total log-probability of the text; ``alpha[n]``.
    pub fn log_likelihood(&self) -> LogProb {
        self.forward()[self.len()]
    }

    /// Compute posterior expected piece counts.
    ///
    /// Each edge ``(i, piece, l)`` contributes
    /// ``exp(alpha[i] + ln p(piece) + beta[i + l] - ln Z)``.
    ///
    /// Edges which lie on no complete path contribute nothing,
    /// and their pieces are not recorded.
    ///
    /// ## Returns
    /// `None` if the text has no segmentation (``Z = 0``).
    pub fn expectation(&self) -> Option<LineExpectation> {
        let n = self.len();
        let alpha = self.forward();
        let z = alpha[n].ln()?;

        let beta = self.backward();

        let mut counts: PieceMap<f64> = PieceMap::new();
        for start in 0..n {
            let head = alpha[start];
            if !head.is_possible() {
                continue;
            }
            for edge in self.edges_from(start) {
                let path = head
                    .times_ln(self.edge_log_prob(edge))
                    .times(beta[start + edge.len]);
                if let LogProb::Ln(log_path) = path {
                    let piece = self.edge_text(start, edge);
                    *counts.get_or_insert(piece, 0.0) += (log_path - z).exp();
                }
            }
        }

        Some(LineExpectation {
            log_likelihood: z,
            counts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        lattice::testing::{brute_force_segmentations, marked, toy_vocab},
        normalize::SENTINEL_STR,
        vocab::UnigramVocab,
    };

    #[test]
    fn test_log_likelihood_matches_brute_force() {
        let vocab = toy_vocab();

        for raw in ["ab", "a b", "ba ab", "abab"] {
            let text = marked(raw);
            let lattice = Lattice::new(&text, &vocab, 8);

            let total: f64 = brute_force_segmentations(&text, &vocab, 8)
                .iter()
                .map(|(_, p)| p)
                .sum();

            let z = lattice.log_likelihood().ln().unwrap();
            assert!((z - total.ln()).abs() < 1e-9, "{raw:?}: {z} != {}", total.ln());

            let beta = lattice.backward();
            assert!((beta[0].ln().unwrap() - z).abs() < 1e-9);
        }
    }

    #[test]
    fn test_toy_expectation() {
        // Segmentations of "▁ab":
        //   ▁ | a | b  = 0.1 * 0.4 * 0.3 = 0.012
        //   ▁ | ab     = 0.1 * 0.2       = 0.020
        let vocab = toy_vocab();
        let text = marked("ab");
        let lattice = Lattice::new(&text, &vocab, 8);

        let exp = lattice.expectation().unwrap();
        assert!((exp.log_likelihood - 0.032f64.ln()).abs() < 1e-12);

        assert_eq!(
            exp.counts.pieces().collect::<Vec<_>>(),
            vec![SENTINEL_STR, "a", "ab", "b"]
        );

        let get = |piece: &str| *exp.counts.get(piece).unwrap();
        assert!((get(SENTINEL_STR) - 1.0).abs() < 1e-12);
        assert!((get("a") - 0.012 / 0.032).abs() < 1e-12);
        assert!((get("b") - 0.012 / 0.032).abs() < 1e-12);
        assert!((get("ab") - 0.020 / 0.032).abs() < 1e-12);
    }

    #[test]
    fn test_expectation_matches_brute_force() {
        let vocab = toy_vocab();
        let text = marked("abab ba");
        let lattice = Lattice::new(&text, &vocab, 8);
        let exp = lattice.expectation().unwrap();

        let segs = brute_force_segmentations(&text, &vocab, 8);
        let total: f64 = segs.iter().map(|(_, p)| p).sum();

        let mut expected: PieceMap<f64> = PieceMap::new();
        for (pieces, p) in &segs {
            for piece in pieces {
                *expected.get_or_insert(piece, 0.0) += p / total;
            }
        }

        assert_eq!(exp.counts.len(), expected.len());
        for (piece, &count) in expected.iter() {
            let got = *exp.counts.get(piece).unwrap();
            assert!((got - count).abs() < 1e-9, "{piece:?}: {got} != {count}");
        }
    }

    #[test]
    fn test_unsegmentable() {
        let vocab = toy_vocab();
        let text = marked("abc");
        let lattice = Lattice::new(&text, &vocab, 8);

        assert_eq!(lattice.log_likelihood(), LogProb::Impossible);
        assert_eq!(lattice.expectation(), None);
    }

    #[test]
    fn test_dead_end_pieces_are_not_counted() {
        // "▁ab": the "▁a" edge reaches node 2, but nothing covers "b".
        let probs: PieceMap<f64> = [(SENTINEL_STR, 0.25), ("\u{2581}a", 0.25), ("ab", 0.5)]
            .into_iter()
            .collect();
        let vocab = UnigramVocab::from_probs(probs);
        let text = marked("ab");
        let lattice = Lattice::new(&text, &vocab, 8);

        let exp = lattice.expectation().unwrap();
        assert!((exp.log_likelihood - 0.125f64.ln()).abs() < 1e-12);
        assert_eq!(exp.counts.pieces().collect::<Vec<_>>(), vec![SENTINEL_STR, "ab"]);
    }

    #[test]
    fn test_empty_text() {
        let vocab = toy_vocab();
        let text = crate::normalize::MarkedText::from_marked(String::new());
        let lattice = Lattice::new(&text, &vocab, 8);

        let exp = lattice.expectation().unwrap();
        assert_eq!(exp.log_likelihood, 0.0);
        assert!(exp.counts.is_empty());
    }
}
