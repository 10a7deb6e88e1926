//! # Viterbi Best Path

use crate::lattice::Lattice;

/// The result of a best-path search.
#[derive(Debug, Clone, PartialEq)]
pub enum BestPath<'a> {
    /// The highest-probability segmentation.
    Found {
        /// The pieces, in text order.
        pieces: Vec<&'a str>,

        /// The total log-probability of the path.
        log_prob: f64,
    },

    /// No path covers the text; it is emitted codepoint by codepoint.
    ///
    /// These pieces bypass the vocabulary; consumers map the ones
    /// the vocabulary lacks to an unknown symbol.
    Unsegmentable {
        /// The text as single-codepoint pieces.
        codepoints: Vec<&'a str>,
    },
}

impl<'a> BestPath<'a> {
    /// Was a path through the lattice found?
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found { .. })
    }

    /// The emitted pieces.
    pub fn pieces(&self) -> &[&'a str] {
        match self {
            Self::Found { pieces, .. } => pieces,
            Self::Unsegmentable { codepoints } => codepoints,
        }
    }

    /// Release the emitted pieces.
    pub fn into_pieces(self) -> Vec<&'a str> {
        match self {
            Self::Found { pieces, .. } => pieces,
            Self::Unsegmentable { codepoints } => codepoints,
        }
    }
}

/// The best way found so far to reach a node.
#[derive(Debug, Clone, Copy)]
struct Arrival {
    score: f64,
    prev: usize,
}

impl<'a> Lattice<'a> {
    /// Find the highest-probability segmentation.
    ///
    /// Ties keep the first arrival found; i.e. the one from the
    /// earliest start node, then the shortest edge.
    pub fn viterbi(&self) -> BestPath<'a> {
        let n = self.len();
        let text = self.text();

        let mut best: Vec<Option<Arrival>> = vec![None; n + 1];
        best[0] = Some(Arrival {
            score: 0.0,
            prev: 0,
        });

        for start in 0..n {
            let Some(head) = best[start] else {
                continue;
            };
            for edge in self.edges_from(start) {
                let score = head.score + self.edge_log_prob(edge);
                let slot = &mut best[start + edge.len];
                if slot.is_none_or(|a| score > a.score) {
                    *slot = Some(Arrival { score, prev: start });
                }
            }
        }

        let Some(last) = best[n] else {
            return BestPath::Unsegmentable {
                codepoints: text.codepoints().collect(),
            };
        };

        let mut pieces = Vec::new();
        let mut cur = n;
        while cur > 0 {
            // Every reachable node past 0 was reached from an earlier node.
            let prev = best[cur].map_or(0, |a| a.prev);
            pieces.push(text.slice(prev, cur));
            cur = prev;
        }
        pieces.reverse();

        BestPath::Found {
            pieces,
            log_prob: last.score,
        }
    }
}
