//! # Vocabulary Pruning

use compact_str::CompactString;

use crate::{normalize::SENTINEL_STR, types::WLHashSet, vocab::UnigramVocab};

/// The number of pieces one prune call should remove.
///
/// ``max(floor(len * fraction), len - target)``.
pub fn prune_count(
    vocab_size: usize,
    target_vocab_size: usize,
    prune_fraction: f64,
) -> usize {
    let by_fraction = (vocab_size as f64 * prune_fraction) as usize;
    by_fraction.max(vocab_size.saturating_sub(target_vocab_size))
}

/// Remove the lowest-probability pieces, and renormalize.
///
/// Pieces are ranked by ascending probability; equal probabilities
/// keep vocabulary order, so earlier pieces are removed first.
/// The sentinel piece is never removed. If fewer removable pieces exist
/// than requested, only those are removed.
///
/// The removal set is computed from a snapshot; survivors are copied
/// into a new vocabulary in their original order.
///
/// ## Returns
/// The pruned vocabulary, and the number of pieces removed.
pub fn prune_vocab(
    vocab: UnigramVocab,
    target_vocab_size: usize,
    prune_fraction: f64,
) -> (UnigramVocab, usize) {
    let wanted = prune_count(vocab.len(), target_vocab_size, prune_fraction);
    if wanted == 0 {
        return (vocab, 0);
    }

    let mut ranked: Vec<(&str, f64)> = vocab.iter().collect();
    ranked.sort_by(|a, b| a.1.total_cmp(&b.1));

    let removed: WLHashSet<CompactString> = ranked
        .into_iter()
        .filter(|(piece, _)| *piece != SENTINEL_STR)
        .take(wanted)
        .map(|(piece, _)| piece.into())
        .collect();

    let count = removed.len();
    if count < wanted {
        log::debug!("prune wanted {wanted} pieces; only {count} are removable");
    }

    let survivors = vocab.into_probs().without(&removed);
    (UnigramVocab::from_counts(survivors), count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::PieceMap;

    fn vocab_of(entries: &[(&str, f64)]) -> UnigramVocab {
        UnigramVocab::from_probs(entries.iter().copied().collect::<PieceMap<f64>>())
    }

    #[test]
    fn test_prune_count() {
        assert_eq!(prune_count(100, 90, 0.2), 20);
        assert_eq!(prune_count(100, 50, 0.2), 50);
        assert_eq!(prune_count(4, 10, 0.2), 0);
        assert_eq!(prune_count(10, 10, 0.2), 2);
    }

    #[test]
    fn test_prune_removes_lowest() {
        let vocab = vocab_of(&[
            (SENTINEL_STR, 0.01),
            ("a", 0.4),
            ("b", 0.3),
            ("c", 0.02),
            ("d", 0.27),
        ]);

        let (pruned, removed) = prune_vocab(vocab, 3, 0.2);
        assert_eq!(removed, 2);
        assert_eq!(pruned.pieces().collect::<Vec<_>>(), vec![SENTINEL_STR, "a", "b"]);
        assert!((pruned.total() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_prune_ties_remove_earlier_first() {
        let vocab = vocab_of(&[
            (SENTINEL_STR, 0.2),
            ("x", 0.2),
            ("y", 0.2),
            ("z", 0.2),
            ("w", 0.2),
        ]);

        let (pruned, removed) = prune_vocab(vocab, 4, 0.2);
        assert_eq!(removed, 1);
        assert_eq!(
            pruned.pieces().collect::<Vec<_>>(),
            vec![SENTINEL_STR, "y", "z", "w"]
        );
    }

    #[test]
    fn test_prune_underflow_keeps_sentinel() {
        let vocab = vocab_of(&[(SENTINEL_STR, 0.5), ("a", 0.3), ("b", 0.2)]);

        let (pruned, removed) = prune_vocab(vocab, 0, 0.2);
        assert_eq!(removed, 2);
        assert_eq!(pruned.len(), 1);
        assert_eq!(pruned.prob(SENTINEL_STR), Some(1.0));

        let (again, removed) = prune_vocab(pruned, 0, 0.2);
        assert_eq!(removed, 0);
        assert_eq!(again.len(), 1);
    }

    #[test]
    fn test_prune_noop() {
        let vocab = vocab_of(&[(SENTINEL_STR, 0.5), ("a", 0.5)]);
        let (same, removed) = prune_vocab(vocab.clone(), 10, 0.2);
        assert_eq!(removed, 0);
        assert_eq!(same, vocab);
    }
}
