//! # Seed Candidate Extraction

use serde::{Deserialize, Serialize};

use crate::{
    normalize::{MarkedText, SENTINEL_STR},
    vocab::PieceMap,
};

/// Options for seed candidate extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedOptions {
    /// The longest candidate, in codepoints.
    pub max_token_len: usize,

    /// Candidates seen fewer times are dropped.
    pub min_count: u64,

    /// Keep at most this many of the most frequent candidates.
    pub max_candidates: usize,
}

impl Default for SeedOptions {
    fn default() -> Self {
        Self {
            max_token_len: 24,
            min_count: 2,
            max_candidates: 200_000,
        }
    }
}

/// Count every candidate substring of the lines.
///
/// A substring ``text[i..i + l]`` (with ``l <= max_token_len``) is a candidate if:
/// * it starts on a sentinel (a word-initial piece; it may span more words), or
/// * it contains no sentinel at all (a word-internal piece).
///
/// Pieces which cross a boundary without starting on one are never candidates.
///
/// The sentinel-only piece is given a count of 1 if it was never seen.
///
/// ## Returns
/// ``{ piece -> count }`` in first-seen order.
pub fn count_seed_candidates<'a, I>(
    lines: I,
    max_token_len: usize,
) -> PieceMap<u64>
where
    I: IntoIterator<Item = &'a MarkedText>,
{
    let mut counts: PieceMap<u64> = PieceMap::with_capacity(1024);

    for text in lines {
        let n = text.len();
        for start in 0..n {
            let word_initial = text.is_word_start(start);
            for len in 1..=max_token_len.min(n - start) {
                if !word_initial && text.is_word_start(start + len - 1) {
                    // Every longer piece contains this sentinel too.
                    break;
                }
                *counts.get_or_insert(text.slice(start, start + len), 0) += 1;
            }
        }
    }

    let sentinel = counts.get_or_insert(SENTINEL_STR, 0);
    if *sentinel == 0 {
        *sentinel = 1;
    }

    counts
}

/// Filter and rank candidate counts.
///
/// Drops candidates below `min_count`, sorts by descending count
/// (ties keep first-seen order), and keeps the top `max_candidates`.
pub fn select_seed_candidates(
    counts: PieceMap<u64>,
    options: &SeedOptions,
) -> PieceMap<u64> {
    let mut ranked: Vec<_> = counts
        .into_iter()
        .filter(|(_, count)| *count >= options.min_count)
        .collect();

    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(options.max_candidates);

    ranked.into_iter().collect()
}

/// Extract the seed frequency table from marked lines.
pub fn extract_marked_seed_candidates<'a, I>(
    lines: I,
    options: &SeedOptions,
) -> PieceMap<u64>
where
    I: IntoIterator<Item = &'a MarkedText>,
{
    select_seed_candidates(count_seed_candidates(lines, options.max_token_len), options)
}

/// Extract the seed frequency table from raw corpus lines.
///
/// Lines are normalized and marked; lines which normalize to nothing are skipped.
pub fn extract_seed_candidates<I>(
    corpus: I,
    options: &SeedOptions,
) -> PieceMap<u64>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let lines: Vec<MarkedText> = corpus
        .into_iter()
        .filter_map(|line| MarkedText::from_raw(line.as_ref()))
        .collect();
    extract_marked_seed_candidates(&lines, options)
}
