//! # Unigram EM Trainer

use crate::{
    errors::WLResult,
    lattice::{Lattice, LineExpectation},
    normalize::{MarkedText, SENTINEL_STR},
    tokenizer::UnigramTokenizer,
    training::{
        IterationStats,
        TrainingStats,
        UnigramTrainerOptions,
        extract_marked_seed_candidates,
        prune_vocab,
    },
    types::PROB_FLOOR,
    vocab::{PieceMap, UnigramVocab},
};

/// Lines per expectation chunk.
///
/// Chunk boundaries fix the order in which partial sums are merged,
/// so results do not depend on the thread count.
pub const EXPECTATION_CHUNK_SIZE: usize = 256;

/// Corpus-wide results of one expectation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct CorpusExpectation {
    /// Expected piece counts, summed over lines; in encounter order.
    pub counts: PieceMap<f64>,

    /// Total log-likelihood of the segmentable lines.
    pub log_likelihood: f64,

    /// Lines with no segmentation.
    pub skipped_lines: usize,
}

impl Default for CorpusExpectation {
    fn default() -> Self {
        Self {
            counts: PieceMap::with_capacity(1024),
            log_likelihood: 0.0,
            skipped_lines: 0,
        }
    }
}

impl CorpusExpectation {
    /// Fold per-line results, in order.
    pub fn from_lines<I>(lines: I) -> Self
    where
        I: IntoIterator<Item = Option<LineExpectation>>,
    {
        let mut acc = Self::default();
        for line in lines {
            acc.add_line(line);
        }
        acc
    }

    /// Add one line's result; `None` marks an unsegmentable line.
    pub fn add_line(
        &mut self,
        line: Option<LineExpectation>,
    ) {
        let Some(line) = line else {
            self.skipped_lines += 1;
            return;
        };
        self.log_likelihood += line.log_likelihood;
        self.add_counts(line.counts);
    }

    /// Merge the results of a later run of lines.
    ///
    /// Pieces first seen in `other` are appended in its order.
    pub fn merge(
        &mut self,
        other: CorpusExpectation,
    ) {
        self.log_likelihood += other.log_likelihood;
        self.skipped_lines += other.skipped_lines;
        self.add_counts(other.counts);
    }

    fn add_counts(
        &mut self,
        counts: PieceMap<f64>,
    ) {
        for (piece, count) in counts {
            *self.counts.get_or_insert(&piece, 0.0) += count;
        }
    }
}

/// The M-step: smooth the expected counts, and renormalize.
///
/// Only observed pieces receive the smoothing mass; the sentinel is
/// re-inserted with it if the pass never used it.
pub fn maximize(
    mut counts: PieceMap<f64>,
    smoothing: f64,
) -> UnigramVocab {
    counts.get_or_insert(SENTINEL_STR, 0.0);
    UnigramVocab::from_counts(counts.map_values(|_, c| c + smoothing))
}

/// Trained vocabulary results.
#[derive(Debug, Clone)]
pub struct TrainResults {
    /// The trained vocabulary.
    pub vocab: UnigramVocab,

    /// The longest piece considered, in codepoints.
    pub max_token_len: usize,

    /// Per-iteration diagnostics.
    pub stats: TrainingStats,
}

impl TrainResults {
    /// Build a tokenizer over the trained vocabulary.
    pub fn to_tokenizer(
        &self,
        unk: &str,
    ) -> WLResult<UnigramTokenizer> {
        UnigramTokenizer::new(self.vocab.clone(), self.max_token_len, unk)
    }
}

/// Trainer for unigram language-model vocabularies.
///
/// Samples are normalized and marked as they are added;
/// [`UnigramTrainer::train`] then seeds a vocabulary and refines it by EM.
pub struct UnigramTrainer {
    /// Trainer options.
    pub options: UnigramTrainerOptions,

    lines: Vec<MarkedText>,

    empty_lines: usize,
}

impl UnigramTrainer {
    /// Initializes a [`UnigramTrainer`].
    pub fn new(options: UnigramTrainerOptions) -> Self {
        Self {
            options,
            lines: Vec::new(),
            empty_lines: 0,
        }
    }

    /// The marked corpus lines.
    pub fn lines(&self) -> &[MarkedText] {
        &self.lines
    }

    /// Add corpus lines.
    ///
    /// Lines which normalize to nothing are dropped.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, samples)))]
    pub fn update_from_samples<I>(
        &mut self,
        samples: I,
    ) where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        for sample in samples {
            match MarkedText::from_raw(sample.as_ref()) {
                Some(line) => self.lines.push(line),
                None => {
                    log::debug!("dropping empty line");
                    self.empty_lines += 1;
                }
            }
        }
    }

    /// Build the initial vocabulary from seed candidates.
    ///
    /// The sentinel is always present.
    pub fn seed_vocab(&self) -> UnigramVocab {
        let seeds = extract_marked_seed_candidates(&self.lines, &self.options.seed_options());
        log::info!("Seed candidates: {}", seeds.len());

        UnigramVocab::from_counts(seeds)
            .with_piece(SENTINEL_STR, PROB_FLOOR)
            .renormalized()
    }

    /// Run the expectation pass over every line.
    ///
    /// Lines are folded in chunks of [`EXPECTATION_CHUNK_SIZE`];
    /// chunk partials are merged in corpus order.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, vocab)))]
    pub fn expectation_pass(
        &self,
        vocab: &UnigramVocab,
    ) -> CorpusExpectation {
        let max_token_len = self.options.max_token_len;
        let expect_chunk = |chunk: &[MarkedText]| {
            CorpusExpectation::from_lines(
                chunk
                    .iter()
                    .map(|line| Lattice::new(line, vocab, max_token_len).expectation()),
            )
        };

        #[cfg(feature = "rayon")]
        let partials: Vec<CorpusExpectation> = {
            use rayon::prelude::*;
            self.lines
                .par_chunks(EXPECTATION_CHUNK_SIZE)
                .map(expect_chunk)
                .collect()
        };
        #[cfg(not(feature = "rayon"))]
        let partials = self.lines.chunks(EXPECTATION_CHUNK_SIZE).map(expect_chunk);

        let mut pass = CorpusExpectation::default();
        for partial in partials {
            pass.merge(partial);
        }
        pass
    }

    /// Refine `vocab` by EM, pruning toward the target size.
    ///
    /// Stops once the vocabulary is within the target and at least
    /// `min_iters` iterations have run; or after `max_iters`.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, vocab)))]
    pub fn run_em(
        &self,
        mut vocab: UnigramVocab,
    ) -> (UnigramVocab, TrainingStats) {
        let options = &self.options;
        let mut stats = TrainingStats {
            empty_lines: self.empty_lines,
            iterations: Vec::with_capacity(options.max_iters),
        };

        for iteration in 1..=options.max_iters {
            let vocab_size = vocab.len();
            let pass = self.expectation_pass(&vocab);

            log::info!(
                "Iteration {iteration}: vocab size {vocab_size}, log likelihood {:.2}",
                pass.log_likelihood
            );
            if pass.skipped_lines > 0 {
                log::debug!("Iteration {iteration}: {} unsegmentable lines", pass.skipped_lines);
            }

            vocab = maximize(pass.counts, options.smoothing);

            let mut pruned = 0;
            if vocab.len() > options.target_vocab_size {
                (vocab, pruned) =
                    prune_vocab(vocab, options.target_vocab_size, options.prune_fraction);
                log::info!("Pruned {pruned} pieces; vocab size {}", vocab.len());
            }

            stats.iterations.push(IterationStats {
                iteration,
                vocab_size,
                log_likelihood: pass.log_likelihood,
                skipped_lines: pass.skipped_lines,
                pruned,
            });

            if vocab.len() <= options.target_vocab_size && iteration >= options.min_iters {
                break;
            }
        }

        (vocab.renormalized(), stats)
    }

    /// Trains a [`UnigramVocab`].
    ///
    /// ## Returns
    /// A `Result` containing the [`TrainResults`], or an options error.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self)))]
    pub fn train(self) -> WLResult<TrainResults> {
        self.options.validate()?;

        log::info!(
            "Starting unigram training: {} lines, target vocab size {}",
            self.lines.len(),
            self.options.target_vocab_size
        );

        let vocab = self.seed_vocab();
        let (vocab, stats) = self.run_em(vocab);

        log::info!(
            "Finished training: {} iterations, vocab size {}",
            stats.num_iterations(),
            vocab.len()
        );

        Ok(TrainResults {
            vocab,
            max_token_len: self.options.max_token_len,
            stats,
        })
    }
}

/// Train a vocabulary from raw corpus lines.
pub fn train_unigram_vocab<I>(
    corpus: I,
    options: UnigramTrainerOptions,
) -> WLResult<TrainResults>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut trainer = options.init();
    trainer.update_from_samples(corpus);
    trainer.train()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::LatticeError;

    const CORPUS: &[&str] = &[
        "[Q]what is a lattice?[A]a graph of all segmentations",
        "[Q]what is a token?[A]a piece of a word",
        "[Q]what is a piece?[A]a substring in the vocabulary",
        "[Q]is the sentinel a piece?[A]it is always a piece",
        "   ",
    ];

    #[test]
    fn test_update_from_samples() {
        let mut trainer = UnigramTrainerOptions::new(100).init();
        trainer.update_from_samples(["a  b", "", " \t ", "c"]);

        assert_eq!(trainer.lines().len(), 2);
        assert_eq!(trainer.lines()[0].as_str(), "\u{2581}a\u{2581}b");
        assert_eq!(trainer.empty_lines, 2);
    }

    #[test]
    fn test_seed_vocab_has_sentinel() {
        let mut trainer = UnigramTrainerOptions::new(100).with_seed_min_count(5).init();
        trainer.update_from_samples(["x"]);

        let vocab = trainer.seed_vocab();
        assert_eq!(vocab.pieces().collect::<Vec<_>>(), vec![SENTINEL_STR]);
        assert!((vocab.total() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_maximize() {
        let counts: PieceMap<f64> = [("a", 3.0), ("b", 1.0)].into_iter().collect();
        let vocab = maximize(counts, 0.0);

        assert_eq!(vocab.pieces().collect::<Vec<_>>(), vec!["a", "b", SENTINEL_STR]);
        assert_eq!(vocab.prob("a"), Some(0.75));
        assert_eq!(vocab.prob(SENTINEL_STR), Some(PROB_FLOOR));
    }

    #[test]
    fn test_corpus_expectation_skips_unsegmentable() {
        let counts: PieceMap<f64> = [("a", 1.0)].into_iter().collect();
        let lines = vec![
            Some(LineExpectation {
                log_likelihood: -1.0,
                counts: counts.clone(),
            }),
            None,
            Some(LineExpectation {
                log_likelihood: -2.0,
                counts,
            }),
        ];

        let pass = CorpusExpectation::from_lines(lines);
        assert_eq!(pass.log_likelihood, -3.0);
        assert_eq!(pass.skipped_lines, 1);
        assert_eq!(pass.counts.get("a"), Some(&2.0));
    }

    #[test]
    fn test_expectation_pass_across_chunks() {
        let samples: Vec<String> = (0..EXPECTATION_CHUNK_SIZE * 2 + 17)
            .map(|i| format!("{} {i}", CORPUS[i % 4]))
            .collect();

        let mut trainer = UnigramTrainerOptions::new(100)
            .with_max_token_len(4)
            .with_seed_min_count(2)
            .init();
        trainer.update_from_samples(&samples);
        let vocab = trainer.seed_vocab();

        let pass = trainer.expectation_pass(&vocab);
        assert_eq!(pass, trainer.expectation_pass(&vocab));

        let sequential = CorpusExpectation::from_lines(
            trainer
                .lines()
                .iter()
                .map(|line| Lattice::new(line, &vocab, 4).expectation()),
        );
        assert_eq!(
            pass.counts.pieces().collect::<Vec<_>>(),
            sequential.counts.pieces().collect::<Vec<_>>()
        );
        for ((_, a), (_, b)) in pass.counts.iter().zip(sequential.counts.iter()) {
            assert!((a - b).abs() <= 1e-9 * b.abs().max(1.0));
        }
        assert_eq!(pass.skipped_lines, sequential.skipped_lines);
        assert!(
            (pass.log_likelihood - sequential.log_likelihood).abs()
                <= 1e-9 * sequential.log_likelihood.abs()
        );
    }

    #[test]
    fn test_train() {
        let options = UnigramTrainerOptions::new(40)
            .with_max_token_len(6)
            .with_seed_min_count(1)
            .with_max_iters(12);

        let results = train_unigram_vocab(CORPUS, options).unwrap();

        assert!(results.vocab.len() <= 40);
        assert!(results.vocab.contains(SENTINEL_STR));
        assert!((results.vocab.total() - 1.0).abs() < 1e-6);
        assert_eq!(results.max_token_len, 6);
        assert_eq!(results.stats.empty_lines, 1);

        let stats = &results.stats;
        assert!(stats.num_iterations() >= 5);
        assert!(stats.num_iterations() <= 12);
        for pair in stats.iterations.windows(2) {
            assert!(pair[1].vocab_size <= pair[0].vocab_size);
        }
        assert!(stats.log_likelihoods().iter().all(|ll| ll.is_finite()));
    }

    #[test]
    fn test_train_min_iters_is_inclusive() {
        let options = UnigramTrainerOptions::new(10_000)
            .with_max_token_len(3)
            .with_seed_min_count(1);

        let results = train_unigram_vocab(["aab", "ab", "b"], options.clone()).unwrap();
        assert_eq!(results.stats.num_iterations(), 5);

        let results = train_unigram_vocab(["aab", "ab", "b"], options.with_min_iters(6)).unwrap();
        assert_eq!(results.stats.num_iterations(), 6);
    }

    #[test]
    fn test_train_stops_at_max_iters() {
        let options = UnigramTrainerOptions::new(1000)
            .with_max_token_len(4)
            .with_seed_min_count(1)
            .with_max_iters(2);

        let results = train_unigram_vocab(CORPUS, options).unwrap();
        assert_eq!(results.stats.num_iterations(), 2);
    }

    #[test]
    fn test_train_rejects_bad_options() {
        let err = train_unigram_vocab(CORPUS, UnigramTrainerOptions::new(0)).unwrap_err();
        assert!(matches!(err, LatticeError::InvalidOptions(_)));
    }

    #[test]
    fn test_train_empty_corpus() {
        let results = train_unigram_vocab(Vec::<String>::new(), UnigramTrainerOptions::new(10))
            .unwrap();
        assert_eq!(results.vocab.pieces().collect::<Vec<_>>(), vec![SENTINEL_STR]);
    }
}
