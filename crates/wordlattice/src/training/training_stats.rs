//! # Training Diagnostics

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::errors::WLResult;

/// Diagnostics for one EM iteration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IterationStats {
    /// 1-based iteration number.
    pub iteration: usize,

    /// The vocabulary size the expectation pass ran under.
    pub vocab_size: usize,

    /// Total log-likelihood of the segmentable lines.
    pub log_likelihood: f64,

    /// Lines with no segmentation; they contributed nothing.
    pub skipped_lines: usize,

    /// Pieces removed by pruning after the maximization step.
    pub pruned: usize,
}

/// Per-iteration training diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingStats {
    /// Corpus lines dropped because they normalized to nothing.
    pub empty_lines: usize,

    /// One entry per EM iteration.
    pub iterations: Vec<IterationStats>,
}

impl TrainingStats {
    /// The number of EM iterations run.
    pub fn num_iterations(&self) -> usize {
        self.iterations.len()
    }

    /// The log-likelihood curve.
    pub fn log_likelihoods(&self) -> Vec<f64> {
        self.iterations.iter().map(|s| s.log_likelihood).collect()
    }

    /// Write the iterations as JSON lines.
    pub fn write_jsonl<W: Write>(
        &self,
        writer: &mut W,
    ) -> WLResult<()> {
        for stats in &self.iterations {
            serde_json::to_writer(&mut *writer, stats)?;
            writeln!(writer)?;
        }
        Ok(())
    }
}
