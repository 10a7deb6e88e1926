use std::{fs::File, io::BufWriter};

use wordlattice::{
    UnigramModel,
    UnigramTrainerOptions,
    io::write_model,
    training::TrainResults,
};

use crate::{corpus::CorpusArgs, input_output::OutputArgs, logging::LogArgs};

/// Args for the train command.
#[derive(clap::Args, Debug)]
pub struct TrainArgs {
    #[clap(flatten)]
    corpus: CorpusArgs,

    #[clap(flatten)]
    pub logging: LogArgs,

    /// Target vocab size.
    #[arg(long, default_value = "8000")]
    vocab_size: usize,

    /// Longest piece, in codepoints.
    #[arg(long, default_value = "24")]
    max_token_len: usize,

    /// Drop seed candidates seen fewer times.
    #[arg(long, default_value = "2")]
    min_count: u64,

    /// Keep at most this many seed candidates.
    #[arg(long, default_value = "200000")]
    max_candidates: usize,

    /// Most EM iterations.
    #[arg(long, default_value = "20")]
    max_iters: usize,

    /// Optional JSON-lines file for per-iteration statistics.
    #[arg(long, default_value = None)]
    stats_output: Option<String>,

    #[command(flatten)]
    output: OutputArgs,
}

impl TrainArgs {
    fn options(&self) -> UnigramTrainerOptions {
        UnigramTrainerOptions::new(self.vocab_size)
            .with_max_token_len(self.max_token_len)
            .with_seed_min_count(self.min_count)
            .with_max_candidates(self.max_candidates)
            .with_max_iters(self.max_iters)
    }

    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.logging.setup_logging(3)?;

        let mut trainer = self.options().init();
        self.corpus.load_into(&mut trainer)?;

        log::info!("Training Tokenizer...");
        let TrainResults {
            vocab,
            max_token_len,
            stats,
        } = trainer.train()?;

        log::info!("Vocabulary Size: {}", vocab.len());

        if let Some(path) = &self.stats_output {
            log::info!("stats: {path}");
            let mut writer = BufWriter::new(File::create(path)?);
            stats.write_jsonl(&mut writer)?;
        }

        log::info!("output: {}", self.output.describe());
        let model = UnigramModel::new(vocab, max_token_len);
        let mut writer = self.output.open_writer()?;
        write_model(&model, &mut writer)?;

        Ok(())
    }
}
