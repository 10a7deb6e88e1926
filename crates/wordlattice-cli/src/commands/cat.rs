use std::io::{BufRead, Write};

use wordlattice::{UnigramTokenizer, io::load_model_path, tokenizer::DEFAULT_UNK};

use crate::{
    input_output::{InputArgs, OutputArgs},
    logging::LogArgs,
    tokenizer_mode::{TokenizerMode, TokenizerModeArgs},
};

/// Args for the cat command.
#[derive(clap::Args, Debug)]
pub struct CatArgs {
    /// Model JSON file.
    #[arg(long)]
    model: String,

    /// Unknown-piece symbol.
    #[arg(long, default_value_t = DEFAULT_UNK.to_string())]
    unk: String,

    /// Read and write ids, rather than pieces.
    ///
    /// The unknown symbol's id is one past the model's last id.
    #[arg(long, action=clap::ArgAction::SetTrue)]
    ids: bool,

    #[command(flatten)]
    tokenizer_mode: TokenizerModeArgs,

    #[command(flatten)]
    input: InputArgs,

    #[command(flatten)]
    output: OutputArgs,

    #[clap(flatten)]
    logging: LogArgs,
}

impl CatArgs {
    /// Run the cat command.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.logging.setup_logging(2)?;

        let tokenizer = load_model_path(&self.model)?.to_tokenizer(&self.unk)?;
        log::info!("model: {} ({} pieces)", self.model, tokenizer.vocab().len());
        log::debug!("unknown symbol {:?} has id {}", tokenizer.unk(), tokenizer.unk_id());

        let mut reader = self.input.open_reader()?;
        let mut writer = self.output.open_writer()?;

        match self.tokenizer_mode.mode() {
            TokenizerMode::Encode => run_cat_encode(&mut reader, &mut writer, &tokenizer, self.ids),
            TokenizerMode::Decode => run_cat_decode(&mut reader, &mut writer, &tokenizer, self.ids),
        }
    }
}

/// Each input line becomes one line of space-separated pieces (or ids).
fn run_cat_encode(
    reader: &mut dyn BufRead,
    writer: &mut dyn Write,
    tokenizer: &UnigramTokenizer,
    ids: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    for line in reader.lines() {
        let line = line?;
        let encoded: Vec<String> = if ids {
            tokenizer
                .encode_ids(&line)
                .iter()
                .map(u32::to_string)
                .collect()
        } else {
            tokenizer.encode(&line)
        };

        writeln!(writer, "{}", encoded.join(" "))?;
        writer.flush()?;
    }
    Ok(())
}

/// Each line of space-separated pieces (or ids) becomes one line of text.
fn run_cat_decode(
    reader: &mut dyn BufRead,
    writer: &mut dyn Write,
    tokenizer: &UnigramTokenizer,
    ids: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    for line in reader.lines() {
        let line = line?;
        let text = if ids {
            let ids = line
                .split_whitespace()
                .map(str::parse)
                .collect::<Result<Vec<u32>, _>>()?;
            tokenizer.decode_ids(&ids)
        } else {
            let pieces: Vec<&str> = line.split_whitespace().collect();
            tokenizer.decode(&pieces)
        };

        writeln!(writer, "{text}")?;
        writer.flush()?;
    }
    Ok(())
}
