mod commands;
mod corpus;
mod input_output;
mod logging;
mod tokenizer_mode;

use clap::Parser;
use commands::Commands;

/// wlattice: train and run unigram tokenizers.
#[derive(clap::Parser, Debug)]
#[command(name = "wlattice")]
pub struct Args {
    /// Subcommand to run.
    #[clap(subcommand)]
    pub command: Commands,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    args.command.run()
}
