/// The tokenizer mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenizerMode {
    /// Encode from text to pieces.
    Encode,

    /// Decode from pieces to text.
    Decode,
}

/// Tokenizer mode argument group.
#[derive(clap::Args, Debug)]
#[group(required = true, multiple = false)]
pub struct TokenizerModeArgs {
    /// Encode from text to pieces.
    #[arg(long, action=clap::ArgAction::SetTrue)]
    encode: bool,

    /// Decode from pieces to text.
    #[arg(long, action=clap::ArgAction::SetTrue)]
    decode: bool,
}

impl TokenizerModeArgs {
    /// Get the tokenizer mode.
    ///
    /// The arg group requires exactly one flag.
    pub fn mode(&self) -> TokenizerMode {
        match (self.encode, self.decode) {
            (false, true) => TokenizerMode::Decode,
            _ => TokenizerMode::Encode,
        }
    }
}
