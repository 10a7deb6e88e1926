//! # Unigram Model Files

use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use crate::{
    errors::{LatticeError, WLResult},
    normalize::SENTINEL_STR,
    tokenizer::UnigramTokenizer,
    training::TrainResults,
    vocab::{PieceMap, UnigramVocab},
};

/// A frozen vocabulary, with its id tables.
///
/// Ids are assigned ``1..=len`` in vocabulary order when the model is frozen;
/// id `0` is reserved.
///
/// The tables hold only vocabulary pieces. A tokenizer built by
/// [`UnigramModel::to_tokenizer`] gives the unknown symbol id ``len + 1``,
/// which has no entry in `decoding`; readers of the file alone should treat
/// `0` and ids past ``len`` as unknown.
///
/// Serializes as:
/// ```json
/// {
///   "vocab": { "▁": 0.1, "a": 0.4 },
///   "maxTokenLen": 24,
///   "encoding": { "▁": 1, "a": 2 },
///   "decoding": { "1": "▁", "2": "a" }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnigramModel {
    /// ``{ piece -> p }``.
    pub vocab: UnigramVocab,

    /// The longest piece, in codepoints.
    #[serde(rename = "maxTokenLen")]
    pub max_token_len: usize,

    /// ``{ piece -> id }``.
    pub encoding: PieceMap<u32>,

    /// ``{ id -> piece }``.
    pub decoding: BTreeMap<u32, CompactString>,
}

impl From<TrainResults> for UnigramModel {
    fn from(results: TrainResults) -> Self {
        Self::new(results.vocab, results.max_token_len)
    }
}

impl UnigramModel {
    /// Freeze a vocabulary; assigning ids in its current order.
    pub fn new(
        vocab: UnigramVocab,
        max_token_len: usize,
    ) -> Self {
        let encoding: PieceMap<u32> = vocab
            .pieces()
            .enumerate()
            .map(|(idx, piece)| (piece, idx as u32 + 1))
            .collect();

        let decoding: BTreeMap<u32, CompactString> = encoding
            .iter()
            .map(|(piece, &id)| (id, piece.into()))
            .collect();

        Self {
            vocab,
            max_token_len,
            encoding,
            decoding,
        }
    }

    /// The number of pieces.
    pub fn len(&self) -> usize {
        self.vocab.len()
    }

    /// Is the model empty?
    pub fn is_empty(&self) -> bool {
        self.vocab.is_empty()
    }

    /// The id of a piece.
    pub fn token_id(
        &self,
        piece: &str,
    ) -> Option<u32> {
        self.encoding.get(piece).copied()
    }

    /// The piece for an id.
    pub fn id_token(
        &self,
        id: u32,
    ) -> Option<&str> {
        self.decoding.get(&id).map(CompactString::as_str)
    }

    /// Check the model's structure.
    ///
    /// * `maxTokenLen` is positive.
    /// * Every probability is positive and finite.
    /// * `encoding` and `decoding` are mutual inverses over exactly
    ///   the vocabulary's pieces, and never use id `0`.
    /// * The sentinel is present.
    /// * No piece is longer than `maxTokenLen` codepoints.
    pub fn validate(&self) -> WLResult<()> {
        let malformed = |msg: String| Err(LatticeError::MalformedModel(msg));

        if self.max_token_len == 0 {
            return malformed("maxTokenLen must be > 0".to_string());
        }

        if let Some((piece, p)) = self
            .vocab
            .iter()
            .find(|(_, p)| !(p.is_finite() && *p > 0.0))
        {
            return malformed(format!("probability of {piece:?} is not positive: {p}"));
        }

        let k = self.vocab.len();
        if self.encoding.len() != k || self.decoding.len() != k {
            return malformed(format!(
                "table sizes disagree: vocab {k}, encoding {}, decoding {}",
                self.encoding.len(),
                self.decoding.len()
            ));
        }

        for piece in self.vocab.pieces() {
            let Some(id) = self.token_id(piece) else {
                return malformed(format!("no id for {piece:?}"));
            };
            if id == 0 {
                return malformed(format!("{piece:?} uses the reserved id 0"));
            }
            if self.id_token(id) != Some(piece) {
                return malformed(format!("id {id} does not decode to {piece:?}"));
            }
        }

        if !self.vocab.contains(SENTINEL_STR) {
            return malformed(format!("vocab has no sentinel {SENTINEL_STR:?}"));
        }

        if let Some(piece) = self
            .vocab
            .pieces()
            .find(|piece| piece.chars().count() > self.max_token_len)
        {
            return malformed(format!(
                "{piece:?} is longer than maxTokenLen {}",
                self.max_token_len
            ));
        }

        Ok(())
    }

    /// Build a tokenizer over the model.
    pub fn to_tokenizer(
        &self,
        unk: &str,
    ) -> WLResult<UnigramTokenizer> {
        UnigramTokenizer::new(self.vocab.clone(), self.max_token_len, unk)
    }
}

/// Write a [`UnigramModel`] as pretty JSON.
pub fn write_model<W: Write>(
    model: &UnigramModel,
    writer: &mut W,
) -> WLResult<()> {
    serde_json::to_writer_pretty(&mut *writer, model)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Save a [`UnigramModel`] to a JSON file.
pub fn save_model_path<P: AsRef<Path>>(
    model: &UnigramModel,
    path: P,
) -> WLResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_model(model, &mut writer)
}

/// Read a [`UnigramModel`] from JSON.
///
/// ## Returns
/// [`LatticeError::MalformedModel`] if keys are missing,
/// or the tables are inconsistent.
pub fn read_model<R: Read>(reader: R) -> WLResult<UnigramModel> {
    let model: UnigramModel = serde_json::from_reader(reader).map_err(|e| {
        if e.is_io() {
            LatticeError::Io(e.into())
        } else {
            LatticeError::MalformedModel(e.to_string())
        }
    })?;

    model.validate()?;
    Ok(model)
}

/// Load a [`UnigramModel`] from a JSON file.
pub fn load_model_path<P: AsRef<Path>>(path: P) -> WLResult<UnigramModel> {
    read_model(BufReader::new(File::open(path)?))
}
