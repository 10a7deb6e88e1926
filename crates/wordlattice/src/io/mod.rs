//! # Model IO
//!
//! Trained models are stored as human-readable JSON;
//! see [`UnigramModel`] for the layout.
//!
//! ```rust,no_run
//! use wordlattice::{
//!     io::{UnigramModel, load_model_path, save_model_path},
//!     tokenizer::DEFAULT_UNK,
//!     training::UnigramTrainerOptions,
//! };
//!
//! fn example(corpus: &[String]) -> wordlattice::WLResult<()> {
//!     let mut trainer = UnigramTrainerOptions::new(8000).init();
//!     trainer.update_from_samples(corpus);
//!
//!     let model: UnigramModel = trainer.train()?.into();
//!     save_model_path(&model, "tokenizer.json")?;
//!
//!     let tokenizer = load_model_path("tokenizer.json")?.to_tokenizer(DEFAULT_UNK)?;
//!     println!("{:?}", tokenizer.encode("[Q]hello[A]world"));
//!     Ok(())
//! }
//! ```

mod model_file;

#[doc(inline)]
pub use model_file::*;
