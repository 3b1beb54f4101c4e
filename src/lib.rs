//! Library entrypoint for `semproc`.
//!
//! The crate interprets recognized word sequences against a compiled
//! word-lattice grammar: [`graph`] stores the lattice, [`matcher`] finds the
//! path a word sequence took and collects its scripts, [`script`] evaluates
//! them and [`processor`] ties the steps together.

pub mod error;
pub mod graph;
pub mod matcher;
pub mod options;
pub mod processor;
pub mod script;
pub mod wordmap;

pub use error::SemanticError;
pub use graph::{GraphSource, ImageVersion, SemanticGraph};
pub use options::{GraphOptions, MAX_NUM_SLOTS, ProcessorOptions};
pub use processor::{SemanticProcessor, SemanticResult};
pub use wordmap::{Vocabulary, WordId, WordMap};
