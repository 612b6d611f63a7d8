//! SKK dictionaries: the in-memory entry store, its file-backed wrapper,
//! and the storage boundary they sit on.

mod entry;
mod file;
mod memory;
mod storage;

pub use entry::{Annotation, Word};
pub use file::FileDict;
pub use memory::MemoryDict;
pub use storage::{DictStorage, ExternalChange, Fingerprint, FsStorage};

use std::io;

/// Unified error type for dictionary parsing, policy, and backing IO.
#[derive(Debug, thiserror::Error)]
pub enum DictError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("dictionary {dict_id} line {line} is malformed: {content}")]
    Parse {
        dict_id: String,
        line: usize,
        content: String,
    },

    #[error("dictionary {dict_id} is not valid {encoding}")]
    Decode {
        dict_id: String,
        encoding: &'static str,
    },

    #[error("dictionary {dict_id} is read-only")]
    ReadOnly { dict_id: String },

    #[error("dictionary {dict_id} rejects {text:?}: contains a format delimiter")]
    Delimiter { dict_id: String, text: String },
}

/// Candidate lookup seam. The host's dictionary aggregator composes trait
/// objects of this with its own precedence ordering.
pub trait Dict: Send + Sync {
    /// Candidates filed under an exact reading, best first. Empty when the
    /// reading is absent. Never mutates.
    fn refer(&self, yomi: &str) -> &[Word];
}
