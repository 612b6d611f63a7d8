//! SKK-style input method core.
//!
//! Two tightly related subsystems:
//!
//! - [`romaji`]: table-driven incremental romaji-to-kana conversion. The
//!   caller owns the pending buffer and feeds it, one keystroke at a time,
//!   to [`romaji::RomajiTable::convert`], which decides what commits and
//!   what stays undecided.
//! - [`dict`]: the keyed candidate store: [`dict::MemoryDict`] in memory,
//!   [`dict::FileDict`] bound to an on-disk SKK dictionary file with
//!   load/save and external-change reconciliation over the
//!   [`dict::DictStorage`] boundary.
//!
//! Host integration (key events, candidate UI, file watching, dictionary
//! aggregation) lives outside this crate.

pub mod dict;
pub mod kana;
pub mod romaji;
pub mod settings;
pub mod trace_init;

pub use dict::{Annotation, Dict, DictError, FileDict, MemoryDict, Word};
pub use romaji::{ConvertedMoji, InputMode, Moji, RomajiTable};
