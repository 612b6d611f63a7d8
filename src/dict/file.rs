//! File-backed SKK dictionary.
//!
//! Owns one [`MemoryDict`] plus its backing location, encoding, read-only
//! flag and dirty flag. Loading replaces the store wholesale; saving
//! serializes back to the SKK text format through the storage boundary.
//! Fingerprints from the storage layer drive external-change
//! reconciliation.
//!
//! Mutation, load, save and reconciliation all take `&mut self`, so the
//! single-writer discipline is enforced by ownership: a host sharing one
//! dictionary across threads wraps it in its own lock, and change
//! notifications go through the same exclusive reference as everything
//! else.

use std::io;
use std::path::{Path, PathBuf};

use encoding_rs::Encoding;
use tracing::{debug, info, warn};

use super::entry::Word;
use super::memory::MemoryDict;
use super::storage::{DictStorage, ExternalChange, Fingerprint};
use super::{Dict, DictError};

pub struct FileDict {
    /// Backing file name; stable within a session, not across restarts.
    id: String,
    path: PathBuf,
    encoding: &'static Encoding,
    readonly: bool,
    has_unsaved_changes: bool,
    fingerprint: Option<Fingerprint>,
    dict: MemoryDict,
    storage: Box<dyn DictStorage>,
}

impl std::fmt::Debug for FileDict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileDict")
            .field("id", &self.id)
            .field("path", &self.path)
            .field("encoding", &self.encoding.name())
            .field("readonly", &self.readonly)
            .field("has_unsaved_changes", &self.has_unsaved_changes)
            .field("fingerprint", &self.fingerprint)
            .field("dict", &self.dict)
            .finish_non_exhaustive()
    }
}

impl FileDict {
    /// Open a dictionary over its backing file. A missing file is the
    /// dictionary-creation case and yields an empty store; the first save
    /// creates the file.
    pub fn open(
        path: impl Into<PathBuf>,
        encoding: &'static Encoding,
        readonly: bool,
        storage: Box<dyn DictStorage>,
    ) -> Result<Self, DictError> {
        let path = path.into();
        let id = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let mut dict = Self {
            id,
            path,
            encoding,
            readonly,
            has_unsaved_changes: false,
            fingerprint: None,
            dict: MemoryDict::new(),
            storage,
        };
        match dict.load() {
            Ok(()) => {}
            Err(DictError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                info!(dict = %dict.id, "backing file missing, starting empty");
            }
            Err(e) => return Err(e),
        }
        Ok(dict)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    pub fn readonly(&self) -> bool {
        self.readonly
    }

    /// True iff the store was mutated since the last successful load or
    /// save.
    pub fn has_unsaved_changes(&self) -> bool {
        self.has_unsaved_changes
    }

    /// Number of readings in the store.
    pub fn entry_count(&self) -> usize {
        self.dict.entry_count()
    }

    /// Readings in store (serialization) order.
    pub fn readings(&self) -> impl Iterator<Item = &str> {
        self.dict.readings()
    }

    /// Re-read the backing content and replace the store wholesale. On any
    /// failure the previous store, fingerprint and dirty flag are left
    /// untouched.
    pub fn load(&mut self) -> Result<(), DictError> {
        let (bytes, fingerprint) = self.storage.read(&self.path)?;
        let (text, had_errors) = self.encoding.decode_without_bom_handling(&bytes);
        if had_errors {
            return Err(DictError::Decode {
                dict_id: self.id.clone(),
                encoding: self.encoding.name(),
            });
        }
        let dict = MemoryDict::parse(&self.id, &text)?;
        info!(dict = %self.id, entries = dict.entry_count(), "dictionary loaded");
        self.dict = dict;
        self.fingerprint = Some(fingerprint);
        self.has_unsaved_changes = false;
        Ok(())
    }

    /// Serialize to the SKK text format: the header line, then one line per
    /// reading in store order.
    pub fn serialize(&self) -> String {
        let mut out = self.header();
        for yomi in self.dict.readings() {
            out.push('\n');
            out.push_str(yomi);
            out.push_str(" /");
            for word in self.dict.refer(yomi) {
                out.push_str(&word.word);
                if let Some(annotation) = &word.annotation {
                    out.push(';');
                    out.push_str(&annotation.text);
                }
                out.push('/');
            }
        }
        out
    }

    fn header(&self) -> String {
        format!(
            ";; -*- mode: fundamental; coding: {} -*-",
            self.encoding.name().to_ascii_lowercase()
        )
    }

    /// Serialize, encode and atomically write the store back, then adopt
    /// the fresh fingerprint. A clean dictionary is a no-op.
    ///
    /// Panics if the store holds text not representable in the configured
    /// encoding. `add` rejects delimiters but cannot know the encoding's
    /// repertoire was violated except here, and by then an accepted entry
    /// that cannot be written back is a programming error, not bad input.
    pub fn save(&mut self) -> Result<(), DictError> {
        if !self.has_unsaved_changes {
            debug!(dict = %self.id, "no unsaved changes, skipping save");
            return Ok(());
        }
        let text = self.serialize();
        let (bytes, _, unmappable) = self.encoding.encode(&text);
        if unmappable {
            panic!(
                "dictionary {} holds text not representable in {}",
                self.id,
                self.encoding.name()
            );
        }
        let fingerprint = self.storage.write(&self.path, &bytes)?;
        info!(dict = %self.id, entries = self.dict.entry_count(), "dictionary saved");
        self.fingerprint = Some(fingerprint);
        self.has_unsaved_changes = false;
        Ok(())
    }

    /// Register a word under a reading (most-recently-used first).
    ///
    /// Rejected on a read-only dictionary, and for text containing the
    /// format's delimiter characters: the on-disk format defines no
    /// escaping, so accepting them would corrupt the file for every other
    /// SKK reader.
    pub fn add(&mut self, yomi: &str, word: Word) -> Result<(), DictError> {
        self.ensure_writable()?;
        self.ensure_serializable(yomi, &word)?;
        self.dict.add(yomi, word);
        self.has_unsaved_changes = true;
        Ok(())
    }

    /// Remove the first candidate under `yomi` with the given word text.
    /// Dirties the dictionary only when something was removed.
    pub fn delete(&mut self, yomi: &str, word: &str) -> Result<bool, DictError> {
        self.ensure_writable()?;
        let removed = self.dict.delete(yomi, word);
        if removed {
            self.has_unsaved_changes = true;
        }
        Ok(removed)
    }

    pub fn refer(&self, yomi: &str) -> &[Word] {
        self.dict.refer(yomi)
    }

    /// React to an external-change notification for the backing file.
    ///
    /// A fingerprint equal to the one from our own last load/save is our
    /// save echoed back and is ignored. Anything else triggers a reload,
    /// discarding unsaved in-memory edits (the filesystem wins). A failed
    /// reload keeps the previous store and is only logged; the host may
    /// notify again later.
    pub fn handle_external_change(&mut self, change: ExternalChange) {
        match change {
            ExternalChange::Modified(fingerprint) if Some(fingerprint) == self.fingerprint => {
                debug!(dict = %self.id, "change is our own save, ignoring");
            }
            ExternalChange::Modified(_) | ExternalChange::FingerprintLost => {
                if self.has_unsaved_changes {
                    warn!(dict = %self.id, "discarding unsaved changes for external reload");
                }
                if let Err(e) = self.load() {
                    warn!(dict = %self.id, error = %e, "external reload failed, keeping previous entries");
                }
            }
        }
    }

    fn ensure_writable(&self) -> Result<(), DictError> {
        if self.readonly {
            return Err(DictError::ReadOnly {
                dict_id: self.id.clone(),
            });
        }
        Ok(())
    }

    fn ensure_serializable(&self, yomi: &str, word: &Word) -> Result<(), DictError> {
        let reject = |text: &str| DictError::Delimiter {
            dict_id: self.id.clone(),
            text: text.to_string(),
        };
        if yomi.is_empty() || yomi.contains(['/', ' ', '\n', '\r']) {
            return Err(reject(yomi));
        }
        if word.word.is_empty() || word.word.contains(['/', ';', '\n', '\r']) {
            return Err(reject(&word.word));
        }
        if let Some(annotation) = &word.annotation {
            // A ';' inside the annotation survives a round-trip; '/' and
            // line breaks do not.
            if annotation.text.is_empty() || annotation.text.contains(['/', '\n', '\r']) {
                return Err(reject(&annotation.text));
            }
        }
        Ok(())
    }

}

impl Dict for FileDict {
    fn refer(&self, yomi: &str) -> &[Word] {
        FileDict::refer(self, yomi)
    }
}
