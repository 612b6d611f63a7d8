//! Backing-content boundary: read-with-fingerprint, atomic
//! write-with-fingerprint, and the external-change notification payload.
//! File watching itself stays with the host.

use std::fs;
use std::io;
use std::path::Path;

/// Opaque content-version token. Only equality is meaningful; the engine
/// never interprets its structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fingerprint(u32);

impl Fingerprint {
    pub fn of(bytes: &[u8]) -> Self {
        Self(crc32fast::hash(bytes))
    }
}

/// Abstract access to a dictionary's backing location.
pub trait DictStorage: Send + Sync {
    /// Current raw content plus its fingerprint.
    fn read(&self, path: &Path) -> io::Result<(Vec<u8>, Fingerprint)>;

    /// Atomically replace the content, returning the fresh fingerprint.
    fn write(&self, path: &Path, bytes: &[u8]) -> io::Result<Fingerprint>;
}

/// Plain-filesystem storage. Writes go to a sibling `.tmp` file and are
/// renamed into place.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStorage;

impl DictStorage for FsStorage {
    fn read(&self, path: &Path) -> io::Result<(Vec<u8>, Fingerprint)> {
        let bytes = fs::read(path)?;
        let fingerprint = Fingerprint::of(&bytes);
        Ok((bytes, fingerprint))
    }

    fn write(&self, path: &Path, bytes: &[u8]) -> io::Result<Fingerprint> {
        let tmp = path.with_extension("tmp");
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, path)?;
        Ok(Fingerprint::of(bytes))
    }
}

/// What an external-change notification carries: the backing content's new
/// fingerprint, or word that the environment lost track of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalChange {
    Modified(Fingerprint),
    FingerprintLost,
}
