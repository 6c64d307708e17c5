// src/fingerprint/mod.rs

//! Content-addressed fingerprint of a directory tree.
//!
//! A fingerprint maps every non-ignored regular file under a root directory
//! to the digest of its content. Fingerprints are persisted to a flat text
//! marker file (one `<hex-digest> <relative-path>` line per entry, sorted by
//! path) and compared for equality to decide whether the directory changed
//! since the last run.

pub mod digest;

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Component, Path};

use anyhow::Context;
use tracing::debug;
use walkdir::WalkDir;

use crate::errors::Result;

pub use digest::DigestAlgorithm;

/// One fingerprint line: the digest of a single file, keyed by its path
/// relative to the fingerprinted root (forward-slash separated).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FingerprintEntry {
    pub path: String,
    pub hash: Vec<u8>,
}

impl FingerprintEntry {
    pub fn new(path: impl Into<String>, hash: Vec<u8>) -> Self {
        Self {
            path: path.into(),
            hash,
        }
    }

    /// Parse a `<hex-digest> <relative-path>` marker line.
    fn parse(line: &str) -> io::Result<Self> {
        let (digest, path) = line
            .split_once(' ')
            .ok_or_else(|| malformed(line, "missing separator"))?;
        let hash = hex::decode(digest).map_err(|_| malformed(line, "bad hex digest"))?;
        Ok(Self::new(path, hash))
    }
}

impl std::fmt::Display for FingerprintEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", hex::encode(&self.hash), self.path)
    }
}

fn malformed(line: &str, what: &str) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidData,
        format!("malformed fingerprint line ({what}): {line:?}"),
    )
}

/// Digest summary of a directory's regular files, computed once at
/// construction time.
///
/// Two fingerprints are equal iff they cover the same set of relative paths
/// and every path maps to the same digest.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Fingerprint {
    entries: BTreeMap<String, Vec<u8>>,
}

impl Fingerprint {
    /// Fingerprint the directory tree under `root`.
    ///
    /// Every regular file is hashed with `algorithm` unless `ignore` returns
    /// true for its relative path. Directories, symlinks and special files
    /// are skipped. Any file that cannot be read fails the whole generation;
    /// a partial fingerprint is never returned.
    pub fn generate<F>(algorithm: DigestAlgorithm, root: &Path, ignore: F) -> Result<Self>
    where
        F: Fn(&str) -> bool,
    {
        let mut entries = BTreeMap::new();
        for entry in WalkDir::new(root) {
            let entry = entry.map_err(io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = relative_path(root, entry.path());
            if ignore(&relative) {
                continue;
            }
            let file = File::open(entry.path())
                .with_context(|| format!("opening file for hashing: {:?}", entry.path()))?;
            let hash = algorithm.hash_reader(file)?;
            debug!(path = %relative, "hashed file");
            entries.insert(relative, hash);
        }
        Ok(Self { entries })
    }

    /// Load a fingerprint previously written with [`store`](Self::store).
    ///
    /// A missing marker file is an empty fingerprint, not an error, so a
    /// directory with zero eligible files matches "no marker".
    pub fn load(marker: &Path) -> Result<Self> {
        let file = match File::open(marker) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(anyhow::Error::new(e)
                    .context(format!("opening fingerprint marker at {marker:?}"))
                    .into());
            }
        };
        let mut entries = Vec::new();
        for line in BufReader::new(file).lines() {
            entries.push(FingerprintEntry::parse(&line?)?);
        }
        Ok(entries.into_iter().collect())
    }

    /// Overwrite (or create) the marker file with this fingerprint, one
    /// line per entry, sorted by path.
    pub fn store(&self, marker: &Path) -> Result<()> {
        let file = File::create(marker)
            .with_context(|| format!("creating fingerprint marker at {marker:?}"))?;
        let mut writer = BufWriter::new(file);
        for entry in self.iter() {
            writeln!(writer, "{entry}")?;
        }
        writer.flush()?;
        Ok(())
    }

    /// True iff this fingerprint equals the one stored at `marker`.
    pub fn matches(&self, marker: &Path) -> Result<bool> {
        Ok(*self == Self::load(marker)?)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Digest recorded for `path`, if the path was fingerprinted.
    pub fn hash_of(&self, path: &str) -> Option<&[u8]> {
        self.entries.get(path).map(Vec::as_slice)
    }

    /// Entries in path order.
    pub fn iter(&self) -> impl Iterator<Item = FingerprintEntry> + '_ {
        self.entries
            .iter()
            .map(|(path, hash)| FingerprintEntry::new(path.clone(), hash.clone()))
    }
}

impl FromIterator<FingerprintEntry> for Fingerprint {
    fn from_iter<I: IntoIterator<Item = FingerprintEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|e| (e.path, e.hash)).collect(),
        }
    }
}

/// Path of `path` relative to `root`, forward-slash separated.
fn relative_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
