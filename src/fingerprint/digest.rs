// src/fingerprint/digest.rs

//! Digest algorithms available for fingerprinting.

use std::fmt;
use std::io::Read;
use std::str::FromStr;

use sha2::{Digest, Sha256, Sha512};

use crate::errors::PackgateError;

/// Chunk size for streaming file content through a digest. Keeps memory
/// flat regardless of file size.
const DIGEST_BUFFER_SIZE: usize = 4 * 1024;

/// A named content-hash algorithm.
///
/// Parsed from a string with [`FromStr`]; an unrecognised name yields
/// [`PackgateError::UnknownAlgorithm`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DigestAlgorithm {
    #[default]
    Sha256,
    Sha512,
    Blake3,
}

impl DigestAlgorithm {
    /// Stream `reader` to the end and return the digest bytes.
    pub fn hash_reader<R: Read>(&self, mut reader: R) -> std::io::Result<Vec<u8>> {
        let mut hasher = self.hasher();
        let mut buf = [0u8; DIGEST_BUFFER_SIZE];
        loop {
            let n = reader.read(&mut buf)?;
            if n == 0 {
                break;
            }
            hasher.update(&buf[..n]);
        }
        Ok(hasher.finalize())
    }

    fn hasher(&self) -> Hasher {
        match self {
            DigestAlgorithm::Sha256 => Hasher::Sha256(Sha256::new()),
            DigestAlgorithm::Sha512 => Hasher::Sha512(Sha512::new()),
            DigestAlgorithm::Blake3 => Hasher::Blake3(blake3::Hasher::new()),
        }
    }
}

impl FromStr for DigestAlgorithm {
    type Err = PackgateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sha256" | "sha-256" => Ok(DigestAlgorithm::Sha256),
            "sha512" | "sha-512" => Ok(DigestAlgorithm::Sha512),
            "blake3" => Ok(DigestAlgorithm::Blake3),
            other => Err(PackgateError::UnknownAlgorithm(other.to_string())),
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DigestAlgorithm::Sha256 => write!(f, "sha256"),
            DigestAlgorithm::Sha512 => write!(f, "sha512"),
            DigestAlgorithm::Blake3 => write!(f, "blake3"),
        }
    }
}

enum Hasher {
    Sha256(Sha256),
    Sha512(Sha512),
    Blake3(blake3::Hasher),
}

impl Hasher {
    fn update(&mut self, data: &[u8]) {
        match self {
            Hasher::Sha256(h) => h.update(data),
            Hasher::Sha512(h) => h.update(data),
            Hasher::Blake3(h) => {
                h.update(data);
            }
        }
    }

    fn finalize(self) -> Vec<u8> {
        match self {
            Hasher::Sha256(h) => h.finalize().to_vec(),
            Hasher::Sha512(h) => h.finalize().to_vec(),
            Hasher::Blake3(h) => h.finalize().as_bytes().to_vec(),
        }
    }
}
