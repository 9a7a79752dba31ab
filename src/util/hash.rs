//! Hashing for package ids and exported archive checksums.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};

/// SHA-256 of a file, hex encoded.
pub fn sha256_file(path: &Path) -> Result<String> {
    let file = File::open(path)
        .with_context(|| format!("failed to open file for hashing: {}", path.display()))?;

    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];

    loop {
        let n = reader.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Incremental fingerprint over a sequence of string components.
///
/// Components are NUL separated so `("ab", "c")` and `("a", "bc")` differ.
#[derive(Default)]
pub struct Fingerprint {
    hasher: Sha256,
}

impl Fingerprint {
    pub fn new() -> Self {
        Fingerprint {
            hasher: Sha256::new(),
        }
    }

    pub fn update_str(&mut self, s: &str) -> &mut Self {
        self.hasher.update(s.as_bytes());
        self.hasher.update(b"\0");
        self
    }

    /// Full hex digest.
    pub fn finish(self) -> String {
        hex::encode(self.hasher.finalize())
    }

    /// First 16 hex characters of the digest.
    pub fn finish_short(self) -> String {
        let mut digest = self.finish();
        digest.truncate(16);
        digest
    }
}
