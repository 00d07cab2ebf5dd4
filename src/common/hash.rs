use std::{fs, path::Path};

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};

/// Incremental SHA-256 over any number of byte chunks, hex-encoded at the end.
#[derive(Default)]
pub(crate) struct Fingerprint(Sha256);

impl Fingerprint {
    pub(crate) fn new() -> Self { Self::default() }

    /// Feed a length-prefixed chunk, so ("ab","c") and ("a","bc") differ.
    pub(crate) fn update(&mut self, bytes: &[u8]) {
        self.0.update((bytes.len() as u64).to_le_bytes());
        self.0.update(bytes);
    }

    /// Feed the full contents of a file.
    pub(crate) fn update_file(&mut self, path: &Path) -> Result<()> {
        let bytes = fs::read(path)
            .with_context(|| format!("failed to read {} for fingerprinting", path.display()))?;
        self.update(&bytes);
        Ok(())
    }

    pub(crate) fn finish(self) -> String { hex::encode(self.0.finalize()) }
}
