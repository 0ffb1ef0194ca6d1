use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tracing::debug;

const READ_BUFFER_SIZE: usize = 64 * 1024;

/// SHA-256 content hashing used to compare launcher binaries and to name
/// temporary downloads.
pub struct ChecksumVerifier;

impl ChecksumVerifier {
    /// Hex-encoded SHA-256 of a file, read in fixed-size chunks so large
    /// binaries are never held in memory.
    pub async fn compute_sha256(file_path: &Path) -> Result<String> {
        debug!("Computing SHA256 checksum for: {}", file_path.display());

        let mut file = File::open(file_path)
            .await
            .with_context(|| format!("Failed to open file: {}", file_path.display()))?;

        let mut hasher = Sha256::new();
        let mut buffer = vec![0u8; READ_BUFFER_SIZE];
        loop {
            let read = file
                .read(&mut buffer)
                .await
                .with_context(|| format!("Failed to read file: {}", file_path.display()))?;
            if read == 0 {
                break;
            }
            hasher.update(&buffer[..read]);
        }

        Ok(hex::encode(hasher.finalize()))
    }

    /// Whether two files have byte-identical content.
    pub async fn files_match(a: &Path, b: &Path) -> Result<bool> {
        let left = Self::compute_sha256(a).await?;
        let right = Self::compute_sha256(b).await?;
        debug!("{} = {left}", a.display());
        debug!("{} = {right}", b.display());
        Ok(left == right)
    }

    /// Hex-encoded SHA-256 of a string.
    pub fn digest_str(input: &str) -> String {
        hex::encode(Sha256::digest(input.as_bytes()))
    }
}
