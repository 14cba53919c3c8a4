//! Gzip decompression for daily trade archives.

use flate2::read::GzDecoder;
use std::io::Read;
use thiserror::Error;

/// Gzip member header magic bytes.
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Errors that can occur during decompression.
#[derive(Error, Debug)]
pub enum DecompressError {
    /// Gzip decompression failed.
    #[error("Gzip decompression failed: {0}")]
    Gzip(#[from] std::io::Error),

    /// Empty input data.
    #[error("Empty input data")]
    EmptyInput,
}

/// Decompresses a gzip-compressed trade archive.
///
/// Bodies without the gzip magic header are returned unchanged, since the
/// HTTP layer may already have decoded a gzip content encoding.
///
/// # Errors
///
/// Returns an error if the input is empty or the gzip stream is corrupt.
pub fn decompress_gzip(compressed: &[u8]) -> Result<Vec<u8>, DecompressError> {
    if compressed.is_empty() {
        return Err(DecompressError::EmptyInput);
    }
    if !compressed.starts_with(&GZIP_MAGIC) {
        return Ok(compressed.to_vec());
    }

    let mut decompressed = Vec::new();
    GzDecoder::new(compressed).read_to_end(&mut decompressed)?;

    Ok(decompressed)
}
