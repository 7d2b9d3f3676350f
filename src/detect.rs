//! Validation of exported PDF output.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
const PDF_MAGIC_LEN: usize = 5;
const VERSION_LEN: usize = 3; // e.g., "1.7"

/// Read the PDF version from the start of exported bytes.
///
/// Returns `None` when the data does not begin with a PDF header.
pub fn pdf_version(data: &[u8]) -> Option<String> {
    if data.len() < PDF_MAGIC_LEN + VERSION_LEN || !data.starts_with(PDF_MAGIC) {
        return None;
    }

    let version_bytes = &data[PDF_MAGIC_LEN..PDF_MAGIC_LEN + VERSION_LEN];
    let version = String::from_utf8_lossy(version_bytes).to_string();
    is_valid_version(&version).then_some(version)
}

/// Check exported bytes before they are written to `path`.
///
/// # Errors
/// * `Error::Export` if the data is not a PDF document
pub fn verify_pdf_bytes(data: &[u8], path: &Path) -> Result<String> {
    pdf_version(data).ok_or_else(|| Error::Export {
        path: PathBuf::from(path),
        reason: format!("browser returned {} bytes without a PDF header", data.len()),
    })
}

/// Check if a file on disk starts with a PDF header.
pub fn is_pdf_file<P: AsRef<Path>>(path: P) -> bool {
    let mut header = [0u8; 16];
    File::open(path)
        .and_then(|mut f| f.read(&mut header))
        .map(|n| pdf_version(&header[..n]).is_some())
        .unwrap_or(false)
}

fn is_valid_version(version: &str) -> bool {
    let bytes = version.as_bytes();
    bytes.len() == 3 && bytes[0].is_ascii_digit() && bytes[1] == b'.' && bytes[2].is_ascii_digit()
}
