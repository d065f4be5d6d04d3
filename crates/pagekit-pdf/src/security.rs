//! Password removal
//!
//! Decryption is delegated to lopdf, which handles the RC4 standard
//! security handler (revisions 2 and 3). AES-encrypted files are reported
//! as [`PdfError::Decryption`].

use crate::document;
use crate::error::PdfError;
use lopdf::encryption::DecryptionError;

/// Decrypt with `password` and save without an `/Encrypt` dictionary.
///
/// A document that is not encrypted is returned re-saved.
pub fn unlock_document(bytes: &[u8], password: &str) -> Result<Vec<u8>, PdfError> {
    let mut doc = document::load(bytes)?;
    if !doc.is_encrypted() {
        tracing::debug!("document is not encrypted");
        return document::save(&mut doc);
    }

    doc.decrypt(password).map_err(|e| match e {
        lopdf::Error::Decryption(DecryptionError::IncorrectPassword) => PdfError::IncorrectPassword,
        other => PdfError::Decryption(other.to_string()),
    })?;

    doc.trailer.remove(b"Encrypt");
    doc.prune_objects();

    tracing::info!("unlocked document");
    document::save(&mut doc)
}
