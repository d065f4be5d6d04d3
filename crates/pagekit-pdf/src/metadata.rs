//! Metadata removal and size reduction

use crate::document;
use crate::error::PdfError;
use lopdf::Object;

/// Drop the document Info dictionary and the catalog's XMP `/Metadata`
/// stream. Page content is untouched.
pub fn strip_metadata(bytes: &[u8]) -> Result<Vec<u8>, PdfError> {
    let mut doc = document::load_editable(bytes)?;

    let had_info = doc.trailer.remove(b"Info").is_some();

    let catalog_id = doc
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .map_err(|_| PdfError::Operation("No Root reference in trailer".into()))?;
    let had_xmp = doc
        .get_dictionary_mut(catalog_id)
        .map_err(|_| PdfError::Operation("Catalog not found".into()))?
        .remove(b"Metadata")
        .is_some();

    doc.prune_objects();
    tracing::info!(had_info, had_xmp, "stripped metadata");
    document::save(&mut doc)
}

/// Drop unreferenced objects and Flate-compress streams
pub fn compress_document(bytes: &[u8]) -> Result<Vec<u8>, PdfError> {
    let mut doc = document::load_editable(bytes)?;
    doc.prune_objects();
    doc.delete_zero_length_streams();
    doc.compress();
    let out = document::save(&mut doc)?;
    tracing::info!(before = bytes.len(), after = out.len(), "compressed document");
    Ok(out)
}
