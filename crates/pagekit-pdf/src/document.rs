//! Shared lopdf plumbing: loading, saving and page-tree access

use crate::error::PdfError;
use lopdf::{Document, Object, ObjectId};

/// Page attributes a page may inherit from its ancestors in the page tree
pub(crate) const INHERITABLE: [&[u8]; 4] = [b"MediaBox", b"CropBox", b"Resources", b"Rotate"];

/// Bound on Parent-chain walks, guards against cyclic page trees
const MAX_TREE_DEPTH: usize = 64;

pub(crate) fn load(bytes: &[u8]) -> Result<Document, PdfError> {
    Document::load_mem(bytes).map_err(|e| PdfError::Parse(e.to_string()))
}

/// Load a document that is about to be mutated
pub(crate) fn load_editable(bytes: &[u8]) -> Result<Document, PdfError> {
    let doc = load(bytes)?;
    if doc.is_encrypted() {
        return Err(PdfError::Encrypted);
    }
    Ok(doc)
}

pub(crate) fn save(doc: &mut Document) -> Result<Vec<u8>, PdfError> {
    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| PdfError::Operation(format!("Save failed: {}", e)))?;
    Ok(buffer)
}

/// Page object ids in document order
pub(crate) fn page_ids(doc: &Document) -> Vec<ObjectId> {
    doc.get_pages().into_values().collect()
}

/// Object id of the root `/Pages` node
pub(crate) fn pages_root_id(doc: &Document) -> Result<ObjectId, PdfError> {
    let catalog_id = doc
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .map_err(|_| PdfError::Operation("No Root reference in trailer".into()))?;

    doc.get_dictionary(catalog_id)
        .map_err(|_| PdfError::Operation("Catalog not found".into()))?
        .get(b"Pages")
        .and_then(Object::as_reference)
        .map_err(|_| PdfError::Operation("No Pages reference in catalog".into()))
}

/// Follow one level of indirection
pub(crate) fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        other => other,
    }
}

/// Look up `key` on a page, falling back to its ancestors
pub(crate) fn inherited<'a>(
    doc: &'a Document,
    page_id: ObjectId,
    key: &[u8],
) -> Option<&'a Object> {
    let mut node = doc.get_dictionary(page_id).ok()?;
    for _ in 0..MAX_TREE_DEPTH {
        if let Ok(value) = node.get(key) {
            return Some(resolve(doc, value));
        }
        let parent = node.get(b"Parent").and_then(Object::as_reference).ok()?;
        node = doc.get_dictionary(parent).ok()?;
    }
    None
}

pub(crate) fn number(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(n) => Some(*n as f64),
        Object::Real(n) => Some(*n as f64),
        _ => None,
    }
}

/// Make `page_ids` the only children of the root `/Pages` node, in order.
///
/// Inherited attributes are copied onto each page first so that flattening
/// a nested tree does not change how any page renders.
pub(crate) fn rebuild_page_tree(doc: &mut Document, page_ids: &[ObjectId]) -> Result<(), PdfError> {
    let root_id = pages_root_id(doc)?;

    let mut pushed_down = Vec::new();
    for &page_id in page_ids {
        let page = doc
            .get_dictionary(page_id)
            .map_err(|_| PdfError::Operation(format!("Page object {:?} not found", page_id)))?;
        for key in INHERITABLE {
            if page.has(key) {
                continue;
            }
            if let Some(value) = inherited(doc, page_id, key) {
                pushed_down.push((page_id, key, value.clone()));
            }
        }
    }

    for (page_id, key, value) in pushed_down {
        if let Ok(page) = doc.get_dictionary_mut(page_id) {
            page.set(key, value);
        }
    }

    for &page_id in page_ids {
        if let Ok(page) = doc.get_dictionary_mut(page_id) {
            page.set("Parent", Object::Reference(root_id));
        }
    }

    let root = doc
        .get_dictionary_mut(root_id)
        .map_err(|_| PdfError::Operation("Invalid pages dictionary".into()))?;
    root.set(
        "Kids",
        Object::Array(page_ids.iter().map(|&id| Object::Reference(id)).collect()),
    );
    root.set("Count", Object::Integer(page_ids.len() as i64));
    Ok(())
}
