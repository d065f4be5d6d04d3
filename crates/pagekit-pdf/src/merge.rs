//! Concatenate PDFs
//!
//! Every source's objects are copied into the first document under shifted
//! ids, then the page tree is rebuilt over all pages in input order.

use crate::document;
use crate::error::PdfError;
use lopdf::{Object, ObjectId};

/// Merge documents in the order given
pub fn merge_documents(documents: &[Vec<u8>]) -> Result<Vec<u8>, PdfError> {
    let Some((first, rest)) = documents.split_first() else {
        return Err(PdfError::Operation("No documents to merge".into()));
    };

    if rest.is_empty() {
        // Single document, nothing to do
        return Ok(first.clone());
    }

    let mut dest = document::load_editable(first).map_err(|e| with_index(e, 0))?;
    let mut dest_max_id = dest.max_id;
    let mut page_refs = document::page_ids(&dest);

    for (i, bytes) in rest.iter().enumerate() {
        let source = document::load_editable(bytes).map_err(|e| with_index(e, i + 1))?;
        let source_pages = document::page_ids(&source);

        // Shift ids past everything already in the destination
        let offset = dest_max_id;
        for (old_id, object) in source.objects {
            dest.objects
                .insert(shift(old_id, offset)?, remap_object_refs(object, offset)?);
        }
        for page_id in source_pages {
            page_refs.push(shift(page_id, offset)?);
        }

        let source_max = source.max_id.checked_add(offset).ok_or_else(id_overflow)?;
        dest_max_id = source_max.max(dest_max_id);
    }
    dest.max_id = dest_max_id;

    // Source pages still point at their old /Pages nodes, which is where
    // their inherited attributes come from
    document::rebuild_page_tree(&mut dest, &page_refs)?;
    dest.prune_objects();
    dest.compress();

    tracing::info!(
        documents = documents.len(),
        pages = page_refs.len(),
        "merged documents"
    );
    document::save(&mut dest)
}

fn with_index(err: PdfError, index: usize) -> PdfError {
    match err {
        PdfError::Parse(msg) => PdfError::Parse(format!("document {}: {}", index, msg)),
        other => other,
    }
}

fn id_overflow() -> PdfError {
    PdfError::Operation("object ids overflow".into())
}

fn shift((num, generation): ObjectId, offset: u32) -> Result<ObjectId, PdfError> {
    let num = num.checked_add(offset).ok_or_else(id_overflow)?;
    Ok((num, generation))
}

/// Recursively shift object references by `offset`
fn remap_object_refs(obj: Object, offset: u32) -> Result<Object, PdfError> {
    Ok(match obj {
        Object::Reference(id) => Object::Reference(shift(id, offset)?),
        Object::Array(arr) => Object::Array(
            arr.into_iter()
                .map(|o| remap_object_refs(o, offset))
                .collect::<Result<_, _>>()?,
        ),
        Object::Dictionary(mut dict) => {
            for (_, value) in dict.iter_mut() {
                *value = remap_object_refs(std::mem::replace(value, Object::Null), offset)?;
            }
            Object::Dictionary(dict)
        }
        Object::Stream(mut stream) => {
            for (_, value) in stream.dict.iter_mut() {
                *value = remap_object_refs(std::mem::replace(value, Object::Null), offset)?;
            }
            Object::Stream(stream)
        }
        other => other,
    })
}
