//! Embed highlight annotations

use crate::document;
use crate::error::PdfError;
use crate::info::page_box;
use lopdf::{dictionary, Document, Object, ObjectId};
use pagekit_core::{AnnotationBatch, GeometryError, HighlightStyle, PdfRect};

fn reals(values: &[f64]) -> Object {
    Object::Array(values.iter().map(|&v| Object::Real(v as f32)).collect())
}

/// Add one `/Highlight` annotation per rectangle in `batch`.
///
/// Rectangles are in each page's intrinsic frame relative to the MediaBox
/// corner; they are shifted by the MediaBox origin before being written.
pub fn embed_highlights(
    bytes: &[u8],
    batch: &AnnotationBatch,
    style: &HighlightStyle,
) -> Result<Vec<u8>, PdfError> {
    if batch.is_empty() {
        // No changes, return original
        return Ok(bytes.to_vec());
    }

    let mut doc = document::load_editable(bytes)?;
    let page_ids = document::page_ids(&doc);

    for (page_index, rects) in batch.iter() {
        let page_id = *page_ids
            .get(page_index)
            .ok_or(GeometryError::PageOutOfRange {
                page_index,
                page_count: page_ids.len(),
            })?;
        let origin = page_box(&doc, page_index as u32 + 1, page_id);

        for rect in rects {
            let placed = rect.translate(origin.origin_x, origin.origin_y);
            add_highlight_annotation(&mut doc, page_id, &placed, style)?;
        }
    }

    tracing::info!(
        pages = batch.iter().count(),
        highlights = batch.len(),
        "embedded highlights"
    );
    document::save(&mut doc)
}

fn add_highlight_annotation(
    doc: &mut Document,
    page_id: ObjectId,
    rect: &PdfRect,
    style: &HighlightStyle,
) -> Result<(), PdfError> {
    let (r, g, b) = style.rgb();
    let annot = dictionary! {
        "Type" => "Annot",
        "Subtype" => "Highlight",
        "Rect" => reals(&rect.corners()),
        "QuadPoints" => reals(&rect.quad_points()),
        "C" => vec![Object::Real(r), Object::Real(g), Object::Real(b)],
        "CA" => Object::Real(style.alpha()),
        "P" => page_id,
    };

    let annot_id = doc.add_object(Object::Dictionary(annot));
    add_annotation_to_page(doc, page_id, annot_id)
}

/// Append to the page's `/Annots`, which may be missing, inline, or an
/// indirect array shared through a reference.
fn add_annotation_to_page(
    doc: &mut Document,
    page_id: ObjectId,
    annot_id: ObjectId,
) -> Result<(), PdfError> {
    let annots_ref = doc
        .get_dictionary(page_id)
        .map_err(|e| PdfError::Operation(e.to_string()))?
        .get(b"Annots")
        .and_then(Object::as_reference)
        .ok();

    if let Some(array_id) = annots_ref {
        if let Ok(Object::Array(arr)) = doc.get_object_mut(array_id) {
            arr.push(Object::Reference(annot_id));
            return Ok(());
        }
    }

    let page_dict = doc
        .get_dictionary_mut(page_id)
        .map_err(|e| PdfError::Operation(e.to_string()))?;
    if !matches!(page_dict.get(b"Annots"), Ok(Object::Array(_))) {
        page_dict.set("Annots", Object::Array(Vec::new()));
    }
    if let Ok(Object::Array(arr)) = page_dict.get_mut(b"Annots") {
        arr.push(Object::Reference(annot_id));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::fixtures::*;
    use pagekit_core::{assemble, AssembleOptions};
    use pretty_assertions::assert_eq;

    fn batch(rects: Vec<(usize, PdfRect)>, page_count: usize) -> AnnotationBatch {
        assemble(rects, page_count, &AssembleOptions::default()).unwrap()
    }

    /// Annotation dictionaries on a 0-based page
    fn annotations(bytes: &[u8], page_index: usize) -> Vec<lopdf::Dictionary> {
        let doc = Document::load_mem(bytes).unwrap();
        let page_id = document::page_ids(&doc)[page_index];
        let page = doc.get_dictionary(page_id).unwrap();
        let Ok(annots) = page.get(b"Annots") else {
            return Vec::new();
        };
        let annots = document::resolve(&doc, annots).as_array().unwrap();
        annots
            .iter()
            .map(|a| {
                doc.get_dictionary(a.as_reference().unwrap())
                    .unwrap()
                    .clone()
            })
            .collect()
    }

    fn floats(obj: &Object) -> Vec<f64> {
        obj.as_array()
            .unwrap()
            .iter()
            .map(|o| document::number(o).unwrap())
            .collect()
    }

    #[test]
    fn test_empty_batch_returns_original() {
        let pdf = letter_pdf(1);
        let result = embed_highlights(&pdf, &AnnotationBatch::default(), &HighlightStyle::default())
            .unwrap();
        assert_eq!(result, pdf);
    }

    #[test]
    fn test_highlight_written_to_right_page() {
        let pdf = letter_pdf(3);
        let rects = vec![
            (1, PdfRect::new(50.0, 600.0, 300.0, 20.0)),
            (1, PdfRect::new(50.0, 500.0, 200.0, 20.0)),
        ];
        let result = embed_highlights(&pdf, &batch(rects, 3), &HighlightStyle::default()).unwrap();

        assert!(annotations(&result, 0).is_empty());
        let annots = annotations(&result, 1);
        assert_eq!(annots.len(), 2);

        let first = &annots[0];
        assert_eq!(first.get(b"Subtype").unwrap().as_name().unwrap(), b"Highlight");
        assert_eq!(floats(first.get(b"Rect").unwrap()), vec![50.0, 600.0, 350.0, 620.0]);
        assert_eq!(
            floats(first.get(b"QuadPoints").unwrap()),
            vec![50.0, 620.0, 350.0, 620.0, 50.0, 600.0, 350.0, 600.0]
        );
        assert_eq!(floats(annots[1].get(b"Rect").unwrap())[1], 500.0);
    }

    #[test]
    fn test_style_color_and_opacity() {
        let pdf = letter_pdf(1);
        let rects = vec![(0, PdfRect::new(0.0, 0.0, 100.0, 10.0))];
        let style = HighlightStyle::new("#00FF00", 0.5);
        let result = embed_highlights(&pdf, &batch(rects, 1), &style).unwrap();

        let annot = &annotations(&result, 0)[0];
        assert_eq!(floats(annot.get(b"C").unwrap()), vec![0.0, 1.0, 0.0]);
        assert_eq!(document::number(annot.get(b"CA").unwrap()), Some(0.5));
    }

    #[test]
    fn test_appends_to_existing_inline_annots() {
        let pdf = letter_pdf(1);
        let once = embed_highlights(
            &pdf,
            &batch(vec![(0, PdfRect::new(0.0, 0.0, 100.0, 10.0))], 1),
            &HighlightStyle::default(),
        )
        .unwrap();
        let twice = embed_highlights(
            &once,
            &batch(vec![(0, PdfRect::new(0.0, 50.0, 100.0, 10.0))], 1),
            &HighlightStyle::default(),
        )
        .unwrap();
        assert_eq!(annotations(&twice, 0).len(), 2);
    }

    #[test]
    fn test_appends_to_indirect_annots_array() {
        let mut doc = document::load(&letter_pdf(1)).unwrap();
        let page_id = document::page_ids(&doc)[0];
        let existing = doc.add_object(dictionary! {
            "Type" => "Annot",
            "Subtype" => "Text",
            "Rect" => vec![0.into(), 0.into(), 10.into(), 10.into()],
        });
        let array_id = doc.add_object(Object::Array(vec![Object::Reference(existing)]));
        doc.get_dictionary_mut(page_id)
            .unwrap()
            .set("Annots", Object::Reference(array_id));
        let pdf = document::save(&mut doc).unwrap();

        let result = embed_highlights(
            &pdf,
            &batch(vec![(0, PdfRect::new(0.0, 0.0, 100.0, 10.0))], 1),
            &HighlightStyle::default(),
        )
        .unwrap();
        assert_eq!(annotations(&result, 0).len(), 2);
    }

    #[test]
    fn test_offset_media_box_shifts_rect() {
        let mut doc = document::load(&letter_pdf(1)).unwrap();
        let page_id = document::page_ids(&doc)[0];
        doc.get_dictionary_mut(page_id).unwrap().set(
            "MediaBox",
            vec![10.into(), 20.into(), 622.into(), 812.into()],
        );
        let pdf = document::save(&mut doc).unwrap();

        let rects = vec![(0, PdfRect::new(0.0, 0.0, 100.0, 10.0))];
        let result = embed_highlights(&pdf, &batch(rects, 1), &HighlightStyle::default()).unwrap();
        let annot = &annotations(&result, 0)[0];
        assert_eq!(floats(annot.get(b"Rect").unwrap()), vec![10.0, 20.0, 110.0, 30.0]);
    }

    #[test]
    fn test_batch_page_past_document_fails() {
        let pdf = letter_pdf(1);
        let rects = vec![(1, PdfRect::new(0.0, 0.0, 100.0, 10.0))];
        let result = embed_highlights(&pdf, &batch(rects, 2), &HighlightStyle::default());
        assert!(matches!(result, Err(PdfError::Page(_))));
    }
}
