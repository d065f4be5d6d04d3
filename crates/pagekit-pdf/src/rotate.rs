//! Write planned page rotations

use crate::document;
use crate::error::PdfError;
use crate::info::inspect_document;
use lopdf::{Document, Object};
use pagekit_core::{rotation, RangeError, ResolvedPageSet, RotationDelta, RotationPlan};

/// Store the planned `/Rotate` on each page of `plan`; other pages are untouched
pub fn rotate_pages(bytes: &[u8], plan: &RotationPlan) -> Result<Vec<u8>, PdfError> {
    let mut doc = document::load_editable(bytes)?;
    apply_plan(&mut doc, plan)?;
    document::save(&mut doc)
}

/// Plan against the document's stored rotations, then write the plan
pub fn rotate_document(
    bytes: &[u8],
    resolved: &ResolvedPageSet,
    delta: RotationDelta,
) -> Result<(Vec<u8>, RotationPlan), PdfError> {
    let mut doc = document::load_editable(bytes)?;
    let info = inspect_document(&doc);
    let plan = rotation::plan(resolved, |page| info.rotation_of(page), delta);
    apply_plan(&mut doc, &plan)?;
    Ok((document::save(&mut doc)?, plan))
}

fn apply_plan(doc: &mut Document, plan: &RotationPlan) -> Result<(), PdfError> {
    let page_ids = document::page_ids(doc);

    for (page, rotation) in plan.iter() {
        let page_id = page
            .checked_sub(1)
            .and_then(|i| page_ids.get(i as usize))
            .copied()
            .ok_or_else(|| RangeError::PageOutOfBounds {
                clause: page.to_string(),
                page,
                page_count: page_ids.len() as u32,
            })?;

        let page_dict = doc
            .get_dictionary_mut(page_id)
            .map_err(|e| PdfError::Operation(e.to_string()))?;
        page_dict.set("Rotate", Object::Integer(i64::from(rotation.degrees())));
    }

    tracing::info!(pages = plan.len(), "rotated pages");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::fixtures::*;
    use crate::info::inspect;
    use pagekit_core::{parse_and_resolve, ResolveMode, Rotation};
    use pretty_assertions::assert_eq;

    fn rotations(bytes: &[u8]) -> Vec<Rotation> {
        inspect(bytes)
            .unwrap()
            .pages
            .iter()
            .map(|p| p.geometry.rotation)
            .collect()
    }

    fn delta(degrees: i64) -> RotationDelta {
        RotationDelta::new(degrees).unwrap()
    }

    #[test]
    fn test_rotate_selected_pages_only() {
        let pdf = letter_pdf(4);
        let resolved = parse_and_resolve("2-3", 4, ResolveMode::Rotate).unwrap();
        let (result, plan) = rotate_document(&pdf, &resolved, delta(90)).unwrap();
        assert_eq!(plan.len(), 2);
        assert_eq!(
            rotations(&result),
            vec![Rotation::Deg0, Rotation::Deg90, Rotation::Deg90, Rotation::Deg0]
        );
    }

    #[test]
    fn test_rotate_composes_with_existing_rotation() {
        let pdf = build_pdf(&[
            PageSpec {
                rotate: Some(270),
                ..PageSpec::letter()
            },
            PageSpec::letter(),
        ]);
        let resolved = parse_and_resolve("1-", 2, ResolveMode::Rotate).unwrap();
        let (result, _) = rotate_document(&pdf, &resolved, delta(180)).unwrap();
        assert_eq!(rotations(&result), vec![Rotation::Deg90, Rotation::Deg180]);
    }

    #[test]
    fn test_rotate_twice_by_quarter_equals_half_turn() {
        let pdf = letter_pdf(2);
        let twice = parse_and_resolve("1,1", 2, ResolveMode::Rotate).unwrap();
        let once = parse_and_resolve("1", 2, ResolveMode::Rotate).unwrap();

        let (a, _) = rotate_document(&pdf, &twice, delta(90)).unwrap();
        let (b, _) = rotate_document(&pdf, &once, delta(180)).unwrap();
        assert_eq!(rotations(&a), rotations(&b));
    }

    #[test]
    fn test_rotate_inherited_rotation() {
        let pdf = nested_pdf();
        let resolved = parse_and_resolve("3-", 4, ResolveMode::Rotate).unwrap();
        let (result, _) = rotate_document(&pdf, &resolved, delta(90)).unwrap();
        let stored = rotations(&result);
        assert_eq!(stored[2], Rotation::Deg180);
        assert_eq!(stored[1], Rotation::Deg0);
    }

    #[test]
    fn test_rotate_refuses_encrypted_input() {
        let encrypted = include_bytes!("../tests/fixtures/encrypted-rc4.pdf");
        let resolved = parse_and_resolve("1", 1, ResolveMode::Rotate).unwrap();
        assert!(matches!(
            rotate_document(encrypted, &resolved, delta(90)),
            Err(PdfError::Encrypted)
        ));
    }

    #[test]
    fn test_rotate_pages_rejects_unknown_page() {
        let pdf = letter_pdf(2);
        let resolved = parse_and_resolve("3", 3, ResolveMode::Rotate).unwrap();
        let plan = rotation::plan(&resolved, |_| Rotation::Deg0, delta(90));
        assert!(rotate_pages(&pdf, &plan).is_err());
    }
}
