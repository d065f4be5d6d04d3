//! Apply a parsed page range to a document's real page count
//!
//! Resolution happens after the document is loaded and before any mutation,
//! so every error here is reported against the actual page count.

use crate::error::RangeError;
use crate::range::{PageRangeSpec, PageRangeToken};
use serde::{Deserialize, Serialize};

/// How the resolved pages will be consumed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolveMode {
    /// Each clause becomes an independent output file. Overlap is allowed.
    Split,
    /// Output order follows clause order; every page exactly once.
    Reorder,
    /// Pages may repeat; unmentioned pages are left alone.
    Rotate,
}

/// Pages produced by one clause
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSegment {
    pub clause: PageRangeToken,
    /// 1-based page numbers, in ascending order
    pub pages: Vec<u32>,
}

impl PageSegment {
    pub fn first(&self) -> Option<u32> {
        self.pages.first().copied()
    }

    pub fn last(&self) -> Option<u32> {
        self.pages.last().copied()
    }
}

/// Concrete 1-based pages, each verified against the page count
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedPageSet {
    mode: ResolveMode,
    page_count: u32,
    segments: Vec<PageSegment>,
}

impl ResolvedPageSet {
    pub fn mode(&self) -> ResolveMode {
        self.mode
    }

    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    /// Non-empty segments in clause order
    pub fn segments(&self) -> &[PageSegment] {
        &self.segments
    }

    /// All pages in visiting order, duplicates included
    pub fn pages(&self) -> Vec<u32> {
        self.iter().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.segments.iter().flat_map(|s| s.pages.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.segments.iter().map(|s| s.pages.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Most output files a single split may produce
pub const MAX_SPLIT_SEGMENTS: usize = 256;

/// Resolve `spec` against a document with `page_count` pages
pub fn resolve(
    spec: &PageRangeSpec,
    page_count: u32,
    mode: ResolveMode,
) -> Result<ResolvedPageSet, RangeError> {
    if mode == ResolveMode::Split && spec.len() > MAX_SPLIT_SEGMENTS {
        return Err(RangeError::TooManySegments {
            count: spec.len(),
            limit: MAX_SPLIT_SEGMENTS,
        });
    }

    let mut segments = Vec::with_capacity(spec.len());

    for token in spec.tokens() {
        let pages = expand(token, page_count)?;
        if pages.is_empty() {
            if mode == ResolveMode::Split {
                tracing::debug!(clause = %token, page_count, "skipping empty split clause");
                continue;
            }
            return Err(RangeError::EmptyClause {
                clause: token.to_string(),
                page_count,
            });
        }
        segments.push(PageSegment {
            clause: *token,
            pages,
        });
    }

    if segments.is_empty() {
        return Err(RangeError::NoPages { page_count });
    }

    let resolved = ResolvedPageSet {
        mode,
        page_count,
        segments,
    };

    if mode == ResolveMode::Reorder {
        check_permutation(&resolved)?;
    }

    tracing::debug!(
        ?mode,
        page_count,
        pages = resolved.len(),
        segments = resolved.segments.len(),
        "resolved page range"
    );
    Ok(resolved)
}

/// Expand a clause to concrete pages. Open-ended clauses starting past the
/// last page expand to nothing; explicit bounds past it are errors.
fn expand(token: &PageRangeToken, page_count: u32) -> Result<Vec<u32>, RangeError> {
    let start = token.start();
    let end = match token.end() {
        Some(end) => {
            if end > page_count {
                return Err(RangeError::PageOutOfBounds {
                    clause: token.to_string(),
                    page: end,
                    page_count,
                });
            }
            end
        }
        None => page_count,
    };

    if start > end {
        return Ok(Vec::new());
    }
    Ok((start..=end).collect())
}

fn check_permutation(resolved: &ResolvedPageSet) -> Result<(), RangeError> {
    let page_count = resolved.page_count;
    let mut seen = vec![false; page_count as usize];
    let mut duplicate = None;

    for page in resolved.iter() {
        let slot = &mut seen[(page - 1) as usize];
        if *slot && duplicate.is_none() {
            duplicate = Some(page);
        }
        *slot = true;
    }

    let missing = seen.iter().position(|used| !used).map(|i| i as u32 + 1);

    if duplicate.is_some() || missing.is_some() || resolved.len() != page_count as usize {
        return Err(RangeError::NotAPermutation {
            page_count,
            len: resolved.len(),
            duplicate,
            missing,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range::parse;
    use pretty_assertions::assert_eq;

    fn resolve_str(text: &str, page_count: u32, mode: ResolveMode) -> Result<Vec<u32>, RangeError> {
        resolve(&parse(text).unwrap(), page_count, mode).map(|r| r.pages())
    }

    #[test]
    fn test_mixed_clauses_expand_in_order() {
        let pages = resolve_str("1-3,5,7-", 10, ResolveMode::Rotate).unwrap();
        assert_eq!(pages, vec![1, 2, 3, 5, 7, 8, 9, 10]);
    }

    #[test]
    fn test_reorder_follows_clause_order() {
        let pages = resolve_str("3,1,2,4-", 5, ResolveMode::Reorder).unwrap();
        assert_eq!(pages, vec![3, 1, 2, 4, 5]);
    }

    #[test]
    fn test_reorder_rejects_duplicate_page() {
        let err = resolve_str("1,1,2-", 3, ResolveMode::Reorder).unwrap_err();
        assert_eq!(
            err,
            RangeError::NotAPermutation {
                page_count: 3,
                len: 4,
                duplicate: Some(1),
                missing: None,
            }
        );
    }

    #[test]
    fn test_reorder_rejects_missing_page() {
        let err = resolve_str("2,1", 3, ResolveMode::Reorder).unwrap_err();
        assert!(matches!(
            err,
            RangeError::NotAPermutation {
                missing: Some(3),
                duplicate: None,
                ..
            }
        ));
    }

    #[test]
    fn test_reorder_rejects_swap_of_duplicate_for_missing() {
        let err = resolve_str("1,2,2", 3, ResolveMode::Reorder).unwrap_err();
        assert!(matches!(
            err,
            RangeError::NotAPermutation {
                duplicate: Some(2),
                missing: Some(3),
                ..
            }
        ));
    }

    #[test]
    fn test_explicit_bound_past_end_fails_in_every_mode() {
        for mode in [ResolveMode::Split, ResolveMode::Reorder, ResolveMode::Rotate] {
            let err = resolve_str("1-12", 10, mode).unwrap_err();
            assert_eq!(
                err,
                RangeError::PageOutOfBounds {
                    clause: "1-12".to_string(),
                    page: 12,
                    page_count: 10,
                }
            );
            assert!(resolve_str("11", 10, mode).is_err());
        }
    }

    #[test]
    fn test_open_clause_past_end_rejected_for_rotate_and_reorder() {
        let err = resolve_str("1,6-", 5, ResolveMode::Rotate).unwrap_err();
        assert_eq!(
            err,
            RangeError::EmptyClause {
                clause: "6-".to_string(),
                page_count: 5,
            }
        );
        assert!(resolve_str("1-5,6-", 5, ResolveMode::Reorder).is_err());
    }

    #[test]
    fn test_open_clause_at_last_page() {
        let pages = resolve_str("5-", 5, ResolveMode::Rotate).unwrap();
        assert_eq!(pages, vec![5]);
    }

    #[test]
    fn test_split_skips_empty_clause() {
        let resolved = resolve(&parse("1-2,9-").unwrap(), 5, ResolveMode::Split).unwrap();
        assert_eq!(resolved.segments().len(), 1);
        assert_eq!(resolved.segments()[0].pages, vec![1, 2]);
    }

    #[test]
    fn test_split_all_empty_fails() {
        let err = resolve_str("6-,9-", 5, ResolveMode::Split).unwrap_err();
        assert_eq!(err, RangeError::NoPages { page_count: 5 });
    }

    #[test]
    fn test_split_segments_may_overlap() {
        let resolved = resolve(&parse("1-3,2-4").unwrap(), 4, ResolveMode::Split).unwrap();
        let segments: Vec<Vec<u32>> = resolved
            .segments()
            .iter()
            .map(|s| s.pages.clone())
            .collect();
        assert_eq!(segments, vec![vec![1, 2, 3], vec![2, 3, 4]]);
        assert_eq!(resolved.segments()[1].first(), Some(2));
        assert_eq!(resolved.segments()[1].last(), Some(4));
    }

    #[test]
    fn test_rotate_allows_duplicates_and_partial_cover() {
        let pages = resolve_str("2,2,4", 6, ResolveMode::Rotate).unwrap();
        assert_eq!(pages, vec![2, 2, 4]);
    }

    #[test]
    fn test_split_segment_limit() {
        let at_limit = vec!["1"; MAX_SPLIT_SEGMENTS].join(",");
        let resolved = resolve(&parse(&at_limit).unwrap(), 1, ResolveMode::Split).unwrap();
        assert_eq!(resolved.segments().len(), MAX_SPLIT_SEGMENTS);

        let over = vec!["1"; MAX_SPLIT_SEGMENTS + 1].join(",");
        assert_eq!(
            resolve(&parse(&over).unwrap(), 1, ResolveMode::Split).unwrap_err(),
            RangeError::TooManySegments {
                count: MAX_SPLIT_SEGMENTS + 1,
                limit: MAX_SPLIT_SEGMENTS
            }
        );
        // Rotate clauses do not produce files
        assert!(resolve(&parse(&over).unwrap(), 1, ResolveMode::Rotate).is_ok());
    }

    #[test]
    fn test_zero_page_document() {
        assert!(resolve_str("1-", 0, ResolveMode::Split).is_err());
        assert!(resolve_str("1", 0, ResolveMode::Rotate).is_err());
    }

    #[test]
    fn test_resolved_set_reports_mode_and_count() {
        let resolved = resolve(&parse("1-").unwrap(), 3, ResolveMode::Rotate).unwrap();
        assert_eq!(resolved.mode(), ResolveMode::Rotate);
        assert_eq!(resolved.page_count(), 3);
        assert_eq!(resolved.len(), 3);
        assert!(!resolved.is_empty());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::range::parse;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn split_open_range_covers_document(page_count in 1u32..400) {
            let resolved = resolve(&parse("1-").unwrap(), page_count, ResolveMode::Split).unwrap();
            prop_assert_eq!(resolved.segments().len(), 1);
            let expected: Vec<u32> = (1..=page_count).collect();
            prop_assert_eq!(&resolved.segments()[0].pages, &expected);
        }

        #[test]
        fn shuffled_singles_are_accepted_reorders(
            order in (1usize..40).prop_flat_map(|n| Just((1..=n as u32).collect::<Vec<_>>()).prop_shuffle())
        ) {
            let text = order.iter().map(|p| p.to_string()).collect::<Vec<_>>().join(",");
            let pages = resolve(&parse(&text).unwrap(), order.len() as u32, ResolveMode::Reorder)
                .unwrap()
                .pages();
            prop_assert_eq!(pages, order);
        }

        #[test]
        fn reorder_with_repeat_is_rejected(page_count in 2u32..40, repeat in 1u32..40) {
            let repeat = repeat.min(page_count);
            let text = format!("1-,{}", repeat);
            let result = resolve(&parse(&text).unwrap(), page_count, ResolveMode::Reorder);
            let is_permutation_error = matches!(result, Err(RangeError::NotAPermutation { .. }));
            prop_assert!(is_permutation_error);
        }
    }
}
