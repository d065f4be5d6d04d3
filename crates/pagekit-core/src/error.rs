use thiserror::Error;

/// Why a page-range clause failed to parse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxReason {
    /// A character outside digits, comma, dash and space
    InvalidCharacter(char),
    /// Leading, trailing or doubled comma (or empty input)
    EmptyClause,
    /// A bound that is not a plain non-negative integer
    NotANumber,
    /// Page numbers are 1-based
    ZeroPage,
    /// `-5`, `1-2-3` and friends
    MalformedRange,
    /// `end` smaller than `start`
    Backwards,
}

impl std::fmt::Display for SyntaxReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyntaxReason::InvalidCharacter(c) => write!(f, "unexpected character {:?}", c),
            SyntaxReason::EmptyClause => write!(f, "empty clause"),
            SyntaxReason::NotANumber => write!(f, "page bound is not a number"),
            SyntaxReason::ZeroPage => write!(f, "page numbers start at 1"),
            SyntaxReason::MalformedRange => write!(f, "malformed range"),
            SyntaxReason::Backwards => write!(f, "range end is before its start"),
        }
    }
}

/// Malformed page-range text. Always a client input problem.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid page range clause {index} ('{clause}'): {reason}")]
pub struct SyntaxError {
    /// Offending clause as written (trimmed)
    pub clause: String,
    /// 0-based position of the clause in the expression
    pub index: usize,
    pub reason: SyntaxReason,
}

/// A well-formed range that does not fit the loaded document
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    #[error("Page {page} in '{clause}' does not exist (document has {page_count} pages)")]
    PageOutOfBounds {
        clause: String,
        page: u32,
        page_count: u32,
    },

    #[error("Clause '{clause}' selects no pages (document has {page_count} pages)")]
    EmptyClause { clause: String, page_count: u32 },

    #[error("Page range selects no pages (document has {page_count} pages)")]
    NoPages { page_count: u32 },

    #[error(
        "Reorder must use every page exactly once (document has {page_count} pages, got {len}{})",
        permutation_detail(.duplicate, .missing)
    )]
    NotAPermutation {
        page_count: u32,
        len: usize,
        duplicate: Option<u32>,
        missing: Option<u32>,
    },

    #[error("Rotation must be a multiple of 90 degrees, got {degrees}")]
    InvalidRotation { degrees: i64 },

    #[error("Split would produce {count} files (at most {limit} allowed)")]
    TooManySegments { count: usize, limit: usize },
}

fn permutation_detail(duplicate: &Option<u32>, missing: &Option<u32>) -> String {
    let mut detail = String::new();
    if let Some(page) = duplicate {
        detail.push_str(&format!("; page {} repeated", page));
    }
    if let Some(page) = missing {
        detail.push_str(&format!("; page {} missing", page));
    }
    detail
}

/// Invalid highlight geometry. Indicates a client/server desync or a corrupted payload.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("Highlight on page index {page_index} has a non-finite coordinate")]
    NonFinite { page_index: usize },

    #[error(
        "Highlight on page index {page_index} leaves the page box \
         (left={left}, top={top}, width={width}, height={height})"
    )]
    OutOfBounds {
        page_index: usize,
        left: f64,
        top: f64,
        width: f64,
        height: f64,
    },

    #[error("Highlight references page index {page_index} but document has {page_count} pages")]
    PageOutOfRange {
        page_index: usize,
        page_count: usize,
    },

    #[error("Page size {width}x{height} is not a positive finite size")]
    InvalidPageSize { width: f64, height: f64 },
}

/// Category of a [`PageError`], for mapping onto a transport status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Syntax,
    Range,
    Geometry,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Syntax => "syntax",
            ErrorKind::Range => "range",
            ErrorKind::Geometry => "geometry",
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PageError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    Range(#[from] RangeError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

impl PageError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PageError::Syntax(_) => ErrorKind::Syntax,
            PageError::Range(_) => ErrorKind::Range,
            PageError::Geometry(_) => ErrorKind::Geometry,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_error_names_clause() {
        let err = SyntaxError {
            clause: "-5".to_string(),
            index: 1,
            reason: SyntaxReason::MalformedRange,
        };
        let msg = err.to_string();
        assert!(msg.contains("'-5'"));
        assert!(msg.contains("malformed range"));
    }

    #[test]
    fn test_permutation_message_lists_pages() {
        let err = RangeError::NotAPermutation {
            page_count: 3,
            len: 3,
            duplicate: Some(1),
            missing: Some(3),
        };
        let msg = err.to_string();
        assert!(msg.contains("page 1 repeated"));
        assert!(msg.contains("page 3 missing"));
    }

    #[test]
    fn test_page_error_kind() {
        let err: PageError = RangeError::NoPages { page_count: 2 }.into();
        assert_eq!(err.kind(), ErrorKind::Range);
        assert_eq!(err.kind().as_str(), "range");
    }
}
