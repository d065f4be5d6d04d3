//! Page-range expressions
//!
//! Parses text like `"1-3, 5, 7-"` into an ordered list of clauses. Clause
//! order is kept as written: it is the output page order for reorder and
//! the output file order for split.
//!
//! Grammar:
//!
//! ```text
//! ranges := clause (',' clause)*
//! clause := NUMBER | NUMBER '-' NUMBER | NUMBER '-'
//! ```

use crate::error::{SyntaxError, SyntaxReason};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single clause of a page-range expression (1-based pages)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PageRangeToken {
    /// `5`
    Single { page: u32 },
    /// `1-3`, inclusive on both ends
    Closed { start: u32, end: u32 },
    /// `7-`, through the last page
    OpenEnded { start: u32 },
}

impl PageRangeToken {
    pub fn start(&self) -> u32 {
        match *self {
            PageRangeToken::Single { page } => page,
            PageRangeToken::Closed { start, .. } => start,
            PageRangeToken::OpenEnded { start } => start,
        }
    }

    /// Explicit upper bound, `None` for open-ended clauses
    pub fn end(&self) -> Option<u32> {
        match *self {
            PageRangeToken::Single { page } => Some(page),
            PageRangeToken::Closed { end, .. } => Some(end),
            PageRangeToken::OpenEnded { .. } => None,
        }
    }
}

impl fmt::Display for PageRangeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageRangeToken::Single { page } => write!(f, "{}", page),
            PageRangeToken::Closed { start, end } => write!(f, "{}-{}", start, end),
            PageRangeToken::OpenEnded { start } => write!(f, "{}-", start),
        }
    }
}

/// Ordered clauses as written by the user. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRangeSpec {
    tokens: Vec<PageRangeToken>,
}

impl PageRangeSpec {
    pub fn tokens(&self) -> &[PageRangeToken] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl fmt::Display for PageRangeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.tokens.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", token)?;
        }
        Ok(())
    }
}

impl FromStr for PageRangeSpec {
    type Err = SyntaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

/// Parse a page-range expression like `"1-3,5,7-"`
pub fn parse(text: &str) -> Result<PageRangeSpec, SyntaxError> {
    // Character check runs first so the error points at the offending clause
    // even when that clause would also be malformed for another reason.
    for (index, clause) in text.split(',').enumerate() {
        if let Some(c) = clause
            .chars()
            .find(|c| !(c.is_ascii_digit() || *c == '-' || *c == ' '))
        {
            return Err(syntax(clause, index, SyntaxReason::InvalidCharacter(c)));
        }
    }

    let tokens = text
        .split(',')
        .enumerate()
        .map(|(index, clause)| parse_clause(clause, index))
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(clauses = tokens.len(), "parsed page range");
    Ok(PageRangeSpec { tokens })
}

fn parse_clause(raw: &str, index: usize) -> Result<PageRangeToken, SyntaxError> {
    let clause = raw.trim();
    if clause.is_empty() {
        return Err(syntax(clause, index, SyntaxReason::EmptyClause));
    }

    let Some((start, end)) = clause.split_once('-') else {
        let page = parse_bound(clause, clause, index)?;
        return Ok(PageRangeToken::Single { page });
    };

    let start = start.trim();
    let end = end.trim();
    if start.is_empty() || end.contains('-') {
        return Err(syntax(clause, index, SyntaxReason::MalformedRange));
    }

    let start = parse_bound(start, clause, index)?;
    if end.is_empty() {
        return Ok(PageRangeToken::OpenEnded { start });
    }

    let end = parse_bound(end, clause, index)?;
    if end < start {
        return Err(syntax(clause, index, SyntaxReason::Backwards));
    }
    Ok(PageRangeToken::Closed { start, end })
}

fn parse_bound(bound: &str, clause: &str, index: usize) -> Result<u32, SyntaxError> {
    // `str::parse::<u32>` accepts a leading '+', which the grammar does not
    if bound.is_empty() || !bound.bytes().all(|b| b.is_ascii_digit()) {
        return Err(syntax(clause, index, SyntaxReason::NotANumber));
    }
    let page: u32 = bound
        .parse()
        .map_err(|_| syntax(clause, index, SyntaxReason::NotANumber))?;
    if page == 0 {
        return Err(syntax(clause, index, SyntaxReason::ZeroPage));
    }
    Ok(page)
}

fn syntax(clause: &str, index: usize, reason: SyntaxReason) -> SyntaxError {
    SyntaxError {
        clause: clause.trim().to_string(),
        index,
        reason,
    }
}
