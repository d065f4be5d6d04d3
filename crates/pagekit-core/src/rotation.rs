//! Page rotation state
//!
//! Stored rotation is always one of 0/90/180/270. Deltas compose additively
//! in the order pages are visited, so mentioning a page twice rotates it twice.

use crate::error::RangeError;
use crate::resolve::ResolvedPageSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Canonical clockwise page rotation, as stored in a page's `/Rotate`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u16")]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [
        Rotation::Deg0,
        Rotation::Deg90,
        Rotation::Deg180,
        Rotation::Deg270,
    ];

    /// Normalize any multiple of 90 (negative or >= 360) into the canonical set
    pub fn from_degrees(degrees: i64) -> Result<Self, RangeError> {
        if degrees % 90 != 0 {
            return Err(RangeError::InvalidRotation { degrees });
        }
        Ok(match degrees.rem_euclid(360) {
            0 => Rotation::Deg0,
            90 => Rotation::Deg90,
            180 => Rotation::Deg180,
            _ => Rotation::Deg270,
        })
    }

    pub fn degrees(self) -> u16 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    /// Whether the displayed box swaps width and height
    pub fn is_quarter_turn(self) -> bool {
        matches!(self, Rotation::Deg90 | Rotation::Deg270)
    }

    pub fn apply(self, delta: RotationDelta) -> Rotation {
        apply(self, delta)
    }
}

impl TryFrom<i64> for Rotation {
    type Error = RangeError;

    fn try_from(degrees: i64) -> Result<Self, Self::Error> {
        Rotation::from_degrees(degrees)
    }
}

impl From<Rotation> for u16 {
    fn from(rotation: Rotation) -> Self {
        rotation.degrees()
    }
}

/// A user-requested rotation, any integer multiple of 90 degrees
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct RotationDelta(i64);

impl RotationDelta {
    pub fn new(degrees: i64) -> Result<Self, RangeError> {
        if degrees % 90 != 0 {
            return Err(RangeError::InvalidRotation { degrees });
        }
        Ok(Self(degrees))
    }

    pub fn degrees(self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for RotationDelta {
    type Error = RangeError;

    fn try_from(degrees: i64) -> Result<Self, Self::Error> {
        RotationDelta::new(degrees)
    }
}

impl From<RotationDelta> for i64 {
    fn from(delta: RotationDelta) -> Self {
        delta.0
    }
}

/// `(current + delta) mod 360`, mapped into the canonical set
pub fn apply(current: Rotation, delta: RotationDelta) -> Rotation {
    let turns = (i64::from(current.degrees()) + delta.0.rem_euclid(360)).rem_euclid(360);
    match turns {
        0 => Rotation::Deg0,
        90 => Rotation::Deg90,
        180 => Rotation::Deg180,
        _ => Rotation::Deg270,
    }
}

/// Final stored rotation for every page a request touched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RotationPlan {
    pages: BTreeMap<u32, Rotation>,
}

impl RotationPlan {
    /// Rotation to store on a 1-based page, `None` if the page is unaffected
    pub fn get(&self, page: u32) -> Option<Rotation> {
        self.pages.get(&page).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, Rotation)> + '_ {
        self.pages.iter().map(|(page, rotation)| (*page, *rotation))
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// Fold `delta` over the resolved pages left to right, starting each page
/// from its current stored rotation.
pub fn plan<F>(resolved: &ResolvedPageSet, current: F, delta: RotationDelta) -> RotationPlan
where
    F: Fn(u32) -> Rotation,
{
    let mut pages = BTreeMap::new();
    for page in resolved.iter() {
        let entry = pages.entry(page).or_insert_with(|| current(page));
        *entry = apply(*entry, delta);
    }
    tracing::debug!(pages = pages.len(), delta = delta.0, "planned rotation");
    RotationPlan { pages }
}
