//! Viewer-space to PDF-space rectangle mapping
//!
//! The viewer shows a page already rotated by its `/Rotate` flag and reports
//! selections as fractions of that displayed box, measured from its top-left
//! corner. Annotations must be written in the page's intrinsic frame: the
//! unrotated box with origin at the bottom-left corner.
//!
//! Rotation is clockwise. For a page of intrinsic size `pw x ph`:
//!
//! | rotation | displayed box | intrinsic x           | intrinsic y           |
//! |----------|---------------|-----------------------|-----------------------|
//! | 0        | `pw x ph`     | `x_disp`              | `ph - y_top - h_disp` |
//! | 90       | `ph x pw`     | `y_top`               | `x_disp`              |
//! | 180      | `pw x ph`     | `pw - x_disp - w_disp`| `y_top`               |
//! | 270      | `ph x pw`     | `pw - y_top - h_disp` | `ph - x_disp - w_disp`|
//!
//! Quarter turns swap width and height.

use crate::error::GeometryError;
use crate::rotation::Rotation;
use serde::{Deserialize, Serialize};

/// Slack allowed on the [0,1] bounds for float noise from the viewer
const EDGE_TOLERANCE: f64 = 1e-9;

/// Rectangle in PDF user space (points), origin at the page's bottom-left,
/// in the page's unrotated frame.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PdfRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PdfRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// `[llx, lly, urx, ury]`, the layout of an annotation `/Rect`
    pub fn corners(&self) -> [f64; 4] {
        [self.x, self.y, self.x + self.width, self.y + self.height]
    }

    /// Highlight quad: upper-left, upper-right, lower-left, lower-right
    pub fn quad_points(&self) -> [f64; 8] {
        let [x1, y1, x2, y2] = self.corners();
        [x1, y2, x2, y2, x1, y1, x2, y1]
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }
}

/// Physical page size (points, unrotated) and stored rotation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PageGeometry {
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub rotation: Rotation,
}

impl PageGeometry {
    pub fn new(width: f64, height: f64, rotation: Rotation) -> Self {
        Self {
            width,
            height,
            rotation,
        }
    }

    /// US Letter, unrotated
    pub fn letter() -> Self {
        Self::new(612.0, 792.0, Rotation::Deg0)
    }

    /// Size of the box the viewer shows, after rotation
    pub fn displayed_size(&self) -> (f64, f64) {
        if self.rotation.is_quarter_turn() {
            (self.height, self.width)
        } else {
            (self.width, self.height)
        }
    }

    fn validate(&self) -> Result<(), GeometryError> {
        let ok = |v: f64| v.is_finite() && v > 0.0;
        if ok(self.width) && ok(self.height) {
            Ok(())
        } else {
            Err(GeometryError::InvalidPageSize {
                width: self.width,
                height: self.height,
            })
        }
    }
}

/// A highlight selection as the viewer reports it: fractions of the
/// displayed (post-rotation) page box, top-left origin.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedRect {
    /// 0-based
    pub page_index: usize,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    /// Client-side tracking token, never persisted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl NormalizedRect {
    pub fn new(page_index: usize, left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            page_index,
            left,
            top,
            width,
            height,
            id: None,
        }
    }

    /// Zero-area selections are legal but carry no visual information
    pub fn is_zero_area(&self) -> bool {
        self.width == 0.0 || self.height == 0.0
    }

    /// Reject non-finite values and boxes that leave the unit square
    pub fn validate(&self) -> Result<(), GeometryError> {
        let fields = [self.left, self.top, self.width, self.height];
        if fields.iter().any(|v| !v.is_finite()) {
            return Err(GeometryError::NonFinite {
                page_index: self.page_index,
            });
        }

        let in_unit = |v: f64| (-EDGE_TOLERANCE..=1.0 + EDGE_TOLERANCE).contains(&v);
        let inside = fields.iter().all(|v| in_unit(*v))
            && in_unit(self.left + self.width)
            && in_unit(self.top + self.height);
        if !inside {
            return Err(GeometryError::OutOfBounds {
                page_index: self.page_index,
                left: self.left,
                top: self.top,
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

/// Map a viewer selection into the page's intrinsic bottom-left frame
pub fn to_pdf(rect: &NormalizedRect, page: &PageGeometry) -> Result<PdfRect, GeometryError> {
    rect.validate()?;
    page.validate()?;

    if rect.is_zero_area() {
        tracing::debug!(page_index = rect.page_index, "zero-area highlight selection");
    }

    let (pw, ph) = (page.width, page.height);
    let (dw, dh) = page.displayed_size();

    let x_disp = rect.left * dw;
    let y_top = rect.top * dh;
    let w_disp = rect.width * dw;
    let h_disp = rect.height * dh;

    let mapped = match page.rotation {
        Rotation::Deg0 => PdfRect::new(x_disp, ph - y_top - h_disp, w_disp, h_disp),
        Rotation::Deg90 => PdfRect::new(y_top, x_disp, h_disp, w_disp),
        Rotation::Deg180 => PdfRect::new(pw - x_disp - w_disp, y_top, w_disp, h_disp),
        Rotation::Deg270 => {
            PdfRect::new(pw - y_top - h_disp, ph - x_disp - w_disp, h_disp, w_disp)
        }
    };
    Ok(mapped)
}

/// Project an intrinsic-frame rectangle onto the displayed box and
/// renormalize. Inverse of [`to_pdf`].
pub fn to_normalized(
    rect: &PdfRect,
    page_index: usize,
    page: &PageGeometry,
) -> Result<NormalizedRect, GeometryError> {
    page.validate()?;

    let (pw, ph) = (page.width, page.height);
    let (dw, dh) = page.displayed_size();

    let (x_disp, y_top, w_disp, h_disp) = match page.rotation {
        Rotation::Deg0 => (rect.x, ph - rect.y - rect.height, rect.width, rect.height),
        Rotation::Deg90 => (rect.y, rect.x, rect.height, rect.width),
        Rotation::Deg180 => (pw - rect.x - rect.width, rect.y, rect.width, rect.height),
        Rotation::Deg270 => (
            ph - rect.y - rect.height,
            pw - rect.x - rect.width,
            rect.height,
            rect.width,
        ),
    };

    Ok(NormalizedRect::new(
        page_index,
        x_disp / dw,
        y_top / dh,
        w_disp / dw,
        h_disp / dh,
    ))
}
