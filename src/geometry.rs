//! Geometry primitives shared by the designer and the overlay renderer.
//!
//! Design-time boxes live in the pixel space of the designer's container.
//! Persisted boxes are fractions of the *image's* displayed rectangle so they
//! can be replayed over the same image at any size.

use serde::{Deserialize, Serialize};

use crate::util::clamp;

/// Smallest cell edge, in pixels, the designer will accept.
pub const MIN_CELL_PX: f64 = 18.0;
/// Pointer distance from an edge that counts as grabbing it.
pub const CORNER_TOL: f64 = 14.0;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An on-screen rectangle (left/top/width/height), e.g. a measured element.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DisplayRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl DisplayRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// The same rectangle expressed relative to `origin`'s top-left corner.
    pub fn relative_to(&self, origin: &DisplayRect) -> DisplayRect {
        DisplayRect {
            left: self.left - origin.left,
            top: self.top - origin.top,
            width: self.width,
            height: self.height,
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0) || !self.width.is_finite() || !self.height.is_finite()
    }
}

/// Design-time box in container pixels. Always `x0 < x1` and `y0 < y1`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl BoundingBox {
    /// Box spanning two corners in any order; `None` when it would be empty.
    pub fn from_corners(a: Point, b: Point) -> Option<Self> {
        let x0 = a.x.min(b.x);
        let x1 = a.x.max(b.x);
        let y0 = a.y.min(b.y);
        let y1 = a.y.max(b.y);
        (x0 < x1 && y0 < y1).then_some(Self { x0, y0, x1, y1 })
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x0 && p.x <= self.x1 && p.y >= self.y0 && p.y <= self.y1
    }

    pub fn is_valid(&self) -> bool {
        self.x0 < self.x1 && self.y0 < self.y1
    }

    /// Uniform cell size for a `rows x cols` split.
    pub fn cell_size(&self, rows: usize, cols: usize) -> (f64, f64) {
        let w = if cols > 0 { self.width() / cols as f64 } else { 0.0 };
        let h = if rows > 0 { self.height() / rows as f64 } else { 0.0 };
        (w, h)
    }
}

/// Persisted box: fractions of the image's displayed rectangle, plus the
/// image size the fractions were taken against.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedBoundingBox {
    pub x0p: f64,
    pub y0p: f64,
    pub x1p: f64,
    pub y1p: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub design_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub design_height: Option<f64>,
}

impl NormalizedBoundingBox {
    /// Box extent in image pixels at design time, if the design size was recorded.
    pub fn design_extent(&self) -> Option<(f64, f64)> {
        match (self.design_width, self.design_height) {
            (Some(w), Some(h)) => Some((
                ((self.x1p - self.x0p) * w).round(),
                ((self.y1p - self.y0p) * h).round(),
            )),
            _ => None,
        }
    }
}

/// Normalize `bbox` (container pixels) against the image's rectangle, given
/// relative to the same container.
pub fn normalize(bbox: &BoundingBox, image: &DisplayRect) -> Option<NormalizedBoundingBox> {
    if image.is_empty() {
        return None;
    }
    let fx = |x: f64| clamp((x - image.left) / image.width, 0.0, 1.0);
    let fy = |y: f64| clamp((y - image.top) / image.height, 0.0, 1.0);
    Some(NormalizedBoundingBox {
        x0p: fx(bbox.x0),
        y0p: fy(bbox.y0),
        x1p: fx(bbox.x1),
        y1p: fy(bbox.y1),
        design_width: Some(image.width.round()),
        design_height: Some(image.height.round()),
    })
}

/// Place a persisted box over the image as it is displayed now. `image` is
/// relative to whatever container the result will be positioned in. Returns
/// `None` for an unloaded image or a box that collapsed under clamping.
pub fn denormalize(nb: &NormalizedBoundingBox, image: &DisplayRect) -> Option<BoundingBox> {
    if image.is_empty() {
        return None;
    }
    let bbox = BoundingBox {
        x0: image.left + nb.x0p * image.width,
        y0: image.top + nb.y0p * image.height,
        x1: image.left + nb.x1p * image.width,
        y1: image.top + nb.y1p * image.height,
    };
    bbox.is_valid().then_some(bbox)
}

/// Offset expressed as a fraction of `extent`; zero for an empty extent.
pub fn offset_fraction(offset_px: f64, extent_px: f64) -> f64 {
    if extent_px > 0.0 { offset_px / extent_px } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn from_corners_orders_and_rejects_degenerate() {
        let b = BoundingBox::from_corners(Point::new(40.0, 10.0), Point::new(5.0, 30.0)).unwrap();
        assert_eq!((b.x0, b.y0, b.x1, b.y1), (5.0, 10.0, 40.0, 30.0));
        assert!(BoundingBox::from_corners(Point::new(3.0, 3.0), Point::new(3.0, 9.0)).is_none());
    }

    #[test]
    fn normalize_is_anchored_to_image_not_container() {
        // image letterboxed 50px from the container's left edge
        let image = DisplayRect::new(50.0, 0.0, 200.0, 100.0);
        let b = BoundingBox { x0: 100.0, y0: 25.0, x1: 250.0, y1: 75.0 };
        let n = normalize(&b, &image).unwrap();
        assert_eq!((n.x0p, n.y0p, n.x1p, n.y1p), (0.25, 0.25, 1.0, 0.75));
        assert_eq!(n.design_width, Some(200.0));
        assert_eq!(n.design_extent(), Some((150.0, 50.0)));
    }

    #[test]
    fn normalize_clamps_outside_image() {
        let image = DisplayRect::new(10.0, 10.0, 100.0, 100.0);
        let b = BoundingBox { x0: 0.0, y0: 0.0, x1: 200.0, y1: 50.0 };
        let n = normalize(&b, &image).unwrap();
        assert_eq!((n.x0p, n.y0p, n.x1p), (0.0, 0.0, 1.0));
    }

    #[test]
    fn unloaded_image_yields_nothing() {
        let b = BoundingBox { x0: 0.0, y0: 0.0, x1: 10.0, y1: 10.0 };
        assert!(normalize(&b, &DisplayRect::default()).is_none());
        let n = normalize(&b, &DisplayRect::new(0.0, 0.0, 20.0, 20.0)).unwrap();
        assert!(denormalize(&n, &DisplayRect::new(0.0, 0.0, 0.0, 0.0)).is_none());
    }

    #[test]
    fn offset_fraction_handles_zero_extent() {
        assert_eq!(offset_fraction(110.0, 0.0), 0.0);
        assert_eq!(offset_fraction(50.0, 200.0), 0.25);
    }

    proptest! {
        #[test]
        fn normalization_round_trip_rescales(
            iw in 50.0f64..2000.0,
            ih in 50.0f64..2000.0,
            il in 0.0f64..300.0,
            it in 0.0f64..300.0,
            fx0 in 0.0f64..0.45,
            fy0 in 0.0f64..0.45,
            fx1 in 0.55f64..1.0,
            fy1 in 0.55f64..1.0,
            scale in 0.2f64..5.0,
            nl in 0.0f64..300.0,
            nt in 0.0f64..300.0,
        ) {
            let image = DisplayRect::new(il, it, iw, ih);
            let b = BoundingBox {
                x0: il + fx0 * iw,
                y0: it + fy0 * ih,
                x1: il + fx1 * iw,
                y1: it + fy1 * ih,
            };
            let n = normalize(&b, &image).unwrap();
            let resized = DisplayRect::new(nl, nt, iw * scale, ih * scale);
            let back = denormalize(&n, &resized).unwrap();
            let expect = |v: f64, o: f64, no: f64| no + (v - o) * scale;
            prop_assert!((back.x0 - expect(b.x0, il, nl)).abs() <= 1.0);
            prop_assert!((back.y0 - expect(b.y0, it, nt)).abs() <= 1.0);
            prop_assert!((back.x1 - expect(b.x1, il, nl)).abs() <= 1.0);
            prop_assert!((back.y1 - expect(b.y1, it, nt)).abs() <= 1.0);
        }
    }
}
