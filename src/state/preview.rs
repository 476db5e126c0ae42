// User-chosen size of the card preview, dragged from its bottom-right handle.
use serde::{Deserialize, Serialize};

use crate::geometry::Point;

pub const MIN_PREVIEW_W: f64 = 120.0;
pub const MIN_PREVIEW_H: f64 = 80.0;

/// `None` on either side means the preview sizes itself to the image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PreviewSize {
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl PreviewSize {
    pub fn is_auto(&self) -> bool {
        self.width.is_none() && self.height.is_none()
    }

    /// Drops sides that are not finite or fall below the minimum.
    pub fn sanitized(self) -> Self {
        let keep = |v: Option<f64>, min: f64| v.filter(|v| v.is_finite() && *v >= min);
        Self {
            width: keep(self.width, MIN_PREVIEW_W),
            height: keep(self.height, MIN_PREVIEW_H),
        }
    }

    /// Inline CSS for the preview container.
    pub fn style(&self) -> String {
        let mut css = String::new();
        if let Some(w) = self.width {
            css.push_str(&format!(" width:{}px;", w));
        }
        if let Some(h) = self.height {
            css.push_str(&format!(" height:{}px;", h));
        }
        css
    }
}

/// One drag of the resize handle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PreviewResize {
    start: Point,
    start_w: f64,
    start_h: f64,
}

impl PreviewResize {
    pub fn begin(client: Point, width: f64, height: f64) -> Self {
        Self {
            start: client,
            start_w: width,
            start_h: height,
        }
    }

    pub fn size_at(&self, client: Point) -> PreviewSize {
        PreviewSize {
            width: Some((self.start_w + client.x - self.start.x).round().max(MIN_PREVIEW_W)),
            height: Some((self.start_h + client.y - self.start.y).round().max(MIN_PREVIEW_H)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drag_grows_and_floors_the_preview() {
        let r = PreviewResize::begin(Point::new(500.0, 400.0), 300.0, 200.0);
        assert_eq!(
            r.size_at(Point::new(550.4, 380.0)),
            PreviewSize { width: Some(350.0), height: Some(180.0) }
        );
        assert_eq!(
            r.size_at(Point::new(0.0, 0.0)),
            PreviewSize { width: Some(MIN_PREVIEW_W), height: Some(MIN_PREVIEW_H) }
        );
    }

    #[test]
    fn stored_sizes_are_checked() {
        let stored: PreviewSize = serde_json::from_str(r#"{"width":null,"height":null}"#).unwrap();
        assert!(stored.sanitized().is_auto());
        let odd = PreviewSize { width: Some(40.0), height: Some(f64::NAN) };
        assert!(odd.sanitized().is_auto());
        let ok = PreviewSize { width: Some(640.0), height: Some(480.0) };
        assert_eq!(ok.sanitized(), ok);
        assert_eq!(ok.style(), " width:640px; height:480px;");
        assert_eq!(PreviewSize::default().style(), "");
    }
}
