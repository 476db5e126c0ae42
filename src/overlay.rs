//! Overlay renderer: replays a persisted grid over the image as it is shown now.
//!
//! Everything is computed from the grid plus the image's display rectangle
//! relative to the overlay container. Cell targets use uniform bands; player
//! labels use the stored band centers, so a hand-adjusted grid still labels
//! the right rows and columns.

use crate::geometry::{self, BoundingBox, DisplayRect};
use crate::model::{Axis, Grid, PlayerOverlay, DEFAULT_COL_OFFSET, DEFAULT_ROW_OFFSET};
use crate::util::{clamp_i, finite_or};

/// A clickable dab cell, relative to the overlay box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellRect {
    pub row: usize,
    pub col: usize,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// A player label, relative to the overlay box. Column labels are drawn
/// rotated -90deg about their bottom center.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelRect {
    pub axis: Axis,
    pub index: usize,
    pub name: String,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub font_px: f64,
}

impl LabelRect {
    pub fn rotated(&self) -> bool {
        self.axis == Axis::Col
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct OverlayGeometry {
    /// Overlay box in container pixels.
    pub bbox: BoundingBox,
    pub cells: Vec<CellRect>,
    pub row_labels: Vec<LabelRect>,
    pub col_labels: Vec<LabelRect>,
}

/// Names maintained outside the grid (the player list). They win over the
/// names stored with the grid when non-empty.
#[derive(Clone, Copy, Debug, Default)]
pub struct GlobalNames<'a> {
    pub rows: &'a [String],
    pub cols: &'a [String],
}

/// Absolute overlay geometry, or `None` when the image is not displayed.
pub fn render(grid: &Grid, image: &DisplayRect, names: GlobalNames<'_>) -> Option<OverlayGeometry> {
    let bbox = geometry::denormalize(&grid.bbox, image)?;
    let rows = grid.rows.max(1);
    let cols = grid.cols.max(1);
    let (cell_w, cell_h) = bbox.cell_size(rows, cols);

    let cells = if grid.overlay_type.includes_dab() {
        (0..rows)
            .flat_map(|r| {
                (0..cols).map(move |c| CellRect {
                    row: r,
                    col: c,
                    left: c as f64 * cell_w,
                    top: r as f64 * cell_h,
                    width: cell_w,
                    height: cell_h,
                })
            })
            .collect()
    } else {
        Vec::new()
    };

    let (row_labels, col_labels) = match grid.player_overlay.as_ref() {
        Some(p) if grid.overlay_type.includes_players() => {
            let labels = Labels { grid, overlay: p, bbox: &bbox, cell_w, cell_h, names };
            let row_labels = if p.show_rows { labels.rows() } else { Vec::new() };
            let col_labels = if p.show_cols { labels.cols() } else { Vec::new() };
            (row_labels, col_labels)
        }
        _ => (Vec::new(), Vec::new()),
    };

    Some(OverlayGeometry {
        bbox,
        cells,
        row_labels,
        col_labels,
    })
}

/// Band centers along an axis in box pixels: stored fractions when they fit
/// the grid, uniform otherwise.
pub fn band_centers(stored: Option<&[f64]>, count: usize, size: f64) -> Vec<f64> {
    match stored {
        Some(pcts) if pcts.len() == count && pcts.iter().all(|p| p.is_finite()) => {
            pcts.iter().map(|p| p * size).collect()
        }
        _ => {
            let band = if count > 0 { size / count as f64 } else { 0.0 };
            (0..count).map(|i| (i as f64 + 0.5) * band).collect()
        }
    }
}

/// Label name: player list entry, then the grid's stored name, then a
/// positional default.
pub fn resolve_name(global: &[String], stored: Option<&str>, axis: Axis, index: usize) -> String {
    if let Some(n) = global.get(index).filter(|n| !n.is_empty()) {
        return n.clone();
    }
    if let Some(n) = stored.filter(|n| !n.is_empty()) {
        return n.to_owned();
    }
    match axis {
        Axis::Row => format!("Row {}", index + 1),
        Axis::Col => format!("Col {}", index + 1),
    }
}

/// Row label `(width, height, font px)` for a band `band_h` tall whose label
/// sits `offset` px left of the box.
pub fn row_label_size(offset: f64, band_h: f64) -> (f64, f64, f64) {
    (
        clamp_i(round_i(offset - 8.0), 60, 160) as f64,
        clamp_i(round_i(band_h * 0.65), 20, 32) as f64,
        clamp_i(round_i(band_h * 0.45), 10, 18) as f64,
    )
}

/// Column label `(width, height, font px)`, before rotation.
pub fn col_label_size(offset: f64, band_w: f64) -> (f64, f64, f64) {
    (
        clamp_i(round_i(band_w * 0.8), 20, 40) as f64,
        clamp_i(round_i(offset - 8.0), 60, 140) as f64,
        clamp_i(round_i(band_w * 0.4), 10, 16) as f64,
    )
}

struct Labels<'a> {
    grid: &'a Grid,
    overlay: &'a PlayerOverlay,
    bbox: &'a BoundingBox,
    cell_w: f64,
    cell_h: f64,
    names: GlobalNames<'a>,
}

fn round_i(v: f64) -> i64 {
    finite_or(v, 0.0).round() as i64
}

impl Labels<'_> {
    fn offset(pct: Option<f64>, extent: f64, px: f64, fallback: f64) -> f64 {
        match pct.filter(|p| p.is_finite()) {
            Some(p) => (p * extent).round(),
            None => finite_or(px, fallback),
        }
    }

    fn rows(&self) -> Vec<LabelRect> {
        let p = self.overlay;
        let offset = Self::offset(p.row_offset_pct, self.bbox.width(), p.row_offset, DEFAULT_ROW_OFFSET);
        let (width, height, font_px) = row_label_size(offset, self.cell_h);
        band_centers(p.row_centers_pct.as_deref(), self.grid.rows, self.bbox.height())
            .into_iter()
            .enumerate()
            .map(|(i, center)| LabelRect {
                axis: Axis::Row,
                index: i,
                name: resolve_name(self.names.rows, p.name(Axis::Row, i), Axis::Row, i),
                left: -offset,
                top: center - height / 2.0,
                width,
                height,
                font_px,
            })
            .collect()
    }

    fn cols(&self) -> Vec<LabelRect> {
        let p = self.overlay;
        let offset = Self::offset(p.col_offset_pct, self.bbox.height(), p.col_offset, DEFAULT_COL_OFFSET);
        let (width, height, font_px) = col_label_size(offset, self.cell_w);
        band_centers(p.col_centers_pct.as_deref(), self.grid.cols, self.bbox.width())
            .into_iter()
            .enumerate()
            .map(|(i, center)| LabelRect {
                axis: Axis::Col,
                index: i,
                name: resolve_name(self.names.cols, p.name(Axis::Col, i), Axis::Col, i),
                left: center - width / 2.0,
                top: -offset - height + 8.0,
                width,
                height,
                font_px,
            })
            .collect()
    }
}
