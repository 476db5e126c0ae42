// Grid designer state: box editor, dividers, numbering and player labels,
// plus conversion of all of it into a persisted `Grid`.
use crate::error::{GridError, Result};
use crate::geometry::{self, BoundingBox, DisplayRect, Point, MIN_CELL_PX};
use crate::model::{
    fit_names, Axis, Grid, GridDefaults, NumberOrder, OverlayType, PlayerOverlay,
    DEFAULT_COL_OFFSET, DEFAULT_ROW_OFFSET,
};
use crate::numbering::Numbering;
use crate::util::clog;

use super::dividers::DividerLayout;
use super::rect_editor::RectEditor;

/// Labels can't be dragged closer to the box than this.
pub const MIN_LABEL_OFFSET: f64 = 4.0;

#[derive(Clone, Copy, Debug, PartialEq)]
struct LabelDrag {
    axis: Axis,
    start_client: f64,
    start_offset: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Designer {
    editor: RectEditor,
    dividers: Option<DividerLayout>,
    numbering: Numbering,
    rows: usize,
    cols: usize,
    pub overlay_type: OverlayType,
    player_rows: Vec<String>,
    player_cols: Vec<String>,
    pub row_offset: f64,
    pub col_offset: f64,
    pub show_rows: bool,
    pub show_cols: bool,
    label_drag: Option<LabelDrag>,
}

impl Designer {
    pub fn new(defaults: &GridDefaults, container_w: f64, container_h: f64) -> Self {
        let rows = defaults.rows.max(1);
        let cols = defaults.cols.max(1);
        Self {
            editor: RectEditor::new(container_w, container_h, rows, cols),
            dividers: None,
            numbering: Numbering::new(rows, cols, defaults.order, defaults.first_num, defaults.scrambled),
            rows,
            cols,
            overlay_type: defaults.overlay_type,
            player_rows: fit_names(&[], rows),
            player_cols: fit_names(&[], cols),
            row_offset: defaults.player_row_offset,
            col_offset: defaults.player_col_offset,
            show_rows: defaults.show_player_rows,
            show_cols: defaults.show_player_cols,
            label_drag: None,
        }
    }

    /// Reopens an existing grid. `image` is the image rectangle relative to
    /// the designer container; the saved box is replayed over it.
    pub fn from_grid(
        grid: &Grid,
        defaults: &GridDefaults,
        image: &DisplayRect,
        container_w: f64,
        container_h: f64,
    ) -> Self {
        let rows = grid.rows.max(1);
        let cols = grid.cols.max(1);
        let bbox = geometry::denormalize(&grid.bbox, image);
        let overlay = grid.player_overlay.as_ref();
        let mut d = Self {
            editor: RectEditor::new(container_w, container_h, rows, cols).with_bbox(bbox),
            dividers: None,
            numbering: Numbering::with_values(rows, cols, &grid.numbering, grid.values.clone()),
            rows,
            cols,
            overlay_type: grid.overlay_type,
            player_rows: fit_names(overlay.map_or(&[][..], |p| p.rows.as_slice()), rows),
            player_cols: fit_names(overlay.map_or(&[][..], |p| p.cols.as_slice()), cols),
            row_offset: overlay.map_or(defaults.player_row_offset, |p| p.row_offset),
            col_offset: overlay.map_or(defaults.player_col_offset, |p| p.col_offset),
            show_rows: overlay.map_or(defaults.show_player_rows, |p| p.show_rows),
            show_cols: overlay.map_or(defaults.show_player_cols, |p| p.show_cols),
            label_drag: None,
        };
        d.relayout();
        d
    }

    pub fn editor(&self) -> &RectEditor {
        &self.editor
    }

    pub fn dividers(&self) -> Option<&DividerLayout> {
        self.dividers.as_ref()
    }

    pub fn numbering(&self) -> &Numbering {
        &self.numbering
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn player_names(&self, axis: Axis) -> &[String] {
        match axis {
            Axis::Row => &self.player_rows,
            Axis::Col => &self.player_cols,
        }
    }

    fn relayout(&mut self) {
        self.dividers = self
            .editor
            .bbox()
            .map(|b| DividerLayout::uniform(b.width(), b.height(), self.rows, self.cols));
    }

    pub fn set_container(&mut self, width: f64, height: f64) {
        self.editor.set_container(width, height);
    }

    pub fn set_shape(&mut self, rows: usize, cols: usize) {
        let rows = rows.max(1);
        let cols = cols.max(1);
        if (rows, cols) == (self.rows, self.cols) {
            return;
        }
        self.rows = rows;
        self.cols = cols;
        self.editor.set_shape(rows, cols);
        self.numbering.set_shape(rows, cols);
        self.player_rows = fit_names(&self.player_rows, rows);
        self.player_cols = fit_names(&self.player_cols, cols);
        self.relayout();
    }

    pub fn set_order(&mut self, order: NumberOrder) {
        self.numbering.set_order(order);
    }

    pub fn set_first(&mut self, first: i64) {
        self.numbering.set_first(first);
    }

    pub fn set_manual(&mut self, manual: bool) {
        self.numbering.set_manual(manual);
    }

    pub fn set_cell(&mut self, r: usize, c: usize, value: Option<i64>) {
        self.numbering.set_cell(r, c, value);
    }

    pub fn reset_defaults(&mut self, defaults: &GridDefaults) {
        self.set_shape(defaults.rows, defaults.cols);
        self.numbering.reset(self.rows, self.cols, defaults.order);
        self.numbering.set_first(defaults.first_num);
    }

    pub fn snap_to_image(&mut self, image: &DisplayRect) {
        self.editor.snap_to(image);
        self.relayout();
    }

    // --- box gestures ---

    pub fn pointer_down(&mut self, p: Point) -> bool {
        self.editor.pointer_down(p)
    }

    pub fn pointer_move(&mut self, p: Point) {
        let before = self.editor.bbox();
        self.editor.pointer_move(p);
        if self.editor.bbox() != before {
            self.relayout();
        }
    }

    pub fn pointer_up(&mut self) {
        self.editor.pointer_up();
    }

    // --- divider gestures ---

    pub fn begin_divider_drag(&mut self, axis: Axis, index: usize, client: f64) -> bool {
        self.dividers
            .as_mut()
            .is_some_and(|d| d.begin_drag(axis, index, client))
    }

    pub fn update_divider_drag(&mut self, client: f64) -> bool {
        self.dividers.as_mut().is_some_and(|d| d.update_drag(client))
    }

    pub fn end_divider_drag(&mut self) {
        if let Some(d) = self.dividers.as_mut() {
            d.end_drag();
        }
    }

    // --- label offset gestures ---

    /// Row labels drag horizontally, column labels vertically; `client` is
    /// the pointer coordinate along that direction.
    pub fn begin_label_drag(&mut self, axis: Axis, client: f64) -> bool {
        if self.editor.bbox().is_none() {
            return false;
        }
        let start_offset = match axis {
            Axis::Row => self.row_offset,
            Axis::Col => self.col_offset,
        };
        self.label_drag = Some(LabelDrag {
            axis,
            start_client: client,
            start_offset,
        });
        true
    }

    pub fn update_label_drag(&mut self, client: f64) {
        let Some(drag) = self.label_drag else {
            return;
        };
        let offset = (drag.start_offset - (client - drag.start_client))
            .round()
            .max(MIN_LABEL_OFFSET);
        match drag.axis {
            Axis::Row => self.row_offset = offset,
            Axis::Col => self.col_offset = offset,
        }
    }

    pub fn end_label_drag(&mut self) {
        self.label_drag = None;
    }

    /// Pointer left the surface: whatever gesture is running ends here.
    pub fn end_gestures(&mut self) {
        self.pointer_up();
        self.end_divider_drag();
        self.end_label_drag();
    }

    // --- player names ---

    pub fn set_player_name(&mut self, axis: Axis, index: usize, name: String) {
        let names = match axis {
            Axis::Row => &mut self.player_rows,
            Axis::Col => &mut self.player_cols,
        };
        if let Some(slot) = names.get_mut(index) {
            *slot = name;
        }
    }

    /// Adopts externally edited names, resized to the current shape.
    pub fn sync_player_names(&mut self, rows: &[String], cols: &[String]) {
        self.player_rows = fit_names(rows, self.rows);
        self.player_cols = fit_names(cols, self.cols);
    }

    pub fn populate_default_names(&mut self) {
        self.player_rows = fit_names(&[], self.rows);
        self.player_cols = fit_names(&[], self.cols);
    }

    pub fn clear_names(&mut self) {
        self.player_rows = vec![String::new(); self.rows];
        self.player_cols = vec![String::new(); self.cols];
    }

    // --- save ---

    pub fn cell_size(&self) -> (f64, f64) {
        self.editor.cell_size()
    }

    pub fn cell_too_small(&self) -> bool {
        self.editor.cell_too_small()
    }

    /// Builds the persisted grid. `image` is the displayed image rectangle
    /// relative to the designer container.
    pub fn build_grid(&self, image: &DisplayRect) -> Result<Grid> {
        let bbox = self.editor.bbox().ok_or(GridError::NoBoundingBox)?;
        let (cell_width, cell_height) = bbox.cell_size(self.rows, self.cols);
        if cell_width < MIN_CELL_PX || cell_height < MIN_CELL_PX {
            clog(&format!(
                "grid save rejected: cells {:.0}x{:.0}px",
                cell_width, cell_height
            ));
            return Err(GridError::CellTooSmall {
                cell_width,
                cell_height,
                min: MIN_CELL_PX,
            });
        }
        let nbox = geometry::normalize(&bbox, image).ok_or(GridError::MissingImage)?;
        let player_overlay = self
            .overlay_type
            .includes_players()
            .then(|| self.player_overlay(&bbox, nbox.design_extent()));
        let grid = Grid {
            bbox: nbox,
            rows: self.rows,
            cols: self.cols,
            numbering: self.numbering.spec(),
            values: self.numbering.values().clone(),
            overlay_type: self.overlay_type,
            player_overlay,
        };
        grid.validate()?;
        clog(&format!("grid saved: {}x{} {:?}", grid.rows, grid.cols, grid.overlay_type));
        Ok(grid)
    }

    fn player_overlay(&self, bbox: &BoundingBox, image_extent: Option<(f64, f64)>) -> PlayerOverlay {
        let (w, h) = image_extent.unwrap_or((bbox.width(), bbox.height()));
        let (row_centers_pct, col_centers_pct) = match &self.dividers {
            Some(d) => (Some(d.centers_pct(Axis::Row)), Some(d.centers_pct(Axis::Col))),
            None => (None, None),
        };
        let row_offset = if self.row_offset.is_finite() { self.row_offset } else { DEFAULT_ROW_OFFSET };
        let col_offset = if self.col_offset.is_finite() { self.col_offset } else { DEFAULT_COL_OFFSET };
        PlayerOverlay {
            rows: self.player_rows.iter().take(self.rows).cloned().collect(),
            cols: self.player_cols.iter().take(self.cols).cloned().collect(),
            row_offset,
            col_offset,
            row_offset_pct: Some(geometry::offset_fraction(row_offset, w)),
            col_offset_pct: Some(geometry::offset_fraction(col_offset, h)),
            row_centers_pct,
            col_centers_pct,
            show_rows: self.show_rows,
            show_cols: self.show_cols,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NumberingMode;

    fn defaults(rows: usize, cols: usize) -> GridDefaults {
        GridDefaults {
            rows,
            cols,
            order: NumberOrder::Row,
            overlay_type: OverlayType::Both,
            ..GridDefaults::default()
        }
    }

    fn drawn(rows: usize, cols: usize) -> Designer {
        let mut d = Designer::new(&defaults(rows, cols), 600.0, 400.0);
        d.pointer_down(Point::new(100.0, 100.0));
        d.pointer_move(Point::new(300.0, 300.0));
        d.pointer_up();
        d
    }

    #[test]
    fn save_without_box_is_rejected() {
        let d = Designer::new(&defaults(2, 2), 600.0, 400.0);
        let image = DisplayRect::new(0.0, 0.0, 600.0, 400.0);
        assert!(matches!(d.build_grid(&image), Err(GridError::NoBoundingBox)));
    }

    #[test]
    fn small_cells_block_save() {
        let d = drawn(20, 5);
        // 200px / 20 rows = 10px rows
        assert!(d.cell_too_small());
        let image = DisplayRect::new(0.0, 0.0, 600.0, 400.0);
        assert!(matches!(d.build_grid(&image), Err(GridError::CellTooSmall { .. })));
    }

    #[test]
    fn build_grid_normalizes_against_image() {
        let d = drawn(2, 2);
        let image = DisplayRect::new(100.0, 0.0, 400.0, 400.0);
        let g = d.build_grid(&image).unwrap();
        assert_eq!((g.bbox.x0p, g.bbox.y0p, g.bbox.x1p, g.bbox.y1p), (0.0, 0.25, 0.5, 0.75));
        assert_eq!(g.values, vec![vec![Some(1), Some(2)], vec![Some(3), Some(4)]]);
        assert_eq!(g.numbering.mode, NumberingMode::Sequential);
        assert_eq!(g.numbering.last, 4);
        let p = g.player_overlay.unwrap();
        assert_eq!(p.rows, vec!["Player 1", "Player 2"]);
        assert_eq!(p.row_centers_pct, Some(vec![0.25, 0.75]));
        // 110px against a 200px-wide box
        assert_eq!(p.row_offset_pct, Some(0.55));
        assert_eq!(p.col_offset_pct, Some(0.18));
    }

    #[test]
    fn dab_only_grid_has_no_player_overlay() {
        let mut d = drawn(2, 2);
        d.overlay_type = OverlayType::Dab;
        let g = d.build_grid(&DisplayRect::new(0.0, 0.0, 600.0, 400.0)).unwrap();
        assert!(g.player_overlay.is_none());
    }

    #[test]
    fn non_uniform_dividers_are_saved_as_centers() {
        let mut d = drawn(2, 2);
        assert!(d.begin_divider_drag(Axis::Col, 1, 0.0));
        assert!(d.update_divider_drag(-40.0));
        d.end_divider_drag();
        let g = d.build_grid(&DisplayRect::new(0.0, 0.0, 600.0, 400.0)).unwrap();
        assert_eq!(g.player_overlay.unwrap().col_centers_pct, Some(vec![0.15, 0.65]));
    }

    #[test]
    fn shape_change_resets_dividers_and_names() {
        let mut d = drawn(2, 2);
        d.set_player_name(Axis::Row, 0, "Ann".into());
        d.set_shape(4, 3);
        assert_eq!(d.dividers().unwrap().row_pos().len(), 5);
        assert_eq!(d.player_names(Axis::Row), &["Ann", "Player 2", "Player 3", "Player 4"]);
        assert_eq!(d.numbering().values().len(), 4);
        d.clear_names();
        assert!(d.player_names(Axis::Col).iter().all(String::is_empty));
        d.populate_default_names();
        assert_eq!(d.player_names(Axis::Col)[2], "Player 3");
    }

    #[test]
    fn label_offsets_drag_with_floor() {
        let mut d = drawn(2, 2);
        assert!(d.begin_label_drag(Axis::Row, 50.0));
        d.update_label_drag(20.0);
        assert_eq!(d.row_offset, 140.0);
        d.update_label_drag(500.0);
        assert_eq!(d.row_offset, MIN_LABEL_OFFSET);
        d.end_label_drag();
        d.update_label_drag(0.0);
        assert_eq!(d.row_offset, MIN_LABEL_OFFSET);
    }

    #[test]
    fn leaving_the_surface_ends_a_resize() {
        let mut d = drawn(2, 2);
        assert!(d.pointer_down(Point::new(300.0, 300.0)));
        d.pointer_move(Point::new(350.0, 320.0));
        assert!(d.editor().is_dragging());
        let resized = d.editor().bbox();
        d.end_gestures();
        assert!(!d.editor().is_dragging());
        d.pointer_move(Point::new(500.0, 390.0));
        assert_eq!(d.editor().bbox(), resized);
    }

    #[test]
    fn leaving_the_surface_ends_divider_and_label_drags() {
        let mut d = drawn(2, 2);
        assert!(d.begin_divider_drag(Axis::Row, 1, 0.0));
        assert!(d.begin_label_drag(Axis::Col, 0.0));
        d.end_gestures();
        assert!(!d.update_divider_drag(30.0));
        assert!(d.dividers().unwrap().dragging().is_none());
        let offset = d.col_offset;
        d.update_label_drag(-50.0);
        assert_eq!(d.col_offset, offset);
    }

    #[test]
    fn reopening_a_grid_replays_the_box() {
        let d = drawn(2, 2);
        let image = DisplayRect::new(0.0, 0.0, 400.0, 400.0);
        let g = d.build_grid(&image).unwrap();
        // the designer opens at twice the size
        let bigger = DisplayRect::new(0.0, 0.0, 800.0, 800.0);
        let again = Designer::from_grid(&g, &GridDefaults::default(), &bigger, 800.0, 800.0);
        assert_eq!(
            again.editor().bbox(),
            Some(BoundingBox { x0: 200.0, y0: 200.0, x1: 600.0, y1: 600.0 })
        );
        assert_eq!(again.numbering().values(), &g.values);
        assert_eq!(again.player_names(Axis::Row), &["Player 1", "Player 2"]);
    }
}
