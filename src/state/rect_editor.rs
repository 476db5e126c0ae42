// Bounding-box editor: draw, move and resize a box over the designer surface.
use crate::geometry::{BoundingBox, DisplayRect, Point, CORNER_TOL, MIN_CELL_PX};
use crate::util::clamp;

/// Which box edges a pointer is near. A corner sets two flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Edges {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

impl Edges {
    pub fn any(&self) -> bool {
        self.left || self.right || self.top || self.bottom
    }

    pub fn cursor(&self) -> &'static str {
        if self.left || self.right {
            "ew-resize"
        } else if self.top || self.bottom {
            "ns-resize"
        } else {
            ""
        }
    }

    fn near(b: &BoundingBox, p: Point) -> Edges {
        let in_x = p.x >= b.x0 - CORNER_TOL && p.x <= b.x1 + CORNER_TOL;
        let in_y = p.y >= b.y0 - CORNER_TOL && p.y <= b.y1 + CORNER_TOL;
        Edges {
            left: in_y && (p.x - b.x0).abs() <= CORNER_TOL,
            right: in_y && (p.x - b.x1).abs() <= CORNER_TOL,
            top: in_x && (p.y - b.y0).abs() <= CORNER_TOL,
            bottom: in_x && (p.y - b.y1).abs() <= CORNER_TOL,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EditorMode {
    /// No box yet.
    Idle,
    Drawing { anchor: Point },
    /// A box exists and nothing is being dragged.
    Defined,
    Resizing { edges: Edges, grab: Point, start: BoundingBox },
    Moving { grab: Point, start: BoundingBox },
}

#[derive(Clone, Debug, PartialEq)]
pub struct RectEditor {
    bbox: Option<BoundingBox>,
    mode: EditorMode,
    hover: Edges,
    container_w: f64,
    container_h: f64,
    rows: usize,
    cols: usize,
}

impl RectEditor {
    pub fn new(container_w: f64, container_h: f64, rows: usize, cols: usize) -> Self {
        Self {
            bbox: None,
            mode: EditorMode::Idle,
            hover: Edges::default(),
            container_w,
            container_h,
            rows,
            cols,
        }
    }

    pub fn with_bbox(mut self, bbox: Option<BoundingBox>) -> Self {
        self.bbox = bbox.filter(BoundingBox::is_valid);
        self.mode = if self.bbox.is_some() {
            EditorMode::Defined
        } else {
            EditorMode::Idle
        };
        self
    }

    pub fn bbox(&self) -> Option<BoundingBox> {
        self.bbox
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn hover(&self) -> Edges {
        self.hover
    }

    pub fn is_dragging(&self) -> bool {
        !matches!(self.mode, EditorMode::Idle | EditorMode::Defined)
    }

    pub fn set_container(&mut self, width: f64, height: f64) {
        self.container_w = width;
        self.container_h = height;
    }

    pub fn set_shape(&mut self, rows: usize, cols: usize) {
        self.rows = rows;
        self.cols = cols;
    }

    /// Replace the box with `rect` (container-relative), e.g. "snap to image".
    pub fn snap_to(&mut self, rect: &DisplayRect) {
        let a = self.clamp_point(Point::new(rect.left, rect.top));
        let b = self.clamp_point(Point::new(rect.right(), rect.bottom()));
        if let Some(bbox) = BoundingBox::from_corners(a, b) {
            self.bbox = Some(bbox);
            if !self.is_dragging() {
                self.mode = EditorMode::Defined;
            }
        }
    }

    fn clamp_point(&self, p: Point) -> Point {
        Point::new(clamp(p.x, 0.0, self.container_w), clamp(p.y, 0.0, self.container_h))
    }

    /// Pointer-down. Returns true when a drag gesture began.
    pub fn pointer_down(&mut self, p: Point) -> bool {
        let Some(b) = self.bbox else {
            self.mode = EditorMode::Drawing { anchor: self.clamp_point(p) };
            return true;
        };
        let edges = Edges::near(&b, p);
        self.mode = if edges.any() {
            EditorMode::Resizing { edges, grab: p, start: b }
        } else if b.contains(p) {
            EditorMode::Moving { grab: p, start: b }
        } else {
            // Redraw anchored at the corner opposite the click.
            let ax = if p.x < b.x0 {
                b.x1
            } else if p.x > b.x1 {
                b.x0
            } else if (p.x - b.x0).abs() > (p.x - b.x1).abs() {
                b.x0
            } else {
                b.x1
            };
            let ay = if p.y < b.y0 {
                b.y1
            } else if p.y > b.y1 {
                b.y0
            } else if (p.y - b.y0).abs() > (p.y - b.y1).abs() {
                b.y0
            } else {
                b.y1
            };
            EditorMode::Drawing { anchor: Point::new(ax, ay) }
        };
        true
    }

    /// Pointer-move. While dragging this updates the box; otherwise only the
    /// hover indicator changes.
    pub fn pointer_move(&mut self, p: Point) {
        let next = match self.mode {
            EditorMode::Idle => None,
            EditorMode::Defined => {
                self.hover = self.bbox.map(|b| Edges::near(&b, p)).unwrap_or_default();
                None
            }
            EditorMode::Drawing { anchor } => BoundingBox::from_corners(anchor, self.clamp_point(p)),
            EditorMode::Resizing { edges, grab, start } => Some(self.resized(start, edges, p.x - grab.x, p.y - grab.y)),
            EditorMode::Moving { grab, start } => Some(self.moved(start, p.x - grab.x, p.y - grab.y)),
        };
        if let Some(b) = next.filter(BoundingBox::is_valid) {
            self.bbox = Some(b);
        }
    }

    fn resized(&self, s: BoundingBox, edges: Edges, dx: f64, dy: f64) -> BoundingBox {
        let min_w = MIN_CELL_PX * self.cols as f64;
        let min_h = MIN_CELL_PX * self.rows as f64;
        let mut n = s;
        if edges.left {
            n.x0 = clamp(s.x0 + dx, 0.0, s.x1 - min_w);
        }
        if edges.right {
            n.x1 = clamp(s.x1 + dx, n.x0 + min_w, self.container_w);
        }
        if edges.top {
            n.y0 = clamp(s.y0 + dy, 0.0, s.y1 - min_h);
        }
        if edges.bottom {
            n.y1 = clamp(s.y1 + dy, n.y0 + min_h, self.container_h);
        }
        n
    }

    fn moved(&self, s: BoundingBox, dx: f64, dy: f64) -> BoundingBox {
        let w = s.width();
        let h = s.height();
        let x0 = clamp(s.x0 + dx, 0.0, (self.container_w - w).max(0.0));
        let y0 = clamp(s.y0 + dy, 0.0, (self.container_h - h).max(0.0));
        BoundingBox { x0, y0, x1: x0 + w, y1: y0 + h }
    }

    /// Pointer-up or pointer-leave: commit and drop transient drag state.
    pub fn pointer_up(&mut self) {
        self.hover = Edges::default();
        self.mode = if self.bbox.is_some() {
            EditorMode::Defined
        } else {
            EditorMode::Idle
        };
    }

    /// Uniform cell size for the current shape, or zero without a box.
    pub fn cell_size(&self) -> (f64, f64) {
        self.bbox
            .map(|b| b.cell_size(self.rows, self.cols))
            .unwrap_or((0.0, 0.0))
    }

    pub fn cell_too_small(&self) -> bool {
        let (w, h) = self.cell_size();
        w < MIN_CELL_PX || h < MIN_CELL_PX
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editor_with_box() -> RectEditor {
        RectEditor::new(500.0, 400.0, 2, 2).with_bbox(Some(BoundingBox {
            x0: 100.0,
            y0: 100.0,
            x1: 300.0,
            y1: 250.0,
        }))
    }

    #[test]
    fn draw_from_nothing() {
        let mut ed = RectEditor::new(500.0, 400.0, 2, 2);
        assert!(ed.pointer_down(Point::new(50.0, 60.0)));
        assert!(matches!(ed.mode(), EditorMode::Drawing { .. }));
        ed.pointer_move(Point::new(50.0, 60.0));
        assert_eq!(ed.bbox(), None);
        ed.pointer_move(Point::new(10.0, 900.0));
        assert_eq!(ed.bbox(), Some(BoundingBox { x0: 10.0, y0: 60.0, x1: 50.0, y1: 400.0 }));
        ed.pointer_up();
        assert_eq!(ed.mode(), EditorMode::Defined);
    }

    #[test]
    fn click_without_drag_stays_idle() {
        let mut ed = RectEditor::new(500.0, 400.0, 2, 2);
        ed.pointer_down(Point::new(5.0, 5.0));
        ed.pointer_up();
        assert_eq!(ed.mode(), EditorMode::Idle);
        assert_eq!(ed.bbox(), None);
    }

    #[test]
    fn corner_activates_two_edges() {
        let mut ed = editor_with_box();
        ed.pointer_down(Point::new(305.0, 245.0));
        match ed.mode() {
            EditorMode::Resizing { edges, .. } => {
                assert!(edges.right && edges.bottom && !edges.left && !edges.top)
            }
            other => panic!("unexpected mode {:?}", other),
        }
        ed.pointer_move(Point::new(345.0, 265.0));
        assert_eq!(ed.bbox(), Some(BoundingBox { x0: 100.0, y0: 100.0, x1: 340.0, y1: 270.0 }));
    }

    #[test]
    fn resize_respects_minimum_cells() {
        let mut ed = editor_with_box();
        ed.pointer_down(Point::new(300.0, 180.0));
        // drag the right edge far past the left one
        ed.pointer_move(Point::new(-200.0, 180.0));
        let b = ed.bbox().unwrap();
        assert_eq!(b.x0, 100.0);
        assert_eq!(b.x1, 100.0 + 2.0 * MIN_CELL_PX);
        ed.pointer_move(Point::new(2000.0, 180.0));
        assert_eq!(ed.bbox().unwrap().x1, 500.0);
    }

    #[test]
    fn move_stays_inside_container() {
        let mut ed = editor_with_box();
        ed.pointer_down(Point::new(200.0, 175.0));
        assert!(matches!(ed.mode(), EditorMode::Moving { .. }));
        ed.pointer_move(Point::new(1000.0, -1000.0));
        assert_eq!(ed.bbox(), Some(BoundingBox { x0: 300.0, y0: 0.0, x1: 500.0, y1: 150.0 }));
        ed.pointer_up();
        assert!(!ed.is_dragging());
    }

    #[test]
    fn outside_click_redraws_from_opposite_corner() {
        let mut ed = editor_with_box();
        // below-right of the box: anchor top-left corner
        ed.pointer_down(Point::new(400.0, 350.0));
        assert_eq!(ed.mode(), EditorMode::Drawing { anchor: Point::new(100.0, 100.0) });
        // left of the box, vertically inside and nearer the bottom: anchor right/top
        let mut ed = editor_with_box();
        ed.pointer_down(Point::new(20.0, 220.0));
        assert_eq!(ed.mode(), EditorMode::Drawing { anchor: Point::new(300.0, 100.0) });
        // the old box stays until the pointer moves
        assert!(ed.bbox().is_some());
    }

    #[test]
    fn hover_updates_indicator_without_touching_box() {
        let mut ed = editor_with_box();
        let before = ed.bbox();
        ed.pointer_move(Point::new(102.0, 180.0));
        assert!(ed.hover().left);
        assert_eq!(ed.hover().cursor(), "ew-resize");
        ed.pointer_move(Point::new(200.0, 98.0));
        assert_eq!(ed.hover().cursor(), "ns-resize");
        ed.pointer_move(Point::new(200.0, 180.0));
        assert!(!ed.hover().any());
        assert_eq!(ed.bbox(), before);
    }

    #[test]
    fn snap_and_cell_metrics() {
        let mut ed = RectEditor::new(400.0, 300.0, 20, 5);
        assert!(ed.cell_too_small());
        ed.snap_to(&DisplayRect::new(0.0, 0.0, 400.0, 400.0));
        assert_eq!(ed.bbox(), Some(BoundingBox { x0: 0.0, y0: 0.0, x1: 400.0, y1: 300.0 }));
        assert_eq!(ed.cell_size(), (80.0, 15.0));
        assert!(ed.cell_too_small());
        ed.set_shape(10, 5);
        assert!(!ed.cell_too_small());
    }
}
