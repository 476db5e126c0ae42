// Row/column divider positions inside the bounding box, with per-divider drags.
use crate::geometry::MIN_CELL_PX;
use crate::model::Axis;
use crate::util::clamp;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DividerDrag {
    pub axis: Axis,
    pub index: usize,
    pub start_client: f64,
    pub start_pos: f64,
}

/// `row_pos` has `rows + 1` offsets within the box height, `col_pos` has
/// `cols + 1` within the width. Offsets are whole pixels.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DividerLayout {
    row_pos: Vec<f64>,
    col_pos: Vec<f64>,
    width: f64,
    height: f64,
    drag: Option<DividerDrag>,
}

fn uniform(size: f64, n: usize) -> Vec<f64> {
    (0..=n).map(|i| (i as f64 * size / n as f64).round()).collect()
}

impl DividerLayout {
    pub fn uniform(width: f64, height: f64, rows: usize, cols: usize) -> Self {
        Self {
            row_pos: uniform(height, rows.max(1)),
            col_pos: uniform(width, cols.max(1)),
            width,
            height,
            drag: None,
        }
    }

    pub fn row_pos(&self) -> &[f64] {
        &self.row_pos
    }

    pub fn col_pos(&self) -> &[f64] {
        &self.col_pos
    }

    pub fn positions(&self, axis: Axis) -> &[f64] {
        match axis {
            Axis::Row => &self.row_pos,
            Axis::Col => &self.col_pos,
        }
    }

    fn extent(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Row => self.height,
            Axis::Col => self.width,
        }
    }

    /// Band `i` of `axis` as `(start, len)`.
    pub fn band(&self, axis: Axis, i: usize) -> Option<(f64, f64)> {
        let pos = self.positions(axis);
        let a = *pos.get(i)?;
        let b = *pos.get(i + 1)?;
        Some((a, (b - a).max(0.0)))
    }

    /// Moves internal divider `index` to `requested`. Positions that would
    /// leave a neighbouring band under the minimum are rejected outright.
    pub fn move_divider(&mut self, axis: Axis, index: usize, requested: f64) -> bool {
        let extent = self.extent(axis);
        let pos = match axis {
            Axis::Row => &mut self.row_pos,
            Axis::Col => &mut self.col_pos,
        };
        if index == 0 || index + 1 >= pos.len() {
            return false;
        }
        let v = clamp(requested, 0.0, extent);
        if v - pos[index - 1] < MIN_CELL_PX || pos[index + 1] - v < MIN_CELL_PX {
            return false;
        }
        pos[index] = v.round();
        true
    }

    /// Starts dragging divider `index`; `client` is the pointer coordinate
    /// along the axis (y for rows, x for columns).
    pub fn begin_drag(&mut self, axis: Axis, index: usize, client: f64) -> bool {
        let Some(&start_pos) = self.positions(axis).get(index) else {
            return false;
        };
        if index == 0 || index + 1 >= self.positions(axis).len() {
            return false;
        }
        self.drag = Some(DividerDrag {
            axis,
            index,
            start_client: client,
            start_pos,
        });
        true
    }

    pub fn update_drag(&mut self, client: f64) -> bool {
        let Some(d) = self.drag else {
            return false;
        };
        self.move_divider(d.axis, d.index, d.start_pos + (client - d.start_client))
    }

    pub fn end_drag(&mut self) {
        self.drag = None;
    }

    pub fn dragging(&self) -> Option<DividerDrag> {
        self.drag
    }

    /// Band centers as fractions of the box size, whatever the band widths.
    pub fn centers_pct(&self, axis: Axis) -> Vec<f64> {
        let size = self.extent(axis);
        self.positions(axis)
            .windows(2)
            .map(|w| if size > 0.0 { (w[0] + w[1]) / 2.0 / size } else { 0.0 })
            .collect()
    }

    /// Strictly increasing with every band at least the minimum size.
    pub fn is_valid(&self) -> bool {
        [&self.row_pos, &self.col_pos]
            .iter()
            .all(|pos| pos.windows(2).all(|w| w[1] - w[0] >= MIN_CELL_PX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn uniform_split() {
        let l = DividerLayout::uniform(100.0, 60.0, 3, 4);
        assert_eq!(l.row_pos(), &[0.0, 20.0, 40.0, 60.0]);
        assert_eq!(l.col_pos(), &[0.0, 25.0, 50.0, 75.0, 100.0]);
        assert!(l.is_valid());
    }

    #[test]
    fn violating_drag_is_a_no_op() {
        let mut l = DividerLayout::uniform(100.0, 60.0, 3, 4);
        assert!(!l.move_divider(Axis::Row, 1, 10.0));
        assert_eq!(l.row_pos()[1], 20.0);
        assert!(!l.move_divider(Axis::Row, 1, 23.0));
        assert_eq!(l.row_pos()[1], 20.0);
        assert!(l.move_divider(Axis::Row, 1, 19.6));
        assert_eq!(l.row_pos()[1], 20.0);
        assert!(l.move_divider(Axis::Col, 2, 56.6));
        assert_eq!(l.col_pos()[2], 57.0);
        // outer lines never move
        assert!(!l.move_divider(Axis::Col, 0, 5.0));
        assert!(!l.move_divider(Axis::Col, 4, 95.0));
    }

    #[test]
    fn drag_gesture_is_relative_to_start() {
        let mut l = DividerLayout::uniform(200.0, 100.0, 2, 4);
        assert!(l.begin_drag(Axis::Col, 1, 500.0));
        assert!(l.update_drag(510.0));
        assert_eq!(l.col_pos()[1], 60.0);
        // too far: stays where the last good frame left it
        assert!(!l.update_drag(560.0));
        assert_eq!(l.col_pos()[1], 60.0);
        l.end_drag();
        assert!(!l.update_drag(505.0));
        assert!(!l.begin_drag(Axis::Row, 0, 0.0));
    }

    #[test]
    fn centers_follow_non_uniform_bands() {
        let mut l = DividerLayout::uniform(100.0, 100.0, 2, 2);
        assert_eq!(l.centers_pct(Axis::Row), vec![0.25, 0.75]);
        assert!(l.move_divider(Axis::Row, 1, 30.0));
        assert_eq!(l.centers_pct(Axis::Row), vec![0.15, 0.65]);
        assert_eq!(l.band(Axis::Row, 1), Some((30.0, 70.0)));
    }

    proptest! {
        #[test]
        fn drags_keep_dividers_monotonic(
            rows in 1usize..8,
            cols in 1usize..8,
            ops in prop::collection::vec((any::<bool>(), 0usize..9, -50.0f64..600.0), 0..60),
        ) {
            let mut l = DividerLayout::uniform(cols as f64 * 40.0, rows as f64 * 40.0, rows, cols);
            prop_assert!(l.is_valid());
            for (is_row, idx, pos) in ops {
                let axis = if is_row { Axis::Row } else { Axis::Col };
                l.move_divider(axis, idx, pos);
                prop_assert!(l.is_valid());
            }
        }
    }
}
