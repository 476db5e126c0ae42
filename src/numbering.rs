//! Value matrix generation for a designed grid.

use crate::model::{NumberOrder, NumberingMode, NumberingSpec};

pub type Values = Vec<Vec<Option<i64>>>;

/// Bound on the first number; keeps every generated value far from overflow.
pub const FIRST_LIMIT: i64 = 1_000_000_000_000;

pub fn clamp_first(first: i64) -> i64 {
    first.clamp(-FIRST_LIMIT, FIRST_LIMIT)
}

/// `first..first+rows*cols` laid out column-major or row-major.
pub fn generate(rows: usize, cols: usize, order: NumberOrder, first: i64) -> Values {
    let mut mat = vec![vec![None; cols]; rows];
    let mut value = first;
    match order {
        NumberOrder::Column => {
            for c in 0..cols {
                for row in mat.iter_mut() {
                    row[c] = Some(value);
                    value = value.saturating_add(1);
                }
            }
        }
        NumberOrder::Row => {
            for row in mat.iter_mut() {
                for cell in row.iter_mut() {
                    *cell = Some(value);
                    value = value.saturating_add(1);
                }
            }
        }
    }
    mat
}

/// Designer-side numbering state. Sequential values follow every parameter
/// change; manual values are only touched by explicit cell edits.
#[derive(Clone, Debug, PartialEq)]
pub struct Numbering {
    rows: usize,
    cols: usize,
    mode: NumberingMode,
    order: NumberOrder,
    first: i64,
    values: Values,
}

impl Numbering {
    pub fn new(rows: usize, cols: usize, order: NumberOrder, first: i64, manual: bool) -> Self {
        let mode = if manual {
            NumberingMode::Manual
        } else {
            NumberingMode::Sequential
        };
        let mut n = Self {
            rows,
            cols,
            mode,
            order,
            first: clamp_first(first),
            values: Vec::new(),
        };
        n.refresh();
        n
    }

    /// Resume from saved values; falls back to regeneration when the saved
    /// matrix does not fit `rows x cols`.
    pub fn with_values(rows: usize, cols: usize, spec: &NumberingSpec, values: Values) -> Self {
        let mut n = Self::new(rows, cols, spec.order, spec.first, spec.mode == NumberingMode::Manual);
        if values.len() == rows && values.iter().all(|r| r.len() == cols) {
            n.values = values;
        }
        n
    }

    fn refresh(&mut self) {
        self.values = match self.mode {
            NumberingMode::Sequential => generate(self.rows, self.cols, self.order, self.first),
            NumberingMode::Manual => vec![vec![None; self.cols]; self.rows],
        };
    }

    /// Changing the shape always rebuilds the matrix, in manual mode as a
    /// blank one, so values never go stale.
    pub fn set_shape(&mut self, rows: usize, cols: usize) {
        if (rows, cols) == (self.rows, self.cols) {
            return;
        }
        self.rows = rows;
        self.cols = cols;
        self.refresh();
    }

    pub fn set_order(&mut self, order: NumberOrder) {
        self.order = order;
        if self.mode == NumberingMode::Sequential {
            self.refresh();
        }
    }

    /// Out-of-range values are clamped to `±FIRST_LIMIT`.
    pub fn set_first(&mut self, first: i64) {
        self.first = clamp_first(first);
        if self.mode == NumberingMode::Sequential {
            self.refresh();
        }
    }

    /// Entering manual mode blanks the matrix; leaving it regenerates.
    pub fn set_manual(&mut self, manual: bool) {
        let mode = if manual {
            NumberingMode::Manual
        } else {
            NumberingMode::Sequential
        };
        if mode != self.mode {
            self.mode = mode;
            self.refresh();
        }
    }

    /// Manual cell entry. Ignored in sequential mode.
    pub fn set_cell(&mut self, r: usize, c: usize, value: Option<i64>) {
        if self.mode != NumberingMode::Manual {
            return;
        }
        if let Some(cell) = self.values.get_mut(r).and_then(|row| row.get_mut(c)) {
            *cell = value;
        }
    }

    /// Restores defaults in sequential mode ("Reset Defaults" in the designer).
    pub fn reset(&mut self, rows: usize, cols: usize, order: NumberOrder) {
        self.rows = rows;
        self.cols = cols;
        self.order = order;
        self.mode = NumberingMode::Sequential;
        self.refresh();
    }

    pub fn is_manual(&self) -> bool {
        self.mode == NumberingMode::Manual
    }

    pub fn order(&self) -> NumberOrder {
        self.order
    }

    pub fn first(&self) -> i64 {
        self.first
    }

    /// Derived in sequential mode.
    pub fn last(&self) -> i64 {
        let cells = i64::try_from(self.rows * self.cols).unwrap_or(i64::MAX);
        self.first.saturating_add(cells).saturating_sub(1)
    }

    pub fn values(&self) -> &Values {
        &self.values
    }

    pub fn spec(&self) -> NumberingSpec {
        NumberingSpec {
            mode: self.mode,
            order: self.order,
            first: self.first,
            last: self.last(),
        }
    }
}
