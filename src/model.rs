//! Persisted records for the bingo overlay.
//! Every type here is plain data (numbers, strings, booleans, nested vectors)
//! so it round-trips through JSON unchanged.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};
use crate::geometry::NormalizedBoundingBox;

/// Longest player name copied into the global player lists.
pub const PLAYER_NAME_MAX: usize = 16;
pub const DEFAULT_MAX_BALL: u32 = 75;
pub const DEFAULT_ROW_OFFSET: f64 = 110.0;
pub const DEFAULT_COL_OFFSET: f64 = 36.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Row,
    Col,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlayType {
    #[default]
    Dab,
    Player,
    Both,
}

impl OverlayType {
    pub fn includes_dab(self) -> bool {
        matches!(self, OverlayType::Dab | OverlayType::Both)
    }

    pub fn includes_players(self) -> bool {
        matches!(self, OverlayType::Player | OverlayType::Both)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumberingMode {
    #[default]
    Sequential,
    Manual,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumberOrder {
    /// Fill each column top to bottom, then move right.
    #[default]
    Column,
    /// Fill each row left to right, then move down.
    Row,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberingSpec {
    pub mode: NumberingMode,
    #[serde(default)]
    pub order: NumberOrder,
    #[serde(default = "one")]
    pub first: i64,
    #[serde(default)]
    pub last: i64,
}

fn one() -> i64 {
    1
}

/// Row/column player labels attached to a grid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerOverlay {
    pub rows: Vec<String>,
    pub cols: Vec<String>,
    /// Design-time pixel offsets; used only when the fractions are missing.
    pub row_offset: f64,
    pub col_offset: f64,
    /// Row label offset as a fraction of box width.
    #[serde(default)]
    pub row_offset_pct: Option<f64>,
    /// Column label offset as a fraction of box height.
    #[serde(default)]
    pub col_offset_pct: Option<f64>,
    #[serde(default)]
    pub row_centers_pct: Option<Vec<f64>>,
    #[serde(default)]
    pub col_centers_pct: Option<Vec<f64>>,
    pub show_rows: bool,
    pub show_cols: bool,
}

impl PlayerOverlay {
    pub fn name(&self, axis: Axis, index: usize) -> Option<&str> {
        let names = match axis {
            Axis::Row => &self.rows,
            Axis::Col => &self.cols,
        };
        names.get(index).map(String::as_str)
    }
}

/// The persisted grid definition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grid {
    pub bbox: NormalizedBoundingBox,
    pub rows: usize,
    pub cols: usize,
    pub numbering: NumberingSpec,
    /// `rows x cols`; `None` for cells still awaiting manual entry.
    pub values: Vec<Vec<Option<i64>>>,
    pub overlay_type: OverlayType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_overlay: Option<PlayerOverlay>,
}

impl Grid {
    /// Checks the `values` matrix matches `rows x cols`.
    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(GridError::InvalidDimensions {
                rows: self.rows,
                cols: self.cols,
            });
        }
        let rows = self.values.len();
        let cols = self.values.first().map_or(0, Vec::len);
        if rows != self.rows || self.values.iter().any(|r| r.len() != self.cols) {
            return Err(GridError::ValuesShape {
                expected_rows: self.rows,
                expected_cols: self.cols,
                rows,
                cols,
            });
        }
        Ok(())
    }

    /// Number of distinct numbered cells.
    pub fn numbered_cell_count(&self) -> usize {
        self.values
            .iter()
            .flatten()
            .flatten()
            .collect::<HashSet<_>>()
            .len()
    }

    pub fn player_name(&self, axis: Axis, index: usize) -> Option<String> {
        self.player_overlay
            .as_ref()
            .and_then(|p| p.name(axis, index))
            .map(str::to_owned)
    }
}

/// A card cell: numbers from extraction/generation, free text from manual edits.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(i64),
    Text(String),
}

impl CellValue {
    /// Parses user input: empty is no value, integers become numbers.
    pub fn parse(input: &str) -> Option<CellValue> {
        let t = input.trim();
        if t.is_empty() {
            return None;
        }
        Some(match t.parse::<i64>() {
            Ok(n) => CellValue::Number(n),
            Err(_) => CellValue::Text(input.to_owned()),
        })
    }

    /// Compares by printed form, so `Number(7)` matches `Text("7")`.
    pub fn matches_call(&self, number: u32) -> bool {
        self.to_string() == number.to_string()
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

/// The active card matrix. Rows may be ragged only transiently; constructors pad.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Card(pub Vec<Vec<Option<CellValue>>>);

impl Card {
    pub fn empty(rows: usize, cols: usize) -> Self {
        Card(vec![vec![None; cols]; rows])
    }

    /// Card from rows of numbers, padding short rows with empty cells.
    pub fn from_number_rows(rows: Vec<Vec<i64>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        Card(
            rows.into_iter()
                .map(|r| {
                    let mut out: Vec<Option<CellValue>> =
                        r.into_iter().map(|n| Some(CellValue::Number(n))).collect();
                    out.resize(width, None);
                    out
                })
                .collect(),
        )
    }

    pub fn from_grid_values(values: &[Vec<Option<i64>>]) -> Self {
        Card(
            values
                .iter()
                .map(|r| r.iter().map(|v| v.map(CellValue::Number)).collect())
                .collect(),
        )
    }

    pub fn rows(&self) -> usize {
        self.0.len()
    }

    pub fn cols(&self) -> usize {
        self.0.first().map_or(0, Vec::len)
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows(), self.cols())
    }

    pub fn get(&self, r: usize, c: usize) -> Option<&CellValue> {
        self.0.get(r)?.get(c)?.as_ref()
    }

    pub fn set(&mut self, r: usize, c: usize, value: Option<CellValue>) -> bool {
        match self.0.get_mut(r).and_then(|row| row.get_mut(c)) {
            Some(cell) => {
                *cell = value;
                true
            }
            None => false,
        }
    }
}

impl Default for Card {
    fn default() -> Self {
        Card::empty(5, 5)
    }
}

/// Per-cell marks. Only exists while the active grid has a dab layer;
/// "no dab layer" is `Option::<DabMatrix>::None`, never an empty matrix.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DabMatrix(Vec<Vec<bool>>);

impl DabMatrix {
    pub fn new(rows: usize, cols: usize) -> Self {
        DabMatrix(vec![vec![false; cols]; rows])
    }

    pub fn for_card(card: &Card) -> Self {
        let (rows, cols) = card.shape();
        Self::new(rows, cols)
    }

    pub fn rows(&self) -> usize {
        self.0.len()
    }

    pub fn cols(&self) -> usize {
        self.0.first().map_or(0, Vec::len)
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows(), self.cols())
    }

    /// True when the matrix is rectangular and `rows x cols`.
    pub fn has_shape(&self, rows: usize, cols: usize) -> bool {
        self.0.len() == rows && self.0.iter().all(|r| r.len() == cols)
    }

    pub fn get(&self, r: usize, c: usize) -> bool {
        self.0.get(r).and_then(|row| row.get(c)).copied().unwrap_or(false)
    }

    pub fn set(&mut self, r: usize, c: usize, value: bool) {
        if let Some(cell) = self.0.get_mut(r).and_then(|row| row.get_mut(c)) {
            *cell = value;
        }
    }

    pub fn line_full(&self, axis: Axis, index: usize) -> bool {
        match axis {
            Axis::Row => self
                .0
                .get(index)
                .is_some_and(|row| !row.is_empty() && row.iter().all(|&d| d)),
            Axis::Col => {
                !self.0.is_empty()
                    && self
                        .0
                        .iter()
                        .all(|row| row.get(index).copied().unwrap_or(false))
            }
        }
    }

    pub fn set_line(&mut self, axis: Axis, index: usize, value: bool) {
        match axis {
            Axis::Row => {
                if let Some(row) = self.0.get_mut(index) {
                    row.iter_mut().for_each(|d| *d = value);
                }
            }
            Axis::Col => {
                for row in &mut self.0 {
                    if let Some(d) = row.get_mut(index) {
                        *d = value;
                    }
                }
            }
        }
    }

    pub fn clear(&mut self) {
        self.0.iter_mut().flatten().for_each(|d| *d = false);
    }

    pub fn marked_count(&self) -> usize {
        self.0.iter().flatten().filter(|&&d| d).count()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinnerResult {
    pub axis: Axis,
    pub index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player: Option<String>,
}

impl WinnerResult {
    pub fn message(&self) -> String {
        match (&self.player, self.axis) {
            (Some(p), _) if !p.is_empty() => format!("{} has bingo!", p),
            (_, Axis::Col) => format!("Column {} has bingo!", self.index + 1),
            (_, Axis::Row) => format!("Row {} has bingo!", self.index + 1),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub max_ball: u32,
    pub auto_mode: bool,
    pub sound_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_ball: DEFAULT_MAX_BALL,
            auto_mode: true,
            sound_enabled: true,
        }
    }
}

/// Designer defaults applied when no grid exists yet.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridDefaults {
    pub rows: usize,
    pub cols: usize,
    pub order: NumberOrder,
    pub scrambled: bool,
    pub first_num: i64,
    pub overlay_type: OverlayType,
    pub player_row_offset: f64,
    pub player_col_offset: f64,
    pub show_player_rows: bool,
    pub show_player_cols: bool,
}

impl Default for GridDefaults {
    fn default() -> Self {
        Self {
            rows: 20,
            cols: 5,
            order: NumberOrder::Column,
            scrambled: false,
            first_num: 1,
            overlay_type: OverlayType::Both,
            player_row_offset: DEFAULT_ROW_OFFSET,
            player_col_offset: DEFAULT_COL_OFFSET,
            show_player_rows: true,
            show_player_cols: false,
        }
    }
}

/// `names` resized to `len`, padding with "Player N".
pub fn fit_names(names: &[String], len: usize) -> Vec<String> {
    let mut out: Vec<String> = names.iter().take(len).cloned().collect();
    while out.len() < len {
        out.push(format!("Player {}", out.len() + 1));
    }
    out
}

pub fn truncate_name(name: &str) -> String {
    name.chars().take(PLAYER_NAME_MAX).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_values_compare_by_printed_form() {
        assert!(CellValue::Number(7).matches_call(7));
        assert!(CellValue::Text("7".into()).matches_call(7));
        assert!(!CellValue::Text("07".into()).matches_call(7));
        assert_eq!(CellValue::parse(""), None);
        assert_eq!(CellValue::parse("12"), Some(CellValue::Number(12)));
        assert_eq!(CellValue::parse("FREE"), Some(CellValue::Text("FREE".into())));
    }

    #[test]
    fn card_pads_ragged_rows() {
        let card = Card::from_number_rows(vec![vec![1, 2, 3], vec![4]]);
        assert_eq!(card.shape(), (2, 3));
        assert_eq!(card.get(1, 2), None);
        assert_eq!(card.get(1, 0), Some(&CellValue::Number(4)));
    }

    #[test]
    fn dab_lines() {
        let mut d = DabMatrix::new(2, 3);
        d.set_line(Axis::Col, 1, true);
        assert!(d.line_full(Axis::Col, 1));
        assert!(!d.line_full(Axis::Row, 0));
        d.set_line(Axis::Row, 0, true);
        assert!(d.line_full(Axis::Row, 0));
        assert_eq!(d.marked_count(), 4);
        d.clear();
        assert_eq!(d.marked_count(), 0);
        assert!(!DabMatrix::new(0, 0).line_full(Axis::Col, 0));
    }

    #[test]
    fn grid_json_uses_camel_case_and_lowercase_enums() {
        let grid = Grid {
            bbox: NormalizedBoundingBox {
                x0p: 0.1,
                y0p: 0.2,
                x1p: 0.9,
                y1p: 0.8,
                design_width: Some(400.0),
                design_height: Some(300.0),
            },
            rows: 1,
            cols: 2,
            numbering: NumberingSpec {
                mode: NumberingMode::Sequential,
                order: NumberOrder::Row,
                first: 1,
                last: 2,
            },
            values: vec![vec![Some(1), None]],
            overlay_type: OverlayType::Both,
            player_overlay: None,
        };
        let json = serde_json::to_string(&grid).unwrap();
        assert!(json.contains("\"overlayType\":\"both\""));
        assert!(json.contains("\"designWidth\":400.0"));
        assert!(json.contains("\"order\":\"row\""));
        let back: Grid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, grid);
    }

    #[test]
    fn grid_validate_catches_stale_values() {
        let mut grid: Grid = serde_json::from_str(
            r#"{"bbox":{"x0p":0,"y0p":0,"x1p":1,"y1p":1},"rows":2,"cols":2,
                "numbering":{"mode":"manual"},"values":[[1,2],[3,4]],"overlayType":"dab"}"#,
        )
        .unwrap();
        assert!(grid.validate().is_ok());
        assert_eq!(grid.numbering.first, 1);
        grid.rows = 3;
        assert!(matches!(grid.validate(), Err(GridError::ValuesShape { .. })));
    }

    #[test]
    fn names_fit_and_truncate() {
        let names = vec!["Ann".to_string()];
        assert_eq!(fit_names(&names, 3), vec!["Ann", "Player 2", "Player 3"]);
        assert_eq!(fit_names(&names, 0), Vec::<String>::new());
        assert_eq!(truncate_name("Bartholomew the Great"), "Bartholomew the ");
    }

    #[test]
    fn winner_message_prefers_player() {
        let w = WinnerResult { axis: Axis::Col, index: 2, player: None };
        assert_eq!(w.message(), "Column 3 has bingo!");
        let w = WinnerResult { axis: Axis::Row, index: 0, player: Some("Kim".into()) };
        assert_eq!(w.message(), "Kim has bingo!");
    }
}
