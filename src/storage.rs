// Local storage persistence: one JSON value per key, validated on load.
use gloo::storage::errors::StorageError;
use gloo::storage::{LocalStorage, Storage};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{GridError, Result};
use crate::model::{Card, DabMatrix, Grid, GridDefaults, Settings, DEFAULT_MAX_BALL};
use crate::util::{clog, cwarn};

pub const CARD_KEY: &str = "bingo_card";
pub const DABBED_KEY: &str = "bingo_dabbed";
pub const CALLED_KEY: &str = "bingo_called";
pub const SETTINGS_KEY: &str = "bingo_settings";
pub const GRID_KEY: &str = "bingo_grid";
pub const GRID_DEFAULTS_KEY: &str = "bingo_grid_defaults";
pub const PLAYERS_ROWS_KEY: &str = "bingo_players_rows";
pub const PLAYERS_COLS_KEY: &str = "bingo_players_cols";
pub const IMAGE_KEY: &str = "bingo_image";
pub const SHOW_EDITABLE_KEY: &str = "bingo_show_editable_grid";
pub const PREVIEW_SIZE_KEY: &str = "bingo_cardview_size";

/// Reads `key`. Missing keys and undecodable values both yield `None`; the
/// latter is logged.
pub fn load<T: DeserializeOwned>(key: &str) -> Option<T> {
    match LocalStorage::get::<T>(key) {
        Ok(value) => Some(value),
        Err(StorageError::KeyNotFound(_)) => None,
        Err(err) => {
            cwarn(&format!("storage: ignoring {}: {}", key, GridError::from(err)));
            None
        }
    }
}

pub fn save<T: Serialize>(key: &str, value: &T) -> Result<()> {
    LocalStorage::set(key, value)?;
    Ok(())
}

/// Writes `value`, logging instead of failing.
pub fn store<T: Serialize>(key: &str, value: &T) {
    if let Err(err) = save(key, value) {
        cwarn(&format!("storage: write {} failed: {}", key, err));
    }
}

pub fn remove(key: &str) {
    LocalStorage::delete(key);
}

/// Everything the app keeps between visits, already validated.
#[derive(Clone, Debug, PartialEq)]
pub struct Stored {
    pub card: Card,
    pub dabbed: Option<DabMatrix>,
    pub called: Vec<u32>,
    pub settings: Settings,
    pub grid: Option<Grid>,
    pub defaults: GridDefaults,
    pub players_rows: Vec<String>,
    pub players_cols: Vec<String>,
}

pub fn load_all() -> Stored {
    let grid = repair_grid(load::<Option<Grid>>(GRID_KEY).flatten());
    let card = repair_card(load::<Card>(CARD_KEY));
    let stored_dab = load::<Option<DabMatrix>>(DABBED_KEY).flatten();
    let with_dab = grid.as_ref().is_some_and(|g| g.overlay_type.includes_dab());
    let (dabbed, replaced) = repair_dabbed(stored_dab, &card, with_dab);
    if replaced {
        clog("storage: replaced stored dab marks");
        store(DABBED_KEY, &dabbed);
    }
    Stored {
        card,
        dabbed,
        called: repair_called(load::<Vec<i64>>(CALLED_KEY).unwrap_or_default()),
        settings: repair_settings(load(SETTINGS_KEY).unwrap_or_default()),
        grid,
        defaults: load(GRID_DEFAULTS_KEY).unwrap_or_default(),
        players_rows: load(PLAYERS_ROWS_KEY).unwrap_or_default(),
        players_cols: load(PLAYERS_COLS_KEY).unwrap_or_default(),
    }
}

/// Drops a grid whose values don't match its shape.
pub fn repair_grid(grid: Option<Grid>) -> Option<Grid> {
    let grid = grid?;
    match grid.validate() {
        Ok(()) => Some(grid),
        Err(err) => {
            cwarn(&format!("storage: discarding grid: {}", err));
            None
        }
    }
}

/// Pads ragged rows; an empty card becomes the default blank card.
pub fn repair_card(card: Option<Card>) -> Card {
    let Some(Card(mut rows)) = card else {
        return Card::default();
    };
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    if rows.is_empty() || width == 0 {
        return Card::default();
    }
    for row in &mut rows {
        row.resize(width, None);
    }
    Card(rows)
}

/// Marks that match the card stay; anything else is replaced wholesale.
/// Returns the marks and whether they were replaced.
pub fn repair_dabbed(stored: Option<DabMatrix>, card: &Card, with_dab: bool) -> (Option<DabMatrix>, bool) {
    match stored {
        Some(d) if with_dab && d.has_shape(card.rows(), card.cols()) => (Some(d), false),
        Some(_) if !with_dab => (None, true),
        None if !with_dab => (None, false),
        _ => (Some(DabMatrix::for_card(card)), true),
    }
}

/// Distinct positive calls, first occurrence kept.
pub fn repair_called(called: Vec<i64>) -> Vec<u32> {
    let mut out: Vec<u32> = Vec::with_capacity(called.len());
    for n in called {
        if let Ok(n) = u32::try_from(n) {
            if n >= 1 && !out.contains(&n) {
                out.push(n);
            }
        }
    }
    out
}

pub fn repair_settings(settings: Settings) -> Settings {
    if settings.max_ball == 0 {
        Settings {
            max_ball: DEFAULT_MAX_BALL,
            ..settings
        }
    } else {
        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CellValue;

    #[test]
    fn mismatched_marks_are_replaced_not_patched() {
        let card = Card::empty(2, 3);
        let mut stale = DabMatrix::new(3, 3);
        stale.set(0, 0, true);
        let (d, replaced) = repair_dabbed(Some(stale), &card, true);
        assert!(replaced);
        let d = d.unwrap();
        assert!(d.has_shape(2, 3));
        assert_eq!(d.marked_count(), 0);

        let mut ok = DabMatrix::new(2, 3);
        ok.set(1, 2, true);
        assert_eq!(repair_dabbed(Some(ok.clone()), &card, true), (Some(ok), false));
        assert_eq!(repair_dabbed(None, &card, true).1, true);
    }

    #[test]
    fn marks_without_a_dab_grid_become_absent() {
        let card = Card::empty(2, 2);
        assert_eq!(repair_dabbed(Some(DabMatrix::new(2, 2)), &card, false), (None, true));
        assert_eq!(repair_dabbed(None, &card, false), (None, false));
    }

    #[test]
    fn calls_are_distinct_and_positive() {
        assert_eq!(repair_called(vec![5, 0, -3, 5, 12, 1]), vec![5, 12, 1]);
    }

    #[test]
    fn stored_card_is_padded() {
        let raw = r#"[[1,"FREE",3],[4],null]"#;
        let card: Option<Card> = serde_json::from_str::<Card>(raw).ok();
        // a null row is not a valid card row
        assert!(card.is_none());
        let card: Card = serde_json::from_str(r#"[[1,"FREE",3],[4]]"#).unwrap();
        let card = repair_card(Some(card));
        assert_eq!(card.shape(), (2, 3));
        assert_eq!(card.get(0, 1), Some(&CellValue::Text("FREE".into())));
        assert_eq!(repair_card(Some(Card(vec![]))), Card::default());
        assert_eq!(repair_card(None), Card::default());
    }

    #[test]
    fn stale_grid_is_discarded() {
        let good: Grid = serde_json::from_str(
            r#"{"bbox":{"x0p":0,"y0p":0,"x1p":1,"y1p":1},"rows":1,"cols":2,
                "numbering":{"mode":"sequential"},"values":[[1,2]],"overlayType":"both"}"#,
        )
        .unwrap();
        assert!(repair_grid(Some(good.clone())).is_some());
        let bad = Grid { rows: 2, ..good };
        assert!(repair_grid(Some(bad)).is_none());
    }

    #[test]
    fn zero_max_ball_falls_back() {
        let s = repair_settings(Settings { max_ball: 0, auto_mode: false, sound_enabled: true });
        assert_eq!(s.max_ball, DEFAULT_MAX_BALL);
        assert!(!s.auto_mode);
    }
}
