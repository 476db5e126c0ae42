// Play session: card, marks, calls, winner and settings behind one reducer.
use std::rc::Rc;

use yew::Reducible;

use super::calls::{BallRng, CallHistory};
use super::dab::DabBoard;
use crate::model::{
    truncate_name, Axis, Card, CellValue, DabMatrix, Grid, Settings, WinnerResult,
};
use crate::util::{clog, cwarn};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GameMode {
    #[default]
    Idle,
    Running,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ActiveView {
    #[default]
    Card,
    Ball,
}

/// Raised by `StartGame` when the grid's numbered cells don't cover the
/// ball range exactly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StartWarning {
    pub overlay_count: usize,
    pub max_ball: u32,
}

impl StartWarning {
    pub fn message(&self) -> String {
        format!(
            "The grid has {} numbered cells but the game draws 1-{}. Start anyway?",
            self.overlay_count, self.max_ball
        )
    }
}

/// A single pre-rolled random value, so draws stay deterministic inside the
/// reducer.
struct Roll(f64);

impl BallRng for Roll {
    fn next_f64(&mut self) -> f64 {
        self.0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    card: Card,
    board: DabBoard,
    calls: CallHistory,
    grid: Option<Grid>,
    pub settings: Settings,
    pub players_rows: Vec<String>,
    pub players_cols: Vec<String>,
    pub mode: GameMode,
    pub view: ActiveView,
    pub pending_start: Option<StartWarning>,
}

impl Default for Session {
    fn default() -> Self {
        Self::restore(Card::default(), None, Vec::new(), None, Settings::default())
    }
}

impl Session {
    /// Builds a session from stored parts. Marks that don't fit the card or
    /// the grid are replaced.
    pub fn restore(
        card: Card,
        dabbed: Option<DabMatrix>,
        called: Vec<u32>,
        grid: Option<Grid>,
        settings: Settings,
    ) -> Self {
        let mut board = DabBoard::new(dabbed);
        board.conform(&card, grid.as_ref().is_some_and(|g| g.overlay_type.includes_dab()));
        let mut s = Self {
            card,
            board,
            calls: CallHistory::from_called(called),
            grid,
            settings,
            players_rows: Vec::new(),
            players_cols: Vec::new(),
            mode: GameMode::Idle,
            view: ActiveView::Card,
            pending_start: None,
        };
        s.board.check_win(s.grid.as_ref());
        s
    }

    pub fn with_players(mut self, rows: Vec<String>, cols: Vec<String>) -> Self {
        self.players_rows = rows;
        self.players_cols = cols;
        self
    }

    pub fn card(&self) -> &Card {
        &self.card
    }

    pub fn dabbed(&self) -> Option<&DabMatrix> {
        self.board.dabbed()
    }

    pub fn winner(&self) -> Option<&WinnerResult> {
        self.board.winner()
    }

    pub fn calls(&self) -> &CallHistory {
        &self.calls
    }

    pub fn grid(&self) -> Option<&Grid> {
        self.grid.as_ref()
    }

    fn grid_has_dab(&self) -> bool {
        self.grid.as_ref().is_some_and(|g| g.overlay_type.includes_dab())
    }

    fn after_marks(&mut self) {
        self.board.check_win(self.grid.as_ref());
    }

    /// Records a call and, with auto mode on, marks matching cells.
    pub fn apply_call(&mut self, number: u32) -> bool {
        if !self.calls.record(number) {
            return false;
        }
        if self.settings.auto_mode {
            self.board.mark_matching(&self.card, number);
            self.after_marks();
        }
        true
    }

    pub fn draw(&mut self, rng: &mut dyn BallRng) -> Option<u32> {
        let number = self.calls.draw(self.settings.max_ball, rng)?;
        if self.settings.auto_mode {
            self.board.mark_matching(&self.card, number);
            self.after_marks();
        }
        Some(number)
    }

    pub fn reset_game(&mut self) {
        self.calls.reset();
        self.board.reset();
    }

    /// Distinct numbered cells in the grid, or zero without one.
    pub fn overlay_count(&self) -> usize {
        self.grid.as_ref().map_or(0, Grid::numbered_cell_count)
    }

    fn start(&mut self) {
        self.pending_start = None;
        self.reset_game();
        self.mode = GameMode::Running;
        self.view = ActiveView::Card;
        clog("game started");
    }

    fn load_card(&mut self, card: Card) {
        self.card = card;
        self.board.reshape(&self.card, self.grid_has_dab());
        self.board.clear_winner();
        self.calls.reset();
    }

    fn save_grid(&mut self, grid: Grid) {
        let with_dab = grid.overlay_type.includes_dab();
        self.card = Card::from_grid_values(&grid.values);
        self.board.reshape(&self.card, with_dab);
        if let Some(p) = &grid.player_overlay {
            let copy = |names: &[String], len: usize| -> Vec<String> {
                names.iter().take(len).map(|n| truncate_name(n)).collect()
            };
            if p.show_rows {
                self.players_rows = copy(&p.rows, grid.rows);
            }
            if p.show_cols {
                self.players_cols = copy(&p.cols, grid.cols);
            }
        }
        self.board.clear_winner();
        self.calls.reset();
        self.grid = Some(grid);
    }
}

#[derive(Clone, Debug)]
pub enum SessionAction {
    /// Engine-level toggle of one mark.
    ToggleDab { row: usize, col: usize },
    /// A click on an overlay cell; toggles only when auto mode is off.
    ClickCell { row: usize, col: usize },
    ToggleLine { axis: Axis, index: usize },
    Call(u32),
    /// Draw with a pre-rolled value in `[0, 1)`.
    Draw { roll: f64 },
    Reset,
    LoadCard(Card),
    SetCell { row: usize, col: usize, value: Option<CellValue> },
    SaveGrid(Grid),
    ClearGrid,
    SetSettings(Settings),
    SetPlayers { axis: Axis, names: Vec<String> },
    StartGame,
    ConfirmStart,
    CancelStart,
    StopGame,
    SetView(ActiveView),
}

impl Reducible for Session {
    type Action = SessionAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        use SessionAction::*;
        let mut new = (*self).clone();
        match action {
            ToggleDab { row, col } => {
                if !new.board.toggle(row, col) {
                    return self;
                }
                new.after_marks();
            }
            ClickCell { row, col } => {
                if new.settings.auto_mode || !new.board.toggle(row, col) {
                    return self;
                }
                new.after_marks();
            }
            ToggleLine { axis, index } => {
                if !new.board.toggle_line(axis, index) {
                    return self;
                }
                new.after_marks();
            }
            Call(number) => {
                if !new.apply_call(number) {
                    return self;
                }
            }
            Draw { roll } => {
                if new.draw(&mut Roll(roll)).is_none() {
                    return self;
                }
            }
            Reset => new.reset_game(),
            LoadCard(card) => new.load_card(card),
            SetCell { row, col, value } => {
                if !new.card.set(row, col, value) {
                    return self;
                }
            }
            SaveGrid(grid) => new.save_grid(grid),
            ClearGrid => {
                new.grid = None;
                new.board.reshape(&new.card, false);
                new.board.clear_winner();
            }
            SetSettings(settings) => {
                new.settings = Settings {
                    max_ball: settings.max_ball.max(1),
                    ..settings
                };
            }
            SetPlayers { axis, names } => {
                let names: Vec<String> = names.iter().map(|n| truncate_name(n)).collect();
                match axis {
                    Axis::Row => new.players_rows = names,
                    Axis::Col => new.players_cols = names,
                }
            }
            StartGame => {
                let count = new.overlay_count();
                let max_ball = new.settings.max_ball;
                if count != 0 && count != max_ball as usize {
                    cwarn(&format!("grid has {} numbers, max ball is {}", count, max_ball));
                    new.pending_start = Some(StartWarning {
                        overlay_count: count,
                        max_ball,
                    });
                } else {
                    new.start();
                }
            }
            ConfirmStart => new.start(),
            CancelStart => new.pending_start = None,
            StopGame => new.mode = GameMode::Idle,
            SetView(view) => new.view = view,
        }
        Rc::new(new)
    }
}

/// Fires once per distinct winner; re-arms when the winner is cleared.
#[derive(Clone, Debug, Default)]
pub struct CelebrationLatch {
    last: Option<WinnerResult>,
}

impl CelebrationLatch {
    pub fn should_fire(&mut self, winner: Option<&WinnerResult>) -> bool {
        match winner {
            None => {
                self.last = None;
                false
            }
            Some(w) if self.last.as_ref() == Some(w) => false,
            Some(w) => {
                self.last = Some(w.clone());
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::calls::tests::Seq;
    use crate::geometry::NormalizedBoundingBox;
    use crate::model::{NumberOrder, NumberingMode, NumberingSpec, OverlayType, PlayerOverlay};
    use crate::numbering::generate;
    use proptest::prelude::*;

    fn grid(rows: usize, cols: usize, overlay_type: OverlayType) -> Grid {
        Grid {
            bbox: NormalizedBoundingBox {
                x0p: 0.1,
                y0p: 0.1,
                x1p: 0.9,
                y1p: 0.9,
                design_width: None,
                design_height: None,
            },
            rows,
            cols,
            numbering: NumberingSpec {
                mode: NumberingMode::Sequential,
                order: NumberOrder::Row,
                first: 1,
                last: (rows * cols) as i64,
            },
            values: generate(rows, cols, NumberOrder::Row, 1),
            overlay_type,
            player_overlay: None,
        }
    }

    fn reduce(s: Session, a: SessionAction) -> Session {
        (*Rc::new(s).reduce(a)).clone()
    }

    fn dab_shape_holds(s: &Session) -> bool {
        match (s.grid_has_dab(), s.dabbed()) {
            (false, None) => true,
            (true, Some(d)) => d.has_shape(s.card().rows(), s.card().cols()),
            _ => false,
        }
    }

    #[test]
    fn end_to_end_row_win_before_columns() {
        let s = reduce(Session::default(), SessionAction::SaveGrid(grid(2, 2, OverlayType::Dab)));
        assert_eq!(s.card(), &Card::from_number_rows(vec![vec![1, 2], vec![3, 4]]));
        let s = reduce(s, SessionAction::Call(3));
        let d = s.dabbed().unwrap();
        assert!(d.get(1, 0));
        assert_eq!(d.marked_count(), 1);
        assert!(s.winner().is_none());
        let s = reduce(s, SessionAction::Call(4));
        let w = s.winner().unwrap();
        assert_eq!((w.axis, w.index), (Axis::Row, 1));
        assert_eq!(s.calls().called(), &[3, 4]);
        assert_eq!(s.calls().current(), Some(4));
    }

    #[test]
    fn duplicate_call_leaves_state_alone() {
        let s = reduce(Session::default(), SessionAction::SaveGrid(grid(2, 2, OverlayType::Dab)));
        let s = reduce(s, SessionAction::Call(2));
        let s = reduce(s, SessionAction::ToggleDab { row: 0, col: 1 });
        let again = reduce(s.clone(), SessionAction::Call(2));
        assert_eq!(again, s);
    }

    #[test]
    fn manual_mode_clicks_toggle_only_without_auto() {
        let s = reduce(Session::default(), SessionAction::SaveGrid(grid(2, 2, OverlayType::Both)));
        let s = reduce(s, SessionAction::ClickCell { row: 0, col: 0 });
        assert_eq!(s.dabbed().unwrap().marked_count(), 0);
        let s = reduce(
            s,
            SessionAction::SetSettings(Settings { auto_mode: false, ..Settings::default() }),
        );
        let s = reduce(s, SessionAction::ClickCell { row: 0, col: 0 });
        assert!(s.dabbed().unwrap().get(0, 0));
        // calls no longer mark
        let s = reduce(s, SessionAction::Call(4));
        assert!(!s.dabbed().unwrap().get(1, 1));
    }

    #[test]
    fn winner_carries_player_name() {
        let mut g = grid(2, 2, OverlayType::Both);
        g.player_overlay = Some(PlayerOverlay {
            rows: vec!["Ann".into(), "A very long player name".into()],
            cols: vec!["Bo".into(), "Cy".into()],
            row_offset: 110.0,
            col_offset: 36.0,
            row_offset_pct: None,
            col_offset_pct: None,
            row_centers_pct: None,
            col_centers_pct: None,
            show_rows: true,
            show_cols: false,
        });
        let s = reduce(Session::default(), SessionAction::SaveGrid(g));
        assert_eq!(s.players_rows, vec!["Ann", "A very long play"]);
        assert!(s.players_cols.is_empty());
        let s = reduce(s, SessionAction::ToggleLine { axis: Axis::Col, index: 1 });
        assert_eq!(s.winner().unwrap().message(), "Cy has bingo!");
    }

    #[test]
    fn player_only_grid_drops_marks_and_game_state() {
        let s = reduce(Session::default(), SessionAction::SaveGrid(grid(2, 2, OverlayType::Dab)));
        let s = reduce(s, SessionAction::Call(1));
        let s = reduce(s, SessionAction::SaveGrid(grid(2, 2, OverlayType::Player)));
        assert!(s.dabbed().is_none());
        assert!(s.calls().is_empty());
        assert!(s.winner().is_none());
        // toggles are ignored, not errors
        let s = reduce(s, SessionAction::ToggleLine { axis: Axis::Row, index: 0 });
        assert!(s.winner().is_none());
    }

    #[test]
    fn saving_a_new_dab_grid_starts_a_fresh_game() {
        let s = reduce(Session::default(), SessionAction::SaveGrid(grid(2, 2, OverlayType::Dab)));
        let s = reduce(s, SessionAction::Call(1));
        let s = reduce(s, SessionAction::Call(2));
        assert_eq!(s.winner().map(|w| (w.axis, w.index)), Some((Axis::Row, 0)));

        let mut next = grid(3, 3, OverlayType::Dab);
        next.values = generate(3, 3, NumberOrder::Row, 10);
        let s = reduce(s, SessionAction::SaveGrid(next));
        assert!(s.calls().is_empty());
        assert_eq!(s.calls().current(), None);
        assert!(s.winner().is_none());
        assert_eq!(s.dabbed().unwrap().marked_count(), 0);

        let s = reduce(s, SessionAction::ToggleLine { axis: Axis::Col, index: 2 });
        assert_eq!(s.winner().map(|w| (w.axis, w.index)), Some((Axis::Col, 2)));
    }

    #[test]
    fn draw_uses_the_roll_and_stops_when_exhausted() {
        let s = reduce(
            Session::default(),
            SessionAction::SetSettings(Settings { max_ball: 2, ..Settings::default() }),
        );
        let s = reduce(s, SessionAction::Draw { roll: 0.9 });
        assert_eq!(s.calls().current(), Some(2));
        let s = reduce(s, SessionAction::Draw { roll: 0.9 });
        assert_eq!(s.calls().called(), &[2, 1]);
        let s2 = reduce(s.clone(), SessionAction::Draw { roll: 0.1 });
        assert_eq!(s2, s);
    }

    #[test]
    fn new_card_resets_calls_and_reshapes_marks() {
        let s = reduce(Session::default(), SessionAction::SaveGrid(grid(2, 2, OverlayType::Dab)));
        let s = reduce(s, SessionAction::ToggleLine { axis: Axis::Row, index: 0 });
        assert!(s.winner().is_some());
        let s = reduce(s, SessionAction::Call(4));
        let s = reduce(s, SessionAction::LoadCard(Card::from_number_rows(vec![vec![1, 2, 3]])));
        assert!(s.winner().is_none());
        assert!(s.calls().is_empty());
        assert!(s.dabbed().unwrap().has_shape(1, 3));
    }

    #[test]
    fn blank_card_for_a_new_image_drops_the_old_game() {
        let s = reduce(Session::default(), SessionAction::SaveGrid(grid(2, 2, OverlayType::Dab)));
        let s = reduce(s, SessionAction::Call(1));
        let s = reduce(s, SessionAction::Call(2));
        assert!(s.winner().is_some());
        let s = reduce(s, SessionAction::LoadCard(Card::default()));
        assert_eq!(s.card(), &Card::default());
        assert!(s.calls().is_empty());
        assert!(s.winner().is_none());
        let d = s.dabbed().unwrap();
        assert!(d.has_shape(s.card().rows(), s.card().cols()));
        assert_eq!(d.marked_count(), 0);
    }

    #[test]
    fn start_warns_on_count_mismatch() {
        let s = reduce(Session::default(), SessionAction::SaveGrid(grid(2, 2, OverlayType::Dab)));
        let s = reduce(s, SessionAction::StartGame);
        assert_eq!(s.pending_start, Some(StartWarning { overlay_count: 4, max_ball: 75 }));
        assert_eq!(s.mode, GameMode::Idle);
        let s = reduce(s, SessionAction::CancelStart);
        assert!(s.pending_start.is_none());
        let s = reduce(s, SessionAction::Call(1));
        let s = reduce(s, SessionAction::StartGame);
        let s = reduce(s, SessionAction::ConfirmStart);
        assert_eq!(s.mode, GameMode::Running);
        assert!(s.calls().is_empty());

        let s = reduce(Session::default(), SessionAction::SaveGrid(grid(15, 5, OverlayType::Dab)));
        let s = reduce(s, SessionAction::StartGame);
        assert!(s.pending_start.is_none());
        assert_eq!(s.mode, GameMode::Running);
    }

    #[test]
    fn restore_replaces_mismatched_marks() {
        let g = grid(2, 2, OverlayType::Dab);
        let card = Card::from_grid_values(&g.values);
        let s = Session::restore(card.clone(), Some(DabMatrix::new(3, 3)), vec![1], Some(g), Settings::default());
        assert!(s.dabbed().unwrap().has_shape(2, 2));
        let s = Session::restore(card, Some(DabMatrix::new(2, 2)), vec![], None, Settings::default());
        assert!(s.dabbed().is_none());
    }

    #[test]
    fn celebration_fires_once_per_winner() {
        let mut latch = CelebrationLatch::default();
        let w = WinnerResult { axis: Axis::Row, index: 0, player: None };
        assert!(!latch.should_fire(None));
        assert!(latch.should_fire(Some(&w)));
        assert!(!latch.should_fire(Some(&w)));
        assert!(!latch.should_fire(None));
        assert!(latch.should_fire(Some(&w)));
    }

    #[test]
    fn direct_draw_with_injected_rng() {
        let mut s = Session::default();
        let mut rng = Seq(vec![0.0], 0);
        assert_eq!(s.draw(&mut rng), Some(1));
        assert_eq!(s.draw(&mut rng), Some(2));
    }

    fn action() -> impl Strategy<Value = SessionAction> {
        prop_oneof![
            (1usize..5, 1usize..5).prop_map(|(r, c)| SessionAction::LoadCard(Card::empty(r, c))),
            (1usize..5, 1usize..5, 0u8..3).prop_map(|(r, c, t)| {
                let t = match t {
                    0 => OverlayType::Dab,
                    1 => OverlayType::Player,
                    _ => OverlayType::Both,
                };
                SessionAction::SaveGrid(grid(r, c, t))
            }),
            Just(SessionAction::ClearGrid),
            Just(SessionAction::Reset),
            (0usize..5, 0usize..5).prop_map(|(row, col)| SessionAction::ToggleDab { row, col }),
            (any::<bool>(), 0usize..5).prop_map(|(is_row, index)| SessionAction::ToggleLine {
                axis: if is_row { Axis::Row } else { Axis::Col },
                index,
            }),
            (1u32..30).prop_map(SessionAction::Call),
        ]
    }

    proptest! {
        #[test]
        fn dab_matrix_always_matches_card_or_is_absent(
            actions in prop::collection::vec(action(), 0..40),
        ) {
            let mut s = Rc::new(Session::default());
            prop_assert!(dab_shape_holds(&s));
            for a in actions {
                s = s.reduce(a);
                prop_assert!(dab_shape_holds(&s));
            }
        }
    }
}
