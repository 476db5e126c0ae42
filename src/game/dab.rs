// Dab marks and win detection for the active card.
use crate::model::{Axis, Card, DabMatrix, Grid, WinnerResult};
use crate::util::clog;

/// Marks plus the (sticky) winner. The matrix is `None` whenever the active
/// grid has no dab layer; every mutation is then a no-op.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DabBoard {
    dabbed: Option<DabMatrix>,
    winner: Option<WinnerResult>,
}

impl DabBoard {
    pub fn new(dabbed: Option<DabMatrix>) -> Self {
        Self { dabbed, winner: None }
    }

    pub fn dabbed(&self) -> Option<&DabMatrix> {
        self.dabbed.as_ref()
    }

    pub fn winner(&self) -> Option<&WinnerResult> {
        self.winner.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.dabbed.is_some()
    }

    /// Replaces the marks wholesale: a fresh all-false matrix shaped like
    /// `card` when `with_dab`, otherwise no matrix at all.
    pub fn reshape(&mut self, card: &Card, with_dab: bool) {
        self.dabbed = with_dab.then(|| DabMatrix::for_card(card));
    }

    /// Keeps the current marks if they still fit `card`, else reshapes.
    pub fn conform(&mut self, card: &Card, with_dab: bool) {
        let fits = self
            .dabbed
            .as_ref()
            .is_some_and(|d| d.has_shape(card.rows(), card.cols()));
        if !(with_dab && fits) {
            self.reshape(card, with_dab);
        }
    }

    pub fn toggle(&mut self, r: usize, c: usize) -> bool {
        let Some(d) = self.dabbed.as_mut() else {
            return false;
        };
        if r >= d.rows() || c >= d.cols() {
            return false;
        }
        let v = d.get(r, c);
        d.set(r, c, !v);
        true
    }

    /// Clears a fully marked line, otherwise marks all of it.
    pub fn toggle_line(&mut self, axis: Axis, index: usize) -> bool {
        let Some(d) = self.dabbed.as_mut() else {
            return false;
        };
        let len = match axis {
            Axis::Row => d.rows(),
            Axis::Col => d.cols(),
        };
        if index >= len {
            return false;
        }
        let full = d.line_full(axis, index);
        d.set_line(axis, index, !full);
        true
    }

    /// Marks every cell of `card` that prints as `number`. Returns how many
    /// cells matched.
    pub fn mark_matching(&mut self, card: &Card, number: u32) -> usize {
        let Some(d) = self.dabbed.as_mut() else {
            return 0;
        };
        let mut hits = 0;
        for (r, row) in card.0.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                if cell.as_ref().is_some_and(|v| v.matches_call(number)) {
                    d.set(r, c, true);
                    hits += 1;
                }
            }
        }
        hits
    }

    /// Sets the winner if none is set yet. Rows are scanned before columns,
    /// lowest index first; the first full line wins.
    pub fn check_win(&mut self, grid: Option<&Grid>) -> Option<&WinnerResult> {
        if self.winner.is_none() {
            if let Some(d) = self.dabbed.as_ref() {
                self.winner = find_winner(d, grid);
                if let Some(w) = &self.winner {
                    clog(&format!("winner: {:?} {}", w.axis, w.index));
                }
            }
        }
        self.winner.as_ref()
    }

    /// Unmarks everything (keeping the matrix) and clears the winner.
    pub fn reset(&mut self) {
        if let Some(d) = self.dabbed.as_mut() {
            d.clear();
        }
        self.winner = None;
    }

    pub fn clear_winner(&mut self) {
        self.winner = None;
    }
}

pub fn find_winner(d: &DabMatrix, grid: Option<&Grid>) -> Option<WinnerResult> {
    let player = |axis: Axis, index: usize| {
        grid.and_then(|g| g.player_name(axis, index))
            .filter(|n| !n.is_empty())
    };
    if let Some(r) = (0..d.rows()).find(|&r| d.line_full(Axis::Row, r)) {
        return Some(WinnerResult {
            axis: Axis::Row,
            index: r,
            player: player(Axis::Row, r),
        });
    }
    (0..d.cols())
        .find(|&c| d.line_full(Axis::Col, c))
        .map(|c| WinnerResult {
            axis: Axis::Col,
            index: c,
            player: player(Axis::Col, c),
        })
}
