// Ball calls: random draws without repeats, plus the ordered call history.
use serde::{Deserialize, Serialize};

use crate::util::{clog, cwarn};

/// Source of uniform floats in `[0, 1)`.
pub trait BallRng {
    fn next_f64(&mut self) -> f64;
}

/// Browser randomness via `Math.random`.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsRandom;

impl BallRng for JsRandom {
    fn next_f64(&mut self) -> f64 {
        js_sys::Math::random()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallHistory {
    called: Vec<u32>,
    current: Option<u32>,
}

impl CallHistory {
    /// Resumes from a stored history. The last entry becomes current.
    pub fn from_called(called: Vec<u32>) -> Self {
        let current = called.last().copied();
        Self { called, current }
    }

    pub fn called(&self) -> &[u32] {
        &self.called
    }

    pub fn current(&self) -> Option<u32> {
        self.current
    }

    pub fn contains(&self, number: u32) -> bool {
        self.called.contains(&number)
    }

    pub fn len(&self) -> usize {
        self.called.len()
    }

    pub fn is_empty(&self) -> bool {
        self.called.is_empty()
    }

    /// Appends `number` and makes it current. Zero and repeats are ignored.
    pub fn record(&mut self, number: u32) -> bool {
        if number == 0 || self.contains(number) {
            return false;
        }
        self.called.push(number);
        self.current = Some(number);
        true
    }

    /// Numbers in `1..=max_ball` not yet called.
    pub fn remaining(&self, max_ball: u32) -> Vec<u32> {
        (1..=max_ball).filter(|n| !self.contains(*n)).collect()
    }

    /// Picks uniformly among the uncalled numbers in `1..=max_ball` and
    /// records it. `None` once the pool is empty.
    pub fn draw<R: BallRng + ?Sized>(&mut self, max_ball: u32, rng: &mut R) -> Option<u32> {
        let pool = self.remaining(max_ball);
        if pool.is_empty() {
            cwarn(&format!("no balls left (max {})", max_ball));
            return None;
        }
        let r = rng.next_f64();
        let idx = if r.is_finite() && r > 0.0 {
            ((r * pool.len() as f64).floor() as usize).min(pool.len() - 1)
        } else {
            0
        };
        let number = pool[idx];
        self.record(number);
        clog(&format!("called {} ({}/{})", number, self.called.len(), max_ball));
        Some(number)
    }

    pub fn reset(&mut self) {
        self.called.clear();
        self.current = None;
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    /// Replays a fixed sequence, cycling.
    pub(crate) struct Seq(pub Vec<f64>, pub usize);

    impl BallRng for Seq {
        fn next_f64(&mut self) -> f64 {
            let v = self.0[self.1 % self.0.len()];
            self.1 += 1;
            v
        }
    }

    #[test]
    fn draw_picks_from_the_remaining_pool() {
        let mut h = CallHistory::default();
        let mut rng = Seq(vec![0.0], 0);
        assert_eq!(h.draw(3, &mut rng), Some(1));
        assert_eq!(h.draw(3, &mut rng), Some(2));
        let mut rng = Seq(vec![0.99], 0);
        assert_eq!(h.draw(3, &mut rng), Some(3));
        assert_eq!(h.draw(3, &mut rng), None);
        assert_eq!(h.called(), &[1, 2, 3]);
        assert_eq!(h.current(), Some(3));
    }

    #[test]
    fn duplicates_and_zero_are_ignored() {
        let mut h = CallHistory::default();
        assert!(h.record(9));
        assert!(h.record(4));
        assert!(!h.record(9));
        assert!(!h.record(0));
        assert_eq!(h.called(), &[9, 4]);
        assert_eq!(h.current(), Some(4));
    }

    #[test]
    fn raising_max_ball_keeps_history() {
        let mut h = CallHistory::default();
        let mut rng = Seq(vec![0.5], 0);
        while h.draw(2, &mut rng).is_some() {}
        assert_eq!(h.len(), 2);
        assert_eq!(h.draw(3, &mut rng), Some(3));
        assert_eq!(h.remaining(3), Vec::<u32>::new());
        h.reset();
        assert!(h.is_empty());
        assert_eq!(h.current(), None);
    }

    proptest! {
        #[test]
        fn draws_are_distinct_and_bounded(
            seq in prop::collection::vec(0.0f64..1.0, 1..40),
            n in 0usize..80,
        ) {
            let mut h = CallHistory::default();
            let mut rng = Seq(seq, 0);
            let mut got = Vec::new();
            for _ in 0..n {
                if let Some(b) = h.draw(75, &mut rng) {
                    got.push(b);
                }
            }
            prop_assert_eq!(got.len(), n.min(75));
            prop_assert!(got.iter().all(|b| (1..=75).contains(b)));
            prop_assert_eq!(got.iter().collect::<HashSet<_>>().len(), got.len());
            if n >= 75 {
                prop_assert_eq!(h.draw(75, &mut rng), None);
            }
        }
    }
}
