/// Score and miss aggregation for one run.
///
/// `score` is the combo-weighted total (each hit awards the combo level in
/// effect when it landed), not a raw hit count. Accuracy is derived from the
/// same weighted total, matching the page this game was lifted from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScoreBoard {
    score: u32,
    misses: u32,
}

impl ScoreBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn record_hit(&mut self, combo_level: u8) {
        self.score += u32::from(combo_level);
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn misses(&self) -> u32 {
        self.misses
    }

    /// Rounded percentage, 0 when nothing has been recorded yet
    pub fn accuracy(&self) -> u32 {
        let total = self.score + self.misses;
        if total == 0 {
            return 0;
        }
        (f64::from(self.score) * 100.0 / f64::from(total)).round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_board_reads_zero() {
        let board = ScoreBoard::new();
        assert_eq!(board.score(), 0);
        assert_eq!(board.misses(), 0);
        assert_eq!(board.accuracy(), 0);
    }

    #[test]
    fn hits_award_the_combo_level() {
        let mut board = ScoreBoard::new();
        board.record_hit(1);
        board.record_hit(2);
        board.record_hit(3);
        assert_eq!(board.score(), 6);
    }

    #[test]
    fn accuracy_uses_the_weighted_score() {
        let mut board = ScoreBoard::new();
        board.record_hit(3);
        board.record_miss();
        assert_eq!(board.accuracy(), 75);
    }

    #[test]
    fn accuracy_with_more_misses_than_points() {
        let mut board = ScoreBoard::new();
        board.record_hit(1);
        board.record_miss();
        board.record_miss();
        board.record_miss();
        assert_eq!(board.accuracy(), 25);
    }

    #[test]
    fn accuracy_rounds_half_up() {
        let mut board = ScoreBoard::new();
        board.record_hit(1);
        board.record_miss();
        // 1 / 2 = 50%, then 1 more miss: 1/3 = 33.33 -> 33
        board.record_miss();
        assert_eq!(board.accuracy(), 33);
    }

    #[test]
    fn reset_clears_both_counters() {
        let mut board = ScoreBoard::new();
        board.record_hit(4);
        board.record_miss();
        board.reset();
        assert_eq!(board, ScoreBoard::new());
    }
}
