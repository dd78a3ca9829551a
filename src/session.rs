use std::time::Duration;

use chrono::Utc;

use crate::clock::{Clock, TimerId, Timers};
use crate::combo::ComboTracker;
use crate::config::GameConfig;
use crate::ledger::{HighScoreEntry, HighScoreLedger, ScoreStore};
use crate::score::ScoreBoard;
use crate::target::{Target, TargetScheduler};
use crate::tier::{classify, Tier};

/// The three logical timers alive during an Active run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerKind {
    Countdown,
    Reposition,
    ComboDecay,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Active,
    Ended,
}

/// Snapshot taken when the clock runs out; immutable until the next run
/// replaces it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunResult {
    pub score: u32,
    /// Reported as the combo-weighted score, not a raw tap count: the page
    /// this game came from published the same number under both names and
    /// the ledger relies on it, so the conflation is kept deliberately.
    pub hits: u32,
    pub misses: u32,
    pub streak: u32,
}

/// Drives one timed run end to end: countdown, target cadence, combo decay,
/// scoring, and the final ledger submission.
///
/// Everything is single-threaded and cooperative. Taps (`target_hit`,
/// `field_miss`) are synchronous; timer work only happens inside `advance`,
/// which the owning loop calls after input dispatch. That ordering is what
/// makes a hit beat a combo decay due at the same instant.
#[derive(Debug)]
pub struct SessionController<S: ScoreStore, C: Clock> {
    config: GameConfig,
    clock: C,
    phase: Phase,
    time_left: u64,
    timers: Timers<TimerKind>,
    countdown: Option<TimerId>,
    board: ScoreBoard,
    combo: ComboTracker,
    scheduler: TargetScheduler,
    ledger: HighScoreLedger<S>,
    last_result: Option<RunResult>,
}

impl<S: ScoreStore, C: Clock> SessionController<S, C> {
    pub fn new(config: GameConfig, ledger: HighScoreLedger<S>, clock: C) -> Self {
        let combo = ComboTracker::new(
            config.max_combo,
            Duration::from_millis(config.combo_timeout_ms),
        );
        let scheduler = TargetScheduler::new(&config);
        Self {
            time_left: config.duration_secs,
            config,
            clock,
            phase: Phase::Idle,
            timers: Timers::new(),
            countdown: None,
            board: ScoreBoard::new(),
            combo,
            scheduler,
            ledger,
            last_result: None,
        }
    }

    /// Begin a run. Only valid from Idle or Ended; a running session
    /// ignores the call.
    pub fn start(&mut self) {
        if self.phase == Phase::Active {
            return;
        }
        let now = self.clock.now();
        self.timers.cancel_all();
        self.countdown = None;
        self.board.reset();
        self.combo.reset(&mut self.timers);
        self.time_left = self.config.duration_secs;
        self.last_result = None;
        self.phase = Phase::Active;
        self.countdown = Some(
            self.timers
                .every(now, Duration::from_secs(1), TimerKind::Countdown),
        );
        self.scheduler.activate(&mut self.timers, now);
    }

    /// Run every timer whose deadline has passed. Due callbacks are applied
    /// one at a time in deadline order; once the run ends, stragglers from
    /// the same poll are dropped by the phase guards.
    pub fn advance(&mut self) {
        let now = self.clock.now();
        for kind in self.timers.poll(now) {
            if self.phase != Phase::Active {
                break;
            }
            match kind {
                TimerKind::Countdown => self.on_second(),
                TimerKind::Reposition => self.scheduler.reposition(),
                TimerKind::ComboDecay => self.combo.on_decay(),
            }
        }
    }

    fn on_second(&mut self) {
        self.time_left = self.time_left.saturating_sub(1);
        if self.time_left == 0 {
            self.finish();
        }
    }

    fn finish(&mut self) {
        self.phase = Phase::Ended;
        let result = RunResult {
            score: self.board.score(),
            hits: self.board.score(),
            misses: self.board.misses(),
            streak: self.combo.streak(),
        };
        if result.score > 0 {
            let _ = self.ledger.submit(result.score, Utc::now());
        }
        self.last_result = Some(result);
        self.scheduler.deactivate(&mut self.timers);
        self.combo.reset(&mut self.timers);
        if let Some(id) = self.countdown.take() {
            self.timers.cancel(id);
        }
        self.timers.cancel_all();
    }

    /// Successful tap on the target. Scores with the multiplier in effect
    /// before the combo climbs, then tightens the cadence for the new score.
    pub fn target_hit(&mut self) {
        if self.phase != Phase::Active {
            return;
        }
        let now = self.clock.now();
        self.board.record_hit(self.combo.level());
        self.combo.on_hit(&mut self.timers, now);
        self.scheduler
            .on_score_changed(&mut self.timers, now, self.board.score());
    }

    /// Tap that landed on the field instead of the target
    pub fn field_miss(&mut self) {
        if self.phase != Phase::Active {
            return;
        }
        self.board.record_miss();
        self.combo.reset(&mut self.timers);
    }

    // Read surface for the presentation layer

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase == Phase::Active
    }

    pub fn time_left(&self) -> u64 {
        self.time_left
    }

    pub fn score(&self) -> u32 {
        self.board.score()
    }

    pub fn misses(&self) -> u32 {
        self.board.misses()
    }

    pub fn accuracy(&self) -> u32 {
        self.board.accuracy()
    }

    pub fn combo(&self) -> u8 {
        self.combo.level()
    }

    pub fn streak(&self) -> u32 {
        self.combo.streak()
    }

    pub fn tier(&self) -> &'static Tier {
        classify(self.board.score())
    }

    pub fn target(&self) -> Option<Target> {
        self.scheduler.target()
    }

    pub fn last_result(&self) -> Option<RunResult> {
        self.last_result
    }

    pub fn high_scores(&self) -> &[HighScoreEntry] {
        self.ledger.entries()
    }
}
