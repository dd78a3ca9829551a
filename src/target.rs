use std::time::{Duration, Instant};

use rand::Rng;

use crate::clock::{TimerId, Timers};
use crate::config::GameConfig;
use crate::session::TimerKind;

// Padding keeps the node fully inside the play field
const X_MIN: f64 = 10.0;
const X_MAX: f64 = 90.0;
const Y_MIN: f64 = 12.0;
const Y_MAX: f64 = 82.0;

/// Where the ember node currently sits, in percentages of the play field,
/// plus the glyph the player must strike to land a hit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Target {
    pub x: f64,
    pub y: f64,
    pub glyph: char,
}

/// Repositions the target on a cadence that tightens as the score climbs.
/// Holds its own repeating-timer handle and disposes it when deactivated.
#[derive(Debug)]
pub struct TargetScheduler {
    target: Target,
    cadence: Duration,
    timer: Option<TimerId>,
    active: bool,
    base_interval_ms: u64,
    speed_min_ms: u64,
    speed_step_ms: u64,
}

impl TargetScheduler {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            target: Target {
                x: 50.0,
                y: 50.0,
                glyph: 'e',
            },
            cadence: Duration::from_millis(config.base_interval_ms),
            timer: None,
            active: false,
            base_interval_ms: config.base_interval_ms,
            speed_min_ms: config.speed_min_ms,
            speed_step_ms: config.speed_step_ms,
        }
    }

    /// `max(min, base - score * step)`: monotonically non-increasing in the
    /// score, floored so the game stays physically playable
    pub fn cadence_for(&self, score: u32) -> Duration {
        let ms = self
            .base_interval_ms
            .saturating_sub(u64::from(score) * self.speed_step_ms)
            .max(self.speed_min_ms);
        Duration::from_millis(ms)
    }

    pub fn cadence(&self) -> Duration {
        self.cadence
    }

    /// Visible target, if a run is in progress
    pub fn target(&self) -> Option<Target> {
        self.active.then_some(self.target)
    }

    /// Place the first target and arm the repeating reposition timer
    pub fn activate(&mut self, timers: &mut Timers<TimerKind>, now: Instant) {
        self.active = true;
        self.cadence = Duration::from_millis(self.base_interval_ms);
        self.reposition();
        if let Some(id) = self.timer.take() {
            timers.cancel(id);
        }
        self.timer = Some(timers.every(now, self.cadence, TimerKind::Reposition));
    }

    /// Cancel the reposition timer and hide the target
    pub fn deactivate(&mut self, timers: &mut Timers<TimerKind>) {
        if let Some(id) = self.timer.take() {
            timers.cancel(id);
        }
        self.active = false;
    }

    /// Recompute the cadence after a score change and re-arm the timer
    /// in place (the pending deadline is kept unless the new cadence is due
    /// sooner, so elapsed time is never thrown away)
    pub fn on_score_changed(&mut self, timers: &mut Timers<TimerKind>, now: Instant, score: u32) {
        let next = self.cadence_for(score);
        if next == self.cadence {
            return;
        }
        self.cadence = next;
        if let Some(id) = self.timer {
            timers.retime(id, now, next);
        }
    }

    /// Jump to a fresh uniformly-sampled spot. Consecutive repeats are legal.
    pub fn reposition(&mut self) {
        let mut rng = rand::thread_rng();
        self.target = Target {
            x: rng.gen_range(X_MIN..=X_MAX),
            y: rng.gen_range(Y_MIN..=Y_MAX),
            glyph: rng.gen_range(b'a'..=b'z') as char,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{Clock, ManualClock};

    fn scheduler() -> TargetScheduler {
        TargetScheduler::new(&GameConfig::default())
    }

    #[test]
    fn cadence_follows_the_speed_curve() {
        let s = scheduler();
        assert_eq!(s.cadence_for(0), Duration::from_millis(750));
        assert_eq!(s.cadence_for(1), Duration::from_millis(715));
        assert_eq!(s.cadence_for(10), Duration::from_millis(400));
        assert_eq!(s.cadence_for(13), Duration::from_millis(295));
    }

    #[test]
    fn cadence_floors_at_the_minimum_from_fourteen_points() {
        let s = scheduler();
        assert_eq!(s.cadence_for(14), Duration::from_millis(260));
        assert_eq!(s.cadence_for(100), Duration::from_millis(260));
    }

    #[test]
    fn cadence_is_monotonically_non_increasing() {
        let s = scheduler();
        let mut prev = s.cadence_for(0);
        for score in 1..200 {
            let next = s.cadence_for(score);
            assert!(next <= prev, "cadence rose at score {score}");
            prev = next;
        }
    }

    #[test]
    fn sampled_positions_stay_inside_the_padded_bounds() {
        let mut s = scheduler();
        for _ in 0..500 {
            s.reposition();
            let t = s.target;
            assert!((X_MIN..=X_MAX).contains(&t.x));
            assert!((Y_MIN..=Y_MAX).contains(&t.y));
            assert!(t.glyph.is_ascii_lowercase());
        }
    }

    #[test]
    fn target_is_only_visible_while_active() {
        let clock = ManualClock::new();
        let mut timers = Timers::new();
        let mut s = scheduler();

        assert!(s.target().is_none());
        s.activate(&mut timers, clock.now());
        assert!(s.target().is_some());
        s.deactivate(&mut timers);
        assert!(s.target().is_none());
        assert!(timers.is_empty());
    }

    #[test]
    fn reposition_timer_fires_on_the_cadence() {
        let clock = ManualClock::new();
        let mut timers = Timers::new();
        let mut s = scheduler();
        s.activate(&mut timers, clock.now());

        clock.advance(Duration::from_millis(750));
        assert_eq!(timers.poll(clock.now()), vec![TimerKind::Reposition]);
    }

    #[test]
    fn score_change_tightens_the_pending_deadline() {
        let clock = ManualClock::new();
        let mut timers = Timers::new();
        let mut s = scheduler();
        s.activate(&mut timers, clock.now());

        // Score 14 floors the cadence at 260ms; the pending 750ms deadline
        // must be pulled in rather than restarted
        s.on_score_changed(&mut timers, clock.now(), 14);
        assert_eq!(s.cadence(), Duration::from_millis(260));

        clock.advance(Duration::from_millis(260));
        assert_eq!(timers.poll(clock.now()), vec![TimerKind::Reposition]);
    }

    #[test]
    fn unchanged_cadence_leaves_the_timer_alone() {
        let clock = ManualClock::new();
        let mut timers = Timers::new();
        let mut s = scheduler();
        s.activate(&mut timers, clock.now());

        s.on_score_changed(&mut timers, clock.now(), 0);
        clock.advance(Duration::from_millis(749));
        assert!(timers.poll(clock.now()).is_empty());
        clock.advance(Duration::from_millis(1));
        assert_eq!(timers.poll(clock.now()), vec![TimerKind::Reposition]);
    }
}
