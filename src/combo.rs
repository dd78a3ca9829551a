use std::time::{Duration, Instant};

use crate::clock::{TimerId, Timers};
use crate::session::TimerKind;

/// Multiplier and streak state for one run.
///
/// The level climbs by one per hit up to `max_level` and collapses back to 1
/// on a miss or after `timeout` without a hit. The decay timer is single-shot
/// and re-armed on every hit; arming always cancels the previous handle, so
/// at most one decay is ever pending.
#[derive(Debug)]
pub struct ComboTracker {
    level: u8,
    streak: u32,
    max_level: u8,
    timeout: Duration,
    decay: Option<TimerId>,
}

impl ComboTracker {
    pub fn new(max_level: u8, timeout: Duration) -> Self {
        Self {
            level: 1,
            streak: 0,
            max_level,
            timeout,
            decay: None,
        }
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn on_hit(&mut self, timers: &mut Timers<TimerKind>, now: Instant) {
        self.streak += 1;
        self.level = (self.level + 1).min(self.max_level);
        if let Some(id) = self.decay.take() {
            timers.cancel(id);
        }
        self.decay = Some(timers.after(now, self.timeout, TimerKind::ComboDecay));
    }

    /// Miss or explicit reset: back to level 1, pending decay disarmed
    pub fn reset(&mut self, timers: &mut Timers<TimerKind>) {
        self.level = 1;
        self.streak = 0;
        if let Some(id) = self.decay.take() {
            timers.cancel(id);
        }
    }

    /// The armed decay deadline expired (the timer has already been
    /// consumed by the scheduler, only the handle needs clearing)
    pub fn on_decay(&mut self) {
        self.decay = None;
        self.level = 1;
        self.streak = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{Clock, ManualClock};

    const TIMEOUT: Duration = Duration::from_millis(1200);

    fn tracker() -> (ComboTracker, Timers<TimerKind>, ManualClock) {
        (ComboTracker::new(6, TIMEOUT), Timers::new(), ManualClock::new())
    }

    #[test]
    fn level_after_k_hits_is_one_plus_k_capped() {
        let (mut combo, mut timers, clock) = tracker();
        for k in 1..=10u8 {
            combo.on_hit(&mut timers, clock.now());
            assert_eq!(combo.level(), (1 + k).min(6));
            assert_eq!(combo.streak(), u32::from(k));
        }
    }

    #[test]
    fn miss_resets_level_and_streak() {
        let (mut combo, mut timers, clock) = tracker();
        combo.on_hit(&mut timers, clock.now());
        combo.on_hit(&mut timers, clock.now());
        combo.reset(&mut timers);
        assert_eq!(combo.level(), 1);
        assert_eq!(combo.streak(), 0);
        assert!(timers.is_empty());
    }

    #[test]
    fn decay_fires_after_timeout_without_hits() {
        let (mut combo, mut timers, clock) = tracker();
        combo.on_hit(&mut timers, clock.now());

        clock.advance(TIMEOUT);
        let due = timers.poll(clock.now());
        assert_eq!(due, vec![TimerKind::ComboDecay]);
        combo.on_decay();
        assert_eq!(combo.level(), 1);
        assert_eq!(combo.streak(), 0);
    }

    #[test]
    fn each_hit_supersedes_the_pending_decay() {
        let (mut combo, mut timers, clock) = tracker();
        combo.on_hit(&mut timers, clock.now());

        // Just before the deadline another hit re-arms the decay
        clock.advance(TIMEOUT - Duration::from_millis(1));
        combo.on_hit(&mut timers, clock.now());

        // The original deadline passes without a fire
        clock.advance(Duration::from_millis(1));
        assert!(timers.poll(clock.now()).is_empty());

        // Only one decay is pending at any time
        clock.advance(TIMEOUT);
        assert_eq!(timers.poll(clock.now()), vec![TimerKind::ComboDecay]);
        assert!(timers.is_empty());
    }

    #[test]
    fn level_never_leaves_its_bounds() {
        let (mut combo, mut timers, clock) = tracker();
        for _ in 0..50 {
            combo.on_hit(&mut timers, clock.now());
            assert!((1..=6).contains(&combo.level()));
        }
        combo.reset(&mut timers);
        assert_eq!(combo.level(), 1);
    }
}
