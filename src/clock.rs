use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Source of monotonic time for the engine
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Production clock backed by `Instant::now`
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Advanceable clock for tests. Clones share the same underlying time,
/// so a test can keep a handle while the engine owns its own copy.
#[derive(Clone, Debug)]
pub struct ManualClock {
    current: Rc<Cell<Instant>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            current: Rc::new(Cell::new(Instant::now())),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.current.set(self.current.get() + by);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.current.get()
    }
}

/// Handle to an armed timer; cancelling an already-fired handle is a no-op
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerId(u64);

#[derive(Clone, Copy, Debug)]
enum Repeat {
    Once,
    Every(Duration),
}

#[derive(Debug)]
struct Entry<T> {
    id: TimerId,
    deadline: Instant,
    repeat: Repeat,
    kind: T,
}

/// Cooperative timer scheduler. Nothing fires on its own: the owner calls
/// `poll` and dispatches the returned kinds itself, so callbacks are
/// serialized with every other mutation of the session state.
#[derive(Debug)]
pub struct Timers<T> {
    entries: Vec<Entry<T>>,
    next_id: u64,
}

impl<T: Copy> Timers<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }

    fn arm(&mut self, deadline: Instant, repeat: Repeat, kind: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            deadline,
            repeat,
            kind,
        });
        id
    }

    /// Single-shot timer due at `now + delay`
    pub fn after(&mut self, now: Instant, delay: Duration, kind: T) -> TimerId {
        self.arm(now + delay, Repeat::Once, kind)
    }

    /// Repeating timer, first due at `now + interval`
    pub fn every(&mut self, now: Instant, interval: Duration, kind: T) -> TimerId {
        self.arm(now + interval, Repeat::Every(interval), kind)
    }

    pub fn cancel(&mut self, id: TimerId) {
        self.entries.retain(|e| e.id != id);
    }

    pub fn cancel_all(&mut self) {
        self.entries.clear();
    }

    /// Change the interval of a repeating timer without re-starting its
    /// elapsed time: the pending deadline is kept unless `now + interval`
    /// comes sooner. Never causes a double fire.
    pub fn retime(&mut self, id: TimerId, now: Instant, interval: Duration) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.id == id) {
            entry.repeat = Repeat::Every(interval);
            entry.deadline = entry.deadline.min(now + interval);
        }
    }

    /// Pop every timer due at or before `now`, ordered by deadline.
    /// A repeating timer fires at most once per poll; if it has fallen
    /// behind it skips ahead to `now + interval` instead of bursting.
    pub fn poll(&mut self, now: Instant) -> Vec<T> {
        let mut due: Vec<(Instant, T)> = Vec::new();
        let mut i = 0;
        while i < self.entries.len() {
            if self.entries[i].deadline > now {
                i += 1;
                continue;
            }
            match self.entries[i].repeat {
                Repeat::Once => {
                    let entry = self.entries.remove(i);
                    due.push((entry.deadline, entry.kind));
                }
                Repeat::Every(interval) => {
                    let entry = &mut self.entries[i];
                    due.push((entry.deadline, entry.kind));
                    entry.deadline += interval;
                    if entry.deadline <= now {
                        entry.deadline = now + interval;
                    }
                    i += 1;
                }
            }
        }
        due.sort_by_key(|(deadline, _)| *deadline);
        due.into_iter().map(|(_, kind)| kind).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: Copy> Default for Timers<T> {
    fn default() -> Self {
        Self::new()
    }
}
