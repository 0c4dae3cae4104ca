//! Timed event queue for deferred animation sequences.
//!
//! Events are stamped on the owning game's simulation clock, which only moves
//! when the game ticks. A paused game therefore freezes every pending
//! sequence: nothing fires while paused and nothing fires early on resume.
//! `cancel_all` drops whatever is still pending.

#[derive(Debug, Clone)]
struct Scheduled<E> {
    due_ms: u64,
    seq: u64,
    event: E,
}

/// A queue of events due at fixed offsets on a game clock.
#[derive(Debug, Clone)]
pub struct Timeline<E> {
    /// Base time for new schedules. Trails `horizon_ms` while due events are
    /// being drained so that chained follow-ups are relative to their parent.
    cursor_ms: u64,
    /// How far the clock has been advanced.
    horizon_ms: u64,
    next_seq: u64,
    pending: Vec<Scheduled<E>>,
}

impl<E> Default for Timeline<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Timeline<E> {
    pub fn new() -> Self {
        Self {
            cursor_ms: 0,
            horizon_ms: 0,
            next_seq: 0,
            pending: Vec::new(),
        }
    }

    /// Current clock reading used for scheduling.
    pub fn now_ms(&self) -> u64 {
        self.cursor_ms
    }

    /// Queue `event` to fire `delay_ms` after the current clock reading.
    pub fn schedule(&mut self, delay_ms: u64, event: E) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Scheduled {
            due_ms: self.cursor_ms + delay_ms,
            seq,
            event,
        });
    }

    /// Move the clock forward. Due events are collected with `pop_due`.
    pub fn advance(&mut self, dt_ms: u64) {
        self.horizon_ms += dt_ms;
    }

    /// Pop the earliest event that is due, in (due time, schedule order).
    ///
    /// Returns `None` once nothing else is due, at which point the scheduling
    /// cursor catches up with the clock.
    pub fn pop_due(&mut self) -> Option<E> {
        let horizon = self.horizon_ms;
        let next = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, s)| s.due_ms <= horizon)
            .min_by_key(|(_, s)| (s.due_ms, s.seq))
            .map(|(i, _)| i);

        match next {
            Some(index) => {
                let scheduled = self.pending.swap_remove(index);
                self.cursor_ms = scheduled.due_ms;
                Some(scheduled.event)
            }
            None => {
                self.cursor_ms = horizon;
                None
            }
        }
    }

    /// Drop every pending event. Returns how many were dropped.
    pub fn cancel_all(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        dropped
    }

    /// True when no event is pending.
    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}
