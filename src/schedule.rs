//! Delayed tasks on the simulation clock
//!
//! Timers are measured in ticks. Starting a new match or leaving to the menu
//! cancels everything queued for the old one.

#[derive(Debug, Clone)]
struct Timer<T> {
    due: u64,
    seq: u64,
    task: T,
}

/// Tick-based timer queue with wholesale cancellation
#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    next_seq: u64,
    pending: Vec<Timer<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            next_seq: 0,
            pending: Vec::new(),
        }
    }

    /// Queue `task` to run `delay` ticks after `now`
    pub fn schedule(&mut self, now: u64, delay: u64, task: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Timer {
            due: now + delay,
            seq,
            task,
        });
    }

    /// Drop every pending task
    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    /// Remove and return tasks due at or before `now`, in due order
    ///
    /// Tasks due on the same tick keep their scheduling order.
    pub fn drain_due(&mut self, now: u64) -> Vec<T> {
        let (mut due, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|t| t.due <= now);
        self.pending = rest;
        due.sort_by_key(|t| (t.due, t.seq));
        due.into_iter().map(|t| t.task).collect()
    }
}
