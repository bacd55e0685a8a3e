//! Scheduling contract between the engine and whatever keeps time.
//!
//! The engine never sleeps and never owns a timer. Each step returns a
//! [`Continuation`]: "call `step(ticket)` again after `delay`". A restart
//! issues a new [`Ticket`], so continuations still pending from the previous
//! target are recognized and ignored when they fire; nothing has to be
//! cancelled.
//!
//! [`TimerQueue`] holds pending continuations against a clock measured as a
//! `Duration` since start. Tests drive it with [`TimerQueue::advance`] (virtual
//! time); the terminal shell feeds it wall-clock time with
//! [`TimerQueue::set_now`].

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::time::Duration;

/// Generation token identifying the timeline a continuation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn from_generation(generation: u64) -> Self {
        Self(generation)
    }

    pub fn generation(self) -> u64 {
        self.0
    }
}

/// Request to run the next step after `delay`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Continuation {
    pub delay: Duration,
    pub ticket: Ticket,
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Entry {
    due: Duration,
    seq: u64,
    ticket: Ticket,
}

/// Pending continuations ordered by due time, FIFO among equal due times.
#[derive(Debug, Default)]
pub struct TimerQueue {
    now: Duration,
    seq: u64,
    pending: BinaryHeap<Reverse<Entry>>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    /// Move the clock forward. The clock never runs backwards.
    pub fn set_now(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    pub fn schedule(&mut self, continuation: Continuation) {
        let due = self.now.saturating_add(continuation.delay);
        self.pending.push(Reverse(Entry {
            due,
            seq: self.seq,
            ticket: continuation.ticket,
        }));
        self.seq += 1;
    }

    /// Time left until the earliest pending continuation is due.
    pub fn time_until_next(&self) -> Option<Duration> {
        self.pending
            .peek()
            .map(|Reverse(entry)| entry.due.saturating_sub(self.now))
    }

    /// Pop the earliest continuation if it is due at the current time.
    pub fn pop_expired(&mut self) -> Option<Ticket> {
        let due = self.pending.peek().map(|Reverse(entry)| entry.due)?;
        if due > self.now {
            return None;
        }
        self.pending.pop().map(|Reverse(entry)| entry.ticket)
    }

    /// Jump the clock to the earliest due continuation and pop it.
    pub fn advance(&mut self) -> Option<Ticket> {
        let Reverse(entry) = self.pending.pop()?;
        self.now = self.now.max(entry.due);
        Some(entry.ticket)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
