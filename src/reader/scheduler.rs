//! Superseding deferred tasks
//!
//! A [`DeferredTask`] holds at most one pending payload with a deadline.
//! Scheduling again replaces the pending payload and pushes the deadline out,
//! so a burst of triggers collapses into one run of the latest one. Every
//! schedule bumps a generation counter, returned to the caller.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct Pending<T> {
    deadline: Instant,
    generation: u64,
    payload: T,
}

/// Cancellable, debounced task slot driven by an external clock
#[derive(Debug, Clone)]
pub struct DeferredTask<T> {
    delay: Duration,
    generation: u64,
    pending: Option<Pending<T>>,
}

impl<T> DeferredTask<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: 0,
            pending: None,
        }
    }

    /// Schedule `payload` to run `delay` after `now`, superseding anything
    /// still pending. Returns the generation of the new task.
    pub fn schedule(&mut self, now: Instant, payload: T) -> u64 {
        self.generation += 1;
        self.pending = Some(Pending {
            deadline: now + self.delay,
            generation: self.generation,
            payload,
        });
        self.generation
    }

    /// Drop the pending task, if any
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    /// Take the payload if its deadline has passed
    pub fn take_ready(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some(pending) if pending.deadline <= now => {
                self.pending.take().map(|p| {
                    debug_assert_eq!(p.generation, self.generation);
                    p.payload
                })
            }
            _ => None,
        }
    }
}
