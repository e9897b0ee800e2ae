//! Fair (FIFO) mutual exclusion
//!
//! A ticket lock: every writer draws a ticket on arrival and the lock is
//! granted strictly in ticket order, so no waiter can be overtaken by a
//! later arrival.

use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

/// Ticket-ordered mutex guarding nothing but the critical section itself
#[derive(Debug, Default)]
pub struct FairLock {
    state: Mutex<TicketState>,
    turn: Condvar,
}

#[derive(Debug, Default)]
struct TicketState {
    /// Ticket handed to the next arrival
    next_ticket: u64,

    /// Ticket currently allowed into the critical section
    now_serving: u64,

    /// Tickets whose owners gave up waiting; skipped on release
    abandoned: BTreeSet<u64>,
}

impl TicketState {
    /// Hand the lock to the next ticket still waiting for it
    fn advance(&mut self) {
        self.now_serving += 1;
        while self.abandoned.remove(&self.now_serving) {
            self.now_serving += 1;
        }
    }
}

/// Releases the lock on drop
#[must_use = "the lock is released as soon as the guard is dropped"]
#[derive(Debug)]
pub struct FairLockGuard<'a> {
    lock: &'a FairLock,
    ticket: u64,
}

impl FairLockGuard<'_> {
    /// Position of this holder in the global arrival order
    pub fn ticket(&self) -> u64 {
        self.ticket
    }
}

impl Drop for FairLockGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.lock.state.lock();
        debug_assert_eq!(state.now_serving, self.ticket);
        state.advance();
        drop(state);
        self.lock.turn.notify_all();
    }
}

impl FairLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Block until every earlier arrival has been served, then enter
    pub fn lock(&self) -> FairLockGuard<'_> {
        let mut state = self.state.lock();
        let ticket = state.next_ticket;
        state.next_ticket += 1;

        while state.now_serving != ticket {
            self.turn.wait(&mut state);
        }

        tracing::trace!(ticket, "fair lock acquired");
        FairLockGuard { lock: self, ticket }
    }

    /// Like `lock`, but give up after `timeout`.
    ///
    /// An expired ticket is abandoned; the waiters behind it keep their order.
    pub fn try_lock_for(&self, timeout: Duration) -> Option<FairLockGuard<'_>> {
        let deadline = Instant::now() + timeout;
        let mut state = self.state.lock();
        let ticket = state.next_ticket;
        state.next_ticket += 1;

        while state.now_serving != ticket {
            if self.turn.wait_until(&mut state, deadline).timed_out() {
                if state.now_serving == ticket {
                    break;
                }
                state.abandoned.insert(ticket);
                tracing::trace!(ticket, "fair lock wait abandoned");
                return None;
            }
        }

        tracing::trace!(ticket, "fair lock acquired");
        Some(FairLockGuard { lock: self, ticket })
    }

    /// Number of writers blocked behind the current holder
    pub fn queue_len(&self) -> usize {
        let state = self.state.lock();
        if state.next_ticket == state.now_serving {
            return 0;
        }
        let pending = state.next_ticket - state.now_serving - 1;
        pending as usize - state.abandoned.len()
    }
}
