//! Tests for FairLock
//!
//! These tests verify:
//! - Lock/unlock and ticket numbering
//! - Bounded waits time out while the lock is held
//! - Abandoned tickets are skipped without breaking FIFO order
//! - Waiters are granted the lock in arrival order

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;
use shardkv::partition::FairLock;

// =============================================================================
// Helper Functions
// =============================================================================

/// Spin until `count` writers are queued behind the holder
fn wait_for_queue(lock: &FairLock, count: usize) {
    while lock.queue_len() != count {
        thread::yield_now();
    }
}

// =============================================================================
// Basic Tests
// =============================================================================

#[test]
fn test_lock_unlock() {
    let lock = FairLock::new();
    {
        let guard = lock.lock();
        assert_eq!(guard.ticket(), 0);
        assert!(lock.try_lock_for(Duration::ZERO).is_none());
    }

    // Ticket 1 was abandoned by the zero-length wait
    let guard = lock.try_lock_for(Duration::ZERO).unwrap();
    assert_eq!(guard.ticket(), 2);
}

#[test]
fn test_try_lock_for_times_out_while_held() {
    let lock = FairLock::new();
    let _guard = lock.lock();

    assert!(lock.try_lock_for(Duration::from_millis(20)).is_none());
    assert_eq!(lock.queue_len(), 0);
}

#[test]
fn test_try_lock_for_succeeds_when_released_in_time() {
    let lock = Arc::new(FairLock::new());
    let guard = lock.lock();

    let waiter = {
        let lock = Arc::clone(&lock);
        thread::spawn(move || {
            lock.try_lock_for(Duration::from_secs(5))
                .map(|guard| guard.ticket())
        })
    };
    wait_for_queue(&lock, 1);
    drop(guard);

    assert_eq!(waiter.join().unwrap(), Some(1));
}

// =============================================================================
// Ordering Tests
// =============================================================================

#[test]
fn test_abandoned_ticket_is_skipped() {
    let lock = Arc::new(FairLock::new());
    let guard = lock.lock();

    // Ticket 1 gives up
    assert!(lock.try_lock_for(Duration::from_millis(10)).is_none());

    // Ticket 2 must still get the lock once ticket 0 releases
    let waiter = {
        let lock = Arc::clone(&lock);
        thread::spawn(move || lock.lock().ticket())
    };
    wait_for_queue(&lock, 1);
    drop(guard);

    assert_eq!(waiter.join().unwrap(), 2);
    assert_eq!(lock.queue_len(), 0);
}

#[test]
fn test_grants_in_arrival_order() {
    let lock = Arc::new(FairLock::new());
    let order = Arc::new(Mutex::new(Vec::new()));
    let guard = lock.lock();

    let mut handles = Vec::new();
    for i in 0..8 {
        let lock_clone = Arc::clone(&lock);
        let order = Arc::clone(&order);
        handles.push(thread::spawn(move || {
            let _g = lock_clone.lock();
            order.lock().push(i);
        }));
        // Thread i must draw its ticket before thread i + 1 starts
        wait_for_queue(&lock, i + 1);
    }

    drop(guard);
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(*order.lock(), (0..8).collect::<Vec<_>>());
}
