//! Lock-free snapshot publication
//!
//! Holds a pointer to an immutable value. Readers load it with `Acquire`
//! and never block; a writer swaps in a complete replacement with
//! `AcqRel`, so a reader sees either the old or the new snapshot, never a
//! partially built one. Retired snapshots are freed through crossbeam's
//! epoch GC once no pinned reader can still reference them.

use std::sync::atomic::Ordering;

use crossbeam::epoch::{self, Atomic, Owned};

/// Atomically replaceable immutable value
///
/// Retired snapshots may be dropped by whichever thread next collects the
/// epoch garbage, hence `T: Send + Sync + 'static`.
pub(crate) struct SnapshotCell<T> {
    current: Atomic<T>,
}

impl<T: Send + Sync + 'static> SnapshotCell<T> {
    pub fn new(initial: T) -> Self {
        Self {
            current: Atomic::new(initial),
        }
    }

    /// Run `f` against the most recently published snapshot
    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let guard = epoch::pin();
        let shared = self.current.load(Ordering::Acquire, &guard);

        // SAFETY: the pointer is never null (set in `new`, replaced only by
        // `publish` with another owned value) and a retired snapshot is
        // destroyed only after every guard pinned before its retirement,
        // including `guard`, has been dropped.
        let snapshot = unsafe { shared.deref() };
        f(snapshot)
    }

    /// Replace the current snapshot with `next`
    pub fn publish(&self, next: T) {
        let guard = epoch::pin();
        let previous = self.current.swap(Owned::new(next), Ordering::AcqRel, &guard);

        // SAFETY: `previous` is no longer reachable from `current`; readers
        // that loaded it before the swap are still pinned, so destruction is
        // deferred until their epoch ends.
        unsafe { guard.defer_destroy(previous) };
    }
}

impl<T> Drop for SnapshotCell<T> {
    fn drop(&mut self) {
        // SAFETY: `&mut self` means no reader or writer can touch the cell.
        unsafe {
            let guard = epoch::unprotected();
            let current = self.current.load(Ordering::Relaxed, guard);
            if !current.is_null() {
                drop(current.into_owned());
            }
        }
    }
}

impl<T: std::fmt::Debug + Send + Sync + 'static> std::fmt::Debug for SnapshotCell<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.read(|snapshot| f.debug_tuple("SnapshotCell").field(snapshot).finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_read_after_publish() {
        let cell = SnapshotCell::new(vec![1]);
        assert_eq!(cell.read(|v| v.clone()), vec![1]);

        cell.publish(vec![1, 2]);
        assert_eq!(cell.read(|v| v.len()), 2);
    }

    #[test]
    fn test_drop_frees_current() {
        struct Counted(Arc<AtomicUsize>);
        impl Drop for Counted {
            fn drop(&mut self) {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }

        let drops = Arc::new(AtomicUsize::new(0));
        let cell = SnapshotCell::new(Counted(Arc::clone(&drops)));
        drop(cell);
        assert_eq!(drops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_readers_never_see_partial_snapshot() {
        // Every published vector is internally consistent: all elements equal.
        let cell = Arc::new(SnapshotCell::new(vec![0u64; 64]));

        let writer = {
            let cell = Arc::clone(&cell);
            thread::spawn(move || {
                for generation in 1..=500u64 {
                    cell.publish(vec![generation; 64]);
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let cell = Arc::clone(&cell);
                thread::spawn(move || {
                    let mut last = 0;
                    for _ in 0..2_000 {
                        let (first, uniform) =
                            cell.read(|v| (v[0], v.iter().all(|&x| x == v[0])));
                        assert!(uniform);
                        // Monotonic: a reader never goes back in time
                        assert!(first >= last);
                        last = first;
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
        assert_eq!(cell.read(|v| v[0]), 500);
    }
}
