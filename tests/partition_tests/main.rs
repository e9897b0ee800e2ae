//! Partition-level tests

mod fair_lock_tests;
