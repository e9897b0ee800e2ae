//! Storage-level tests

mod file_tests;
