//! Shared utilities.
//!
//! Filesystem helpers and test fixtures.

pub mod fs;

#[cfg(test)]
pub mod testutil;
