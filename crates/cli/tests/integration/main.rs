//! Integration tests for the boostup CLI.
//!
//! Every test runs the real binary against a local mock server that serves
//! the manifest and the archives.

mod common;
mod install_tests;
mod resolve_tests;
