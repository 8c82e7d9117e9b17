//! boostup-lib: resolve, download and install prebuilt Boost archives.
//!
//! This crate provides the pieces behind the `boostup` command:
//! - `Manifest`: the published list of prebuilt archives per version
//! - `resolve`: picks exactly one archive for the caller's selection
//! - `install`: the fetch, extract, clean up and cache pipeline
//! - `DirCache`: a directory-backed cache of finished installs

pub mod cache;
pub mod config;
pub mod consts;
pub mod extract;
pub mod fetch;
pub mod install;
pub mod manifest;
pub mod outputs;
pub mod platform;
pub mod resolve;
pub mod util;
