//! Versions manifest types.
//!
//! The manifest is the published catalog of prebuilt archives, one entry per
//! Boost version, each listing the files built for that version.

mod types;

pub use types::*;
