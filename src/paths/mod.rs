//! Site paths and cross-reference links.

pub mod constants;
mod provider;

pub use constants::*;
pub use provider::{any_sid, join_paths, Link, PathProvider};
