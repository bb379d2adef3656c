//! Virt Profiles: preset merging for virtual machine domain specifications
//!
//! A virt profile is a set of changes to be performed on a given representation
//! of a virtual machine. Named presets are merged into a base domain
//! specification under per-field policies (union, max, first-wins), with
//! conflicts detected pairwise up front and surfaced as warnings or hard
//! errors depending on policy.

pub mod catalogue;
pub mod config;
pub mod error;
pub mod logging;
pub mod merge;
pub mod server;
pub mod types;
