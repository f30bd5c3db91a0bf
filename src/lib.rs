//! kit is a minimal content-addressed version-control engine.
//!
//! The crate is split into three layers:
//!
//! - `areas`: the places a repository keeps state (object database, index,
//!   refs, workspace, config) plus the `Repository` context tying them together
//! - `artifacts`: the data structures and algorithms those areas exchange
//!   (objects, index entries, revisions, status reports, checkout plans)
//! - `commands`: the porcelain and plumbing operations exposed by the binary

pub mod areas;
pub mod artifacts;
pub mod commands;
