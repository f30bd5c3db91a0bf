//! Working tree status inspection
//!
//! Status compares three snapshots of the project:
//!
//! - the HEAD commit tree (last committed state)
//! - the index (staged state)
//! - the workspace (files on disk)
//!
//! Index-vs-HEAD differences are "changes to be committed", index-vs-workspace
//! differences are "changes not staged for commit", and workspace files absent
//! from the index are untracked. Since index entries carry no filesystem
//! metadata, workspace comparison re-hashes file content on every run.

pub mod file_change;
pub mod inspector;
pub mod report;
