//! Working tree materialization for checkout
//!
//! Checking out a commit flattens its tree into `(path, entry)` pairs and
//! writes every blob into the working directory, creating parent
//! directories and applying the executable bit as each entry's mode
//! dictates. Materialization is additive: files absent from the target
//! tree are left in place and the index is not rewritten.

use crate::areas::repository::Repository;
use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::objects::object_id::ObjectId;
use derive_new::new;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Writes a commit's tree on top of the working directory
#[derive(new)]
pub struct Materializer<'r> {
    repository: &'r Repository,
}

impl Materializer<'_> {
    /// Materializes every file reachable from `commit_oid`'s tree
    pub fn materialize_commit(&self, commit_oid: &ObjectId) -> anyhow::Result<()> {
        let commit = self
            .repository
            .database()
            .parse_object_as_commit(commit_oid)?
            .ok_or_else(|| anyhow::anyhow!("object {} is not a commit", commit_oid))?;

        let mut flat_tree = BTreeMap::new();
        self.repository
            .parse_tree(commit.tree_oid(), None, &mut flat_tree)?;

        for (path, entry) in &flat_tree {
            self.write_entry(path, entry)?;
        }

        Ok(())
    }

    fn write_entry(&self, path: &Path, entry: &DatabaseEntry) -> anyhow::Result<()> {
        let blob = self
            .repository
            .database()
            .parse_object_as_blob(&entry.oid)?
            .ok_or_else(|| anyhow::anyhow!("object {} is not a blob", entry.oid))?;

        self.repository
            .workspace()
            .write_file(path, blob.content(), &entry.mode)
    }
}
