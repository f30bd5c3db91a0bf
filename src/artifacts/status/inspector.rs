use crate::areas::repository::Repository;
use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::index::entry_mode::EntryMode;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::object::Object;
use crate::artifacts::status::file_change::{IndexChangeType, WorkspaceChangeType};
use derive_new::new;

/// Decides the change type for a single tracked path
///
/// The index stores no filesystem metadata, so the workspace comparison
/// always re-reads and re-hashes the file on disk.
#[derive(new)]
pub struct Inspector<'r> {
    repository: &'r Repository,
}

impl<'r> Inspector<'r> {
    /// Compare an index entry against the file currently on disk
    pub fn check_index_against_workspace(
        &self,
        entry: &IndexEntry,
    ) -> anyhow::Result<WorkspaceChangeType> {
        if !self.repository.workspace().file_exists(&entry.name) {
            return Ok(WorkspaceChangeType::Deleted);
        }

        if self.is_content_changed(entry)? {
            Ok(WorkspaceChangeType::Modified)
        } else {
            Ok(WorkspaceChangeType::None)
        }
    }

    /// A file counts as changed when its content hash or its mode differs
    fn is_content_changed(&self, index_entry: &IndexEntry) -> anyhow::Result<bool> {
        let blob = self.repository.workspace().parse_blob(&index_entry.name)?;
        let oid = blob.object_id()?;
        let mode = EntryMode::from(blob.mode().clone());

        Ok(oid != index_entry.oid || mode != index_entry.mode)
    }

    /// Compare an index entry against the HEAD tree entry for the same path
    pub fn check_index_against_head_tree(
        &self,
        index_entry: Option<&IndexEntry>,
        head_entry: Option<&DatabaseEntry>,
    ) -> IndexChangeType {
        match (index_entry, head_entry) {
            (Some(index_entry), Some(head_entry))
                if head_entry.mode != index_entry.mode || head_entry.oid != index_entry.oid =>
            {
                IndexChangeType::Modified
            }
            (Some(_), None) => IndexChangeType::Added,
            (None, Some(_)) => IndexChangeType::Deleted,
            _ => IndexChangeType::None,
        }
    }
}
