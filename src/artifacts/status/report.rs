use crate::areas::index::Index;
use crate::areas::repository::Repository;
use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::status::file_change::{
    FileChange, FileChangeType, IndexChangeType, WorkspaceChangeType,
};
use crate::artifacts::status::inspector::Inspector;
use derive_new::new;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

pub type ChangeSet = BTreeMap<PathBuf, FileChangeType>;
pub type FileSet = BTreeSet<PathBuf>;
pub type HeadTree = BTreeMap<PathBuf, DatabaseEntry>;

/// The full result of a status run
///
/// `changed_files` holds both comparison columns per path; the two changesets
/// project it onto the index side and the workspace side for sectioned
/// display.
#[derive(Debug, Clone)]
pub struct StatusReport {
    pub(crate) untracked_files: FileSet,
    pub(crate) changed_files: BTreeMap<PathBuf, FileChange>,
    pub(crate) workspace_changeset: ChangeSet,
    pub(crate) index_changeset: ChangeSet,
}

impl StatusReport {
    pub fn is_clean(&self) -> bool {
        self.untracked_files.is_empty() && self.changed_files.is_empty()
    }
}

#[derive(new)]
pub struct Status<'r> {
    repository: &'r Repository,
}

impl<'r> Status<'r> {
    pub fn initialize(&self, index: &Index) -> anyhow::Result<StatusReport> {
        let inspector = Inspector::new(self.repository);

        let untracked_files = self.scan_workspace(index)?;
        let head_tree = self.load_head_tree()?;
        let mut changed_files = self.check_index_entries(&head_tree, index, &inspector)?;
        self.collect_deleted_head_files(&head_tree, index, &mut changed_files);

        let workspace_changeset = changed_files
            .iter()
            .filter(|(_, change)| change.workspace_change != WorkspaceChangeType::None)
            .map(|(file, change)| {
                (
                    file.clone(),
                    FileChangeType::Workspace(change.workspace_change.clone()),
                )
            })
            .collect::<BTreeMap<_, _>>();
        let index_changeset = changed_files
            .iter()
            .filter(|(_, change)| change.index_change != IndexChangeType::None)
            .map(|(file, change)| {
                (
                    file.clone(),
                    FileChangeType::Index(change.index_change.clone()),
                )
            })
            .collect::<BTreeMap<_, _>>();

        Ok(StatusReport {
            untracked_files,
            changed_files,
            workspace_changeset,
            index_changeset,
        })
    }

    /// Workspace files with no index entry are untracked
    ///
    /// Untracked files are reported per file rather than collapsed to their
    /// closest untracked directory.
    fn scan_workspace(&self, index: &Index) -> anyhow::Result<FileSet> {
        let files = self.repository.workspace().list_files(None)?;

        Ok(files
            .into_iter()
            .filter(|path| index.entry_by_path(path).is_none())
            .collect())
    }

    /// Flatten the HEAD commit's tree, if there is a HEAD commit
    fn load_head_tree(&self) -> anyhow::Result<HeadTree> {
        let mut head_tree = HeadTree::new();

        if let Some(head_ref) = self.repository.refs().read_head()? {
            let commit = self
                .repository
                .database()
                .parse_object_as_commit(&head_ref)?;

            if let Some(commit) = commit {
                self.repository
                    .parse_tree(commit.tree_oid(), None, &mut head_tree)?;
            }
        }

        Ok(head_tree)
    }

    fn check_index_entries(
        &self,
        head_tree: &HeadTree,
        index: &Index,
        inspector: &Inspector<'_>,
    ) -> anyhow::Result<BTreeMap<PathBuf, FileChange>> {
        let mut changed_files = BTreeMap::<PathBuf, FileChange>::new();

        for entry in index.entries() {
            self.check_index_entry_against_workspace(entry, inspector, &mut changed_files)?;
            self.check_index_entry_against_head_tree(
                entry,
                head_tree,
                inspector,
                &mut changed_files,
            )?;
        }

        Ok(changed_files)
    }

    fn check_index_entry_against_workspace(
        &self,
        index_entry: &IndexEntry,
        inspector: &Inspector<'_>,
        changed_files: &mut BTreeMap<PathBuf, FileChange>,
    ) -> anyhow::Result<()> {
        let status = inspector.check_index_against_workspace(index_entry)?;

        if status != WorkspaceChangeType::None {
            self.record_workspace_change(index_entry.name.clone(), status, changed_files);
        }

        Ok(())
    }

    fn record_workspace_change(
        &self,
        entry_path: PathBuf,
        change: WorkspaceChangeType,
        changed_files: &mut BTreeMap<PathBuf, FileChange>,
    ) {
        changed_files
            .entry(entry_path)
            .or_default()
            .workspace_change = change;
    }

    fn check_index_entry_against_head_tree(
        &self,
        index_entry: &IndexEntry,
        head_tree: &HeadTree,
        inspector: &Inspector<'_>,
        changed_files: &mut BTreeMap<PathBuf, FileChange>,
    ) -> anyhow::Result<()> {
        let head_entry = head_tree.get(&index_entry.name);
        let status = inspector.check_index_against_head_tree(Some(index_entry), head_entry);

        if status != IndexChangeType::None {
            self.record_index_change(index_entry.name.clone(), status, changed_files);
        }

        Ok(())
    }

    fn record_index_change(
        &self,
        entry_path: PathBuf,
        change: IndexChangeType,
        changed_files: &mut BTreeMap<PathBuf, FileChange>,
    ) {
        changed_files.entry(entry_path).or_default().index_change = change;
    }

    /// HEAD tree paths missing from the index show up as staged deletions
    fn collect_deleted_head_files(
        &self,
        head_tree: &HeadTree,
        index: &Index,
        changed_files: &mut BTreeMap<PathBuf, FileChange>,
    ) {
        head_tree.iter().for_each(|(path, _)| {
            if index.entry_by_path(path).is_none() {
                changed_files.entry(path.clone()).or_default().index_change =
                    IndexChangeType::Deleted;
            }
        });
    }
}
