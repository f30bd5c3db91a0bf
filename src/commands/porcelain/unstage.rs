use crate::areas::repository::Repository;
use crate::artifacts::errors::KitError;
use std::path::{Component, Path, PathBuf};

impl Repository {
    pub fn unstage(&self, path: &str) -> anyhow::Result<()> {
        let raw_path = Path::new(path);

        if !self.workspace().contains(raw_path) {
            anyhow::bail!(KitError::PathspecOutsideRepository {
                path: path.to_string(),
            });
        }

        let mut index = self.index();
        index.rehydrate()?;

        // The file may already be gone from the workspace; resolve the
        // argument to an index key without touching the disk
        let relative = self.relative_index_key(raw_path);

        if index.entry_by_path(&relative).is_none() {
            anyhow::bail!(KitError::PathspecNotMatched {
                path: path.to_string(),
            });
        }

        index.remove(relative)?;
        index.write_updates()?;

        Ok(())
    }

    fn relative_index_key(&self, path: &Path) -> PathBuf {
        let stripped = path
            .strip_prefix(self.workspace().path())
            .unwrap_or(path)
            .to_path_buf();

        stripped
            .components()
            .filter(|component| !matches!(component, Component::CurDir))
            .collect()
    }
}
