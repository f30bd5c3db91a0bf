use crate::areas::repository::Repository;
use crate::artifacts::errors::KitError;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::object::Object;
use std::path::Path;

impl Repository {
    pub fn add(&self, paths: &[String]) -> anyhow::Result<()> {
        let mut index = self.index();

        // Load the index file from the disk
        index.rehydrate()?;

        // Expand each provided path, rejecting the ones the workspace does
        // not cover; directories expand to every file they contain
        let mut expanded = Vec::new();
        for path in paths {
            let path = Path::new(path);

            if !path.exists() {
                anyhow::bail!(KitError::PathspecNotMatched {
                    path: path.display().to_string(),
                });
            }

            if !self.workspace().contains(path) {
                anyhow::bail!(KitError::PathspecOutsideRepository {
                    path: path.display().to_string(),
                });
            }

            // paths inside the metadata directory are silently skipped
            if self.workspace().is_metadata_path(path) {
                continue;
            }

            expanded.extend(self.workspace().list_files(Some(path.to_path_buf()))?);
        }

        for path in expanded {
            let blob = self.workspace().parse_blob(&path)?;
            let blob_oid = blob.object_id()?;
            let mode = blob.mode().clone().into();

            self.database().store(blob)?;
            index.add(IndexEntry::new(path, blob_oid, mode))?;
        }

        index.write_updates()?;

        Ok(())
    }
}
