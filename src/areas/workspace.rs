use crate::artifacts::index::entry_mode::{EntryMode, FileMode};
use crate::artifacts::objects::blob::Blob;
use anyhow::Context;
use is_executable::IsExecutable;
use std::io::Write;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const IGNORED_PATHS: [&str; 3] = [".kit", ".", ".."];

#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read a working directory file into a blob, capturing its mode.
    pub fn parse_blob(&self, path: &Path) -> anyhow::Result<Blob> {
        let data = self.read_file(path)?;
        let mode = self.file_mode(path)?;

        Ok(Blob::new(data, mode))
    }

    // TODO: refactor to use iterator
    pub fn list_files(&self, root_file_path: Option<PathBuf>) -> anyhow::Result<Vec<PathBuf>> {
        let root_file_path = match root_file_path {
            Some(p) => std::fs::canonicalize(p)?,
            None => self.path.clone().into(),
        };

        // Check if the root_file_path exists
        if !root_file_path.exists() {
            anyhow::bail!("The specified path does not exist: {:?}", root_file_path);
        }

        if root_file_path.is_dir() {
            Ok(WalkDir::new(&root_file_path)
                .into_iter()
                .filter_map(|entry| entry.ok())
                .filter_map(|entry| self.check_if_not_ignored_file_path(entry.path()))
                .collect::<Vec<_>>())
        } else {
            Ok(vec![
                root_file_path
                    .strip_prefix(self.path.as_ref())
                    .map(PathBuf::from)
                    .unwrap_or_default(),
            ])
        }
    }

    pub fn file_exists(&self, file_path: &Path) -> bool {
        self.path.join(file_path).is_file()
    }

    /// Check whether a path (absolute or CWD-relative) lies inside the
    /// workspace, ignoring whether it exists on disk.
    pub fn contains(&self, file_path: &Path) -> bool {
        let absolute = if file_path.is_absolute() {
            file_path.to_path_buf()
        } else {
            match std::env::current_dir() {
                Ok(cwd) => cwd.join(file_path),
                Err(_) => return false,
            }
        };

        // Normalize away `.` and `..` components without touching the disk
        let mut normalized = PathBuf::new();
        for component in absolute.components() {
            match component {
                std::path::Component::CurDir => {}
                std::path::Component::ParentDir => {
                    normalized.pop();
                }
                other => normalized.push(other),
            }
        }

        normalized.starts_with(self.path.as_ref())
    }

    /// Check whether a path points inside the metadata directory.
    pub fn is_metadata_path(&self, file_path: &Path) -> bool {
        Self::is_ignored(file_path)
    }

    fn is_ignored(path: &Path) -> bool {
        // Check if any component of the path is in IGNORED_PATHS
        path.components().any(|component| {
            if let std::path::Component::Normal(name) = component {
                let name_str = name.to_string_lossy();
                IGNORED_PATHS.contains(&name_str.as_ref())
            } else {
                false
            }
        })
    }

    fn check_if_not_ignored_file_path(&self, path: &Path) -> Option<PathBuf> {
        if path.is_file() && !Self::is_ignored(path) {
            Some(path.strip_prefix(self.path.as_ref()).ok()?.to_path_buf())
        } else {
            None
        }
    }

    pub fn read_file(&self, file_path: &Path) -> anyhow::Result<String> {
        let file_path = self.path.join(file_path);

        let content = std::fs::read_to_string(file_path)?;

        Ok(content)
    }

    pub fn file_mode(&self, file_path: &Path) -> anyhow::Result<FileMode> {
        let path = self.path.join(file_path);

        if !path.exists() {
            anyhow::bail!("The specified path does not exist: {:?}", path);
        }

        Ok(match path.is_executable() {
            true => FileMode::Executable,
            false => FileMode::Regular,
        })
    }

    /// Write blob content to a working directory file, creating parent
    /// directories as needed and applying the recorded mode.
    pub fn write_file(&self, file_path: &Path, data: &str, mode: &EntryMode) -> anyhow::Result<()> {
        let path = self.path.join(file_path);

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .with_context(|| format!("Failed to open file: {:?}", file_path))?;

        file.write_all(data.as_bytes())
            .with_context(|| format!("Failed to write to file: {:?}", file_path))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(mode.as_u32());
            std::fs::set_permissions(&path, permissions)
                .with_context(|| format!("Failed to set permissions for file: {:?}", file_path))?;
        }

        Ok(())
    }
}
