//! The staging area
//!
//! The index tracks which files should be included in the next commit. Each
//! entry binds a path to the blob written for it by `add` plus its file mode.
//!
//! ## Index File Format
//!
//! The index file contains:
//! - Header: Signature, version, and entry count
//! - Entries: Sorted list of tracked files
//! - Checksum: SHA-1 hash of the entire index for integrity verification
//!
//! ## Data Structures
//!
//! - `entries`: Maps file paths to their index entries
//! - `children`: Maps directory paths to their children, used to evict
//!   entries that conflict with a newly added path

use crate::artifacts::index::checksum::Checksum;
use crate::artifacts::index::index_entry::{ENTRY_BLOCK, ENTRY_MIN_SIZE, IndexEntry};
use crate::artifacts::index::index_header::IndexHeader;
use crate::artifacts::index::{HEADER_SIZE, SIGNATURE, VERSION};
use crate::artifacts::objects::object::{Packable, Unpackable};
use anyhow::{Context, anyhow};
use bytes::Bytes;
use fake::rand;
use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;
use std::path::{Path, PathBuf};

/// The staging area
///
/// Tracks files staged for the next commit. The index is persisted to disk
/// as a whole-file replacement and uses a trailing checksum for integrity
/// verification.
#[derive(Debug, Clone)]
pub struct Index {
    /// Path to the index file (typically `.kit/index`)
    path: Box<Path>,
    /// Tracked files mapped by path
    entries: BTreeMap<Box<Path>, IndexEntry>,
    /// Directory hierarchy for efficient parent-child lookups
    children: BTreeMap<Box<Path>, BTreeSet<Box<Path>>>,
    /// Index file header metadata
    header: IndexHeader,
    /// Flag indicating if the index has been modified since loading
    changed: bool,
}

impl Index {
    /// Create a new empty index
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the index file (typically `.kit/index`)
    pub fn new(path: Box<Path>) -> Self {
        Index {
            path,
            entries: BTreeMap::new(),
            children: BTreeMap::new(),
            header: IndexHeader::new(String::from(SIGNATURE), VERSION, 0),
            changed: false,
        }
    }

    /// Get the path to the index file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Look up an entry by its path
    pub fn entry_by_path(&self, path: &Path) -> Option<&IndexEntry> {
        self.entries.get(path)
    }

    /// Clear all entries from the index
    fn clear(&mut self) {
        self.entries.clear();
        self.children.clear();
        self.header = IndexHeader::empty();
        self.changed = false;
    }

    /// Load the index from disk
    ///
    /// Reads the index file, parses the header and entries, and verifies
    /// the checksum. If the file doesn't exist or is empty, the index
    /// is cleared.
    pub fn rehydrate(&mut self) -> anyhow::Result<()> {
        if !self.path().exists() {
            self.clear();
            // create the index file
            std::fs::File::create(self.path())?;
        }

        let index_file = std::fs::OpenOptions::new().read(true).open(self.path())?;

        self.clear();

        // if the index file is empty, return early
        if index_file.metadata()?.len() == 0 {
            return Ok(());
        }

        let mut reader = Checksum::new(index_file);
        let entries_count = self.parse_header(&mut reader)?;
        self.parse_entries(entries_count, &mut reader)?;

        reader.verify()
    }

    fn parse_header<F: Read>(&self, reader: &mut Checksum<F>) -> anyhow::Result<u32> {
        let header_bytes = reader.read(HEADER_SIZE)?;
        let header_reader = std::io::Cursor::new(header_bytes.clone());
        let header = IndexHeader::deserialize(header_reader)?;

        if header.marker != SIGNATURE {
            return Err(anyhow!("Invalid index file signature"));
        }

        if header.version != VERSION {
            return Err(anyhow!(
                "Unsupported index file version: {}",
                header.version
            ));
        }

        Ok(header.entries_count)
    }

    /// Parse all entries from the index file
    ///
    /// Reads each entry, handling variable-length paths with 8-byte alignment.
    fn parse_entries<F: Read>(
        &mut self,
        entries_count: u32,
        reader: &mut Checksum<F>,
    ) -> anyhow::Result<()> {
        for _ in 0..entries_count {
            let entry_bytes = reader.read(ENTRY_MIN_SIZE)?;
            let mut entry_bytes = entry_bytes.to_vec();

            while entry_bytes[entry_bytes.len() - 1] != 0 {
                entry_bytes = [entry_bytes, reader.read(ENTRY_BLOCK)?.to_vec()].concat();
            }

            let entry_bytes = Bytes::from(entry_bytes);
            let entry_reader = std::io::Cursor::new(entry_bytes.clone());
            let entry = IndexEntry::deserialize(entry_reader)?;

            self.store_entry(&entry)?;
        }

        self.header.entries_count = entries_count;

        Ok(())
    }

    /// Remove any conflicting entries before adding a new entry
    ///
    /// Removes parent directories that might be file entries, and
    /// removes any children entries if this entry is becoming a file.
    fn discard_conflicts(&mut self, entry: &IndexEntry) -> anyhow::Result<()> {
        entry
            .parent_dirs()?
            .into_iter()
            .map(|parent| self.remove_entry(parent))
            .collect::<Result<Vec<_>, _>>()?;
        self.remove_children(&entry.name)
    }

    fn store_entry(&mut self, entry: &IndexEntry) -> anyhow::Result<()> {
        let entry_parents = entry
            .parent_dirs()?
            .into_iter()
            .map(|parent| parent.to_owned().into_boxed_path())
            .collect::<BTreeSet<_>>();

        self.entries
            .insert(entry.name.clone().into_boxed_path(), entry.clone());

        for parent in entry_parents {
            self.children
                .entry(parent.clone())
                .or_default()
                .insert(entry.name.clone().into_boxed_path());
        }

        Ok(())
    }

    fn remove_children(&mut self, path_name: &Path) -> anyhow::Result<()> {
        if let Some(children) = self.children.remove(path_name) {
            for child in children {
                self.remove_entry(&child)?;
            }
        }

        Ok(())
    }

    fn remove_entry(&mut self, path_name: &Path) -> anyhow::Result<()> {
        match self.entries.remove(path_name) {
            None => Ok(()),
            Some(entry) => {
                entry
                    .parent_dirs()?
                    .into_iter()
                    .map(|parent| parent.to_owned().into_boxed_path())
                    .for_each(|parent| {
                        if let Some(children) = self.children.get_mut(&parent) {
                            children.remove(path_name);
                            if children.is_empty() {
                                self.children.remove(&parent);
                            }
                        }
                    });

                Ok(())
            }
        }
    }

    pub fn add(&mut self, entry: IndexEntry) -> anyhow::Result<()> {
        self.discard_conflicts(&entry)?;
        self.store_entry(&entry)?;

        self.header.entries_count = self.entries.len() as u32;
        self.changed = true;

        Ok(())
    }

    pub fn remove(&mut self, path: PathBuf) -> anyhow::Result<()> {
        self.remove_entry(&path)?;
        self.remove_children(&path)?;

        self.header.entries_count = self.entries.len() as u32;
        self.changed = true;

        Ok(())
    }

    /// Persist the index as a whole-file replacement
    ///
    /// Entries are written to a temporary file next to the index, then
    /// renamed over it so readers never observe a torn index.
    pub fn write_updates(&mut self) -> anyhow::Result<()> {
        if !self.changed {
            return Ok(());
        }

        let index_dir = self
            .path
            .parent()
            .context("Invalid index file path")?
            .to_path_buf();
        let temp_index_path = index_dir.join(Self::generate_temp_name());

        let mut index_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_index_path)
            .with_context(|| {
                format!("Unable to open index file {}", temp_index_path.display())
            })?;

        let mut writer = Checksum::new(&mut index_file);

        self.header = IndexHeader {
            entries_count: self.entries.len() as u32,
            ..self.header.clone()
        };
        let header_bytes = self.header.serialize()?;
        writer.write(&header_bytes)?;

        for entry in self.entries() {
            let entry_bytes = entry.serialize()?;
            writer.write(&entry_bytes)?;
        }

        writer.write_checksum()?;

        std::fs::rename(&temp_index_path, self.path()).with_context(|| {
            format!("Unable to rename index file to {}", self.path().display())
        })?;
        self.changed = false;

        Ok(())
    }

    pub fn entries(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries.values()
    }

    pub fn into_entries(self) -> impl Iterator<Item = IndexEntry> {
        self.entries.into_values()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn generate_temp_name() -> String {
        format!("tmp-idx-{}", rand::random::<u32>())
    }
}
