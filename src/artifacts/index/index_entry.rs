//! Index entry representation
//!
//! Each entry in the index represents a tracked file with:
//! - File path
//! - Content hash (object ID)
//! - File mode
//!
//! ## Entry Format
//!
//! Entries are stored in a binary format with 8-byte alignment for efficient
//! reading. The path length is written explicitly ahead of the path bytes, and
//! every entry ends with at least one null byte.

use crate::artifacts::index::entry_mode::EntryMode;
use crate::artifacts::objects::object::{Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use byteorder::{ByteOrder, WriteBytesExt};
use bytes::Bytes;
use derive_new::new;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

/// Maximum path length supported in index entries
const MAX_PATH_SIZE: usize = 4095;

/// Block size for entry alignment (8 bytes)
pub const ENTRY_BLOCK: usize = 8;

/// Minimum size of an index entry in bytes
pub const ENTRY_MIN_SIZE: usize = 32;

/// Size of the fixed prefix before the path bytes: mode (4), oid (20), path length (2)
const ENTRY_PREFIX_SIZE: usize = 26;

/// Index entry representing a tracked file
///
/// Binds a repository-relative path to the blob holding its staged content.
// TODO: Restrict access to certain fields
#[derive(Debug, Clone, Default, new)]
pub struct IndexEntry {
    /// File path relative to repository root
    pub name: PathBuf,
    /// SHA-1 hash of file content
    pub oid: ObjectId,
    /// File mode (regular or executable)
    pub mode: EntryMode,
}

impl IndexEntry {
    pub fn basename(&self) -> anyhow::Result<&str> {
        self.name
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| anyhow::anyhow!("Invalid file name"))
    }

    // TODO: Stop after reaching the repository's root
    pub fn parent_dirs(&self) -> anyhow::Result<Vec<&Path>> {
        let mut dirs = Vec::new();
        let mut parent = self.name.parent();

        while let Some(new_parent) = parent {
            dirs.push(new_parent);
            parent = new_parent.parent();
        }
        dirs.reverse();
        let dirs = dirs[1..].to_vec();

        Ok(dirs)
    }
}

impl PartialEq for IndexEntry {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for IndexEntry {}

impl PartialOrd for IndexEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for IndexEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.name.cmp(&other.name)
    }
}

impl Packable for IndexEntry {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let entry_name = self
            .name
            .to_str()
            .ok_or_else(|| anyhow::anyhow!("Invalid entry name"))?;

        if entry_name.len() > MAX_PATH_SIZE {
            anyhow::bail!("Entry path too long: {}", entry_name);
        }

        let mut entry_bytes = Vec::new();
        entry_bytes.write_u32::<byteorder::NetworkEndian>(self.mode.as_u32())?;
        self.oid.write_h40_to(&mut entry_bytes)?;
        entry_bytes.write_u16::<byteorder::NetworkEndian>(entry_name.len() as u16)?;
        entry_bytes.write_all(entry_name.as_bytes())?;

        // Ensure the entry bytes are padded to ENTRY_BLOCK size with null bytes
        entry_bytes.push(0); // There must be at least one null byte at the end
        while entry_bytes.len() % ENTRY_BLOCK != 0 {
            entry_bytes.push(0);
        }

        Ok(Bytes::from(entry_bytes))
    }
}

impl Unpackable for IndexEntry {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        let bytes = reader
            .bytes()
            .collect::<Result<Vec<u8>, std::io::Error>>()?;

        if bytes.len() < ENTRY_MIN_SIZE {
            return Err(anyhow::anyhow!("Invalid index entry size"));
        }

        let mode = EntryMode::try_from(byteorder::NetworkEndian::read_u32(&bytes[0..4]))?;
        let mut oid_bytes = std::io::Cursor::new(&bytes[4..24]);
        let oid = ObjectId::read_h40_from(&mut oid_bytes)?;
        let name_size = byteorder::NetworkEndian::read_u16(&bytes[24..26]) as usize;

        if ENTRY_PREFIX_SIZE + name_size > bytes.len() {
            return Err(anyhow::anyhow!("Entry path length out of bounds"));
        }

        let name_bytes = &bytes[ENTRY_PREFIX_SIZE..ENTRY_PREFIX_SIZE + name_size];
        let name = PathBuf::from(
            std::str::from_utf8(name_bytes)
                .map_err(|_| anyhow::anyhow!("Invalid UTF-8 in entry name"))?,
        );

        Ok(IndexEntry { name, oid, mode })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::index::entry_mode::FileMode;
    use rstest::{fixture, rstest};
    use sha1::Digest;

    #[fixture]
    fn oid() -> ObjectId {
        let mut hasher = sha1::Sha1::new();
        hasher.update("test data");
        ObjectId::try_parse(format!("{:x}", hasher.finalize())).unwrap()
    }

    #[rstest]
    fn test_entry_parent_dirs(oid: ObjectId) {
        let entry = IndexEntry::new(PathBuf::from("a/b/c"), oid, EntryMode::default());

        let dirs = entry.parent_dirs().unwrap();
        pretty_assertions::assert_eq!(dirs, vec![Path::new("a"), Path::new("a/b")]);
    }

    #[rstest]
    fn test_entry_parent_dirs_root(oid: ObjectId) {
        let entry = IndexEntry::new(PathBuf::from("a"), oid, EntryMode::default());

        let dirs = entry.parent_dirs().unwrap();
        pretty_assertions::assert_eq!(dirs, Vec::<&Path>::new());
    }

    #[rstest]
    fn test_entry_basename(oid: ObjectId) {
        let entry = IndexEntry::new(PathBuf::from("a/b/c"), oid, EntryMode::default());

        let basename = entry.basename().unwrap();
        pretty_assertions::assert_eq!(basename, "c");
    }

    #[rstest]
    fn serialized_entries_are_block_aligned(oid: ObjectId) {
        for name in ["a", "ab.txt", "deep/nested/path.rs"] {
            let entry = IndexEntry::new(
                PathBuf::from(name),
                oid.clone(),
                EntryMode::File(FileMode::Regular),
            );

            let bytes = entry.serialize().unwrap();
            assert_eq!(bytes.len() % ENTRY_BLOCK, 0);
            assert_eq!(bytes.last(), Some(&0));
        }
    }

    #[rstest]
    fn entries_round_trip_through_their_binary_form(oid: ObjectId) {
        let entry = IndexEntry::new(
            PathBuf::from("src/lib.rs"),
            oid,
            EntryMode::File(FileMode::Executable),
        );

        let bytes = entry.serialize().unwrap();
        let parsed = IndexEntry::deserialize(std::io::Cursor::new(bytes)).unwrap();

        pretty_assertions::assert_eq!(parsed.name, entry.name);
        pretty_assertions::assert_eq!(parsed.oid, entry.oid);
        pretty_assertions::assert_eq!(parsed.mode, entry.mode);
    }
}
