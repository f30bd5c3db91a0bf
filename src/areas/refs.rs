//! References (branches, HEAD, tags)
//!
//! This module manages references which are human-readable names pointing to
//! commits. References can be:
//! - Direct: Containing a commit SHA-1
//! - Symbolic: Pointing to another reference (e.g., HEAD -> refs/heads/master)
//!
//! ## Reference Types
//!
//! - HEAD: Special reference pointing to the current branch or commit
//! - Branches: refs/heads/* pointing to branch tip commits
//! - Tags: refs/tags/* pointing to tagged commits
//!
//! ## File Format
//!
//! References are stored as text files containing either:
//! - A 40-character SHA-1 hash (direct reference)
//! - `ref: <path>` for symbolic references
//!
//! Reference files are rewritten whole on update.

use crate::artifacts::errors::KitError;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::revision::ref_name::{RefName, SymRefName};
use anyhow::Context;
use derive_new::new;
use fake::rand;
use std::collections::HashMap;
use std::io::Write;
use std::path::Path;
use walkdir::WalkDir;

/// References manager
///
/// Handles reading and writing references (branches, HEAD, tags).
#[derive(Debug, new)]
pub struct Refs {
    /// Path to the refs directory (typically `.kit`)
    path: Box<Path>,
}

/// Regex pattern for parsing symbolic references
const SYMREF_REGEX: &str = r"^ref: (.+)$";

/// Name of the HEAD reference
pub const HEAD_REF_NAME: &str = "HEAD";

/// Internal representation of a reference value
///
/// Can be either a symbolic reference or a direct object ID.
#[derive(Debug, Clone)]
enum SymRefOrOid {
    /// Symbolic reference pointing to another ref
    SymRef { sym_ref_name: SymRefName },
    /// Direct object ID
    Oid(ObjectId),
}

impl SymRefOrOid {
    fn read_symref_or_oid(path: &Path) -> anyhow::Result<Option<SymRefOrOid>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)?;
        let content = content.trim();

        if content.is_empty() {
            return Ok(None);
        }

        let symref_match = regex::Regex::new(SYMREF_REGEX)?.captures(content);
        if let Some(symref_match) = symref_match {
            Ok(Some(SymRefOrOid::SymRef {
                sym_ref_name: SymRefName::new(symref_match[1].to_string()),
            }))
        } else {
            Ok(Some(SymRefOrOid::Oid(ObjectId::try_parse(
                content.to_string(),
            )?)))
        }
    }
}

impl Refs {
    /// Check if a branch is the currently checked-out branch
    ///
    /// # Arguments
    ///
    /// * `ref_name` - The branch to check
    ///
    /// # Returns
    ///
    /// true if the branch is current, false otherwise
    pub fn is_current_branch(&self, ref_name: &RefName) -> anyhow::Result<bool> {
        let current_ref = self.current_ref(None)?;

        Ok(ref_name == &RefName::try_parse_sym_ref_name(&current_ref)?)
    }

    /// Read the object ID that a symbolic reference points to
    ///
    /// Follows symbolic references recursively until reaching a direct OID.
    ///
    /// # Returns
    ///
    /// Some(ObjectId) if the ref exists and points to a commit, None otherwise
    pub fn read_oid(&self, sym_ref_name: &SymRefName) -> anyhow::Result<Option<ObjectId>> {
        self.read_ref(RefName::try_parse_sym_ref_name(sym_ref_name)?)
    }

    /// Get the current symbolic reference
    ///
    /// Follows symbolic references recursively to find the final direct reference.
    /// For example, if HEAD points to refs/heads/main, returns refs/heads/main.
    ///
    /// # Arguments
    ///
    /// * `source` - Starting reference (defaults to HEAD if None)
    ///
    /// # Returns
    ///
    /// The final symbolic reference in the chain
    pub fn current_ref(&self, source: Option<SymRefName>) -> anyhow::Result<SymRefName> {
        let source = source.unwrap_or_else(|| SymRefName::new(HEAD_REF_NAME.to_string()));

        let ref_content =
            SymRefOrOid::read_symref_or_oid(self.path.join(source.as_ref_path()).as_path())?;

        match ref_content {
            Some(SymRefOrOid::SymRef { sym_ref_name }) => Ok(self.current_ref(Some(sym_ref_name))?),
            Some(_) | None => Ok(source),
        }
    }

    /// Read a symbolic reference, following indirection
    ///
    /// Recursively follows symbolic references until finding an OID.
    fn read_symref(&self, path: &Path) -> anyhow::Result<Option<ObjectId>> {
        let ref_content = SymRefOrOid::read_symref_or_oid(path)?;

        match ref_content {
            Some(SymRefOrOid::SymRef { sym_ref_name }) => {
                self.read_symref(self.path.join(sym_ref_name.as_ref_path()).as_path())
            }
            Some(SymRefOrOid::Oid(oid)) => Ok(Some(oid)),
            None => Ok(None),
        }
    }

    /// Update a symbolic reference to point to a new commit
    ///
    /// Handles both direct and indirect references, following the chain
    /// and updating the final target. Creates the target ref file when it
    /// does not exist yet, so committing on an unborn branch works.
    fn update_symref(&self, path: &Path, oid: ObjectId) -> anyhow::Result<()> {
        let ref_content = SymRefOrOid::read_symref_or_oid(path)?;

        match ref_content {
            Some(SymRefOrOid::SymRef { sym_ref_name }) => {
                let target_path = self.path.join(sym_ref_name.as_ref_path());
                self.update_symref(target_path.as_path(), oid)
            }
            Some(SymRefOrOid::Oid(_)) | None => self.update_ref_file(
                path.to_path_buf().into_boxed_path(),
                oid.as_ref().to_string(),
            ),
        }
    }

    pub fn set_head(&self, revision: &str, raw_ref: String) -> anyhow::Result<()> {
        let revision_path = self.heads_path().join(revision).into_boxed_path();

        if revision_path.exists() {
            self.update_ref_file(self.head_path(), format!("ref: refs/heads/{}", revision))
        } else {
            self.update_ref_file(self.head_path(), raw_ref)
        }
    }

    pub fn update_head(&self, oid: ObjectId) -> anyhow::Result<()> {
        self.update_symref(self.head_path().as_ref(), oid)
    }

    pub fn read_head(&self) -> anyhow::Result<Option<ObjectId>> {
        self.read_symref(&self.head_path())
    }

    pub fn update_ref_file(&self, path: Box<Path>, raw_ref: String) -> anyhow::Result<()> {
        let parent = path
            .parent()
            .with_context(|| format!("ref file at {:?} has no parent directory", path))?;

        // create all the parent directories if they don't exist
        std::fs::create_dir_all(parent)?;

        // stage the content next to the ref file, then swap it in whole
        let temp_ref_path = parent.join(Self::generate_temp_name());
        let mut ref_file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_ref_path)
            .with_context(|| format!("failed to open temp ref file at {:?}", temp_ref_path))?;
        ref_file.write_all(raw_ref.as_bytes())?;
        std::fs::rename(&temp_ref_path, &path)
            .with_context(|| format!("failed to update ref file at {:?}", path))?;

        Ok(())
    }

    fn generate_temp_name() -> String {
        format!("tmp-ref-{}", rand::random::<u32>())
    }

    pub fn read_ref(&self, ref_name: RefName) -> anyhow::Result<Option<ObjectId>> {
        let ref_path = self.find_path_to_ref(ref_name)?;
        self.read_symref(&ref_path)
    }

    fn find_path_to_ref(&self, ref_name: RefName) -> anyhow::Result<Box<Path>> {
        // search for the ref file in .kit, .kit/refs, .kit/refs/heads and
        // .kit/refs/tags, so branches shadow tags with the same name
        [
            self.path.clone(),
            self.refs_path(),
            self.heads_path(),
            self.tags_path(),
        ]
        .iter()
        .map(|base_path| base_path.join(ref_name.as_ref()).into_boxed_path())
        .find(|path| path.exists())
        .ok_or_else(|| anyhow::anyhow!("ref {} not found", ref_name))
    }

    pub fn create_branch(&self, name: RefName, source_oid: ObjectId) -> anyhow::Result<()> {
        let branch_path = self.heads_path().join(name.as_ref()).into_boxed_path();

        // check whether another branch with the same name already exists
        if branch_path.exists() {
            return Err(KitError::BranchAlreadyExists {
                name: name.to_string(),
            }
            .into());
        }

        self.update_ref_file(branch_path, source_oid.as_ref().into())
    }

    pub fn create_tag(&self, name: RefName, source_oid: ObjectId) -> anyhow::Result<()> {
        let tag_path = self.tags_path().join(name.as_ref()).into_boxed_path();

        if tag_path.exists() {
            return Err(KitError::TagAlreadyExists {
                name: name.to_string(),
            }
            .into());
        }

        self.update_ref_file(tag_path, source_oid.as_ref().into())
    }

    pub fn list_branches(&self) -> anyhow::Result<Vec<SymRefName>> {
        self.list_refs(self.heads_path().as_ref())
    }

    pub fn list_tags(&self) -> anyhow::Result<Vec<SymRefName>> {
        self.list_refs(self.tags_path().as_ref())
    }

    fn list_refs(&self, path: &Path) -> anyhow::Result<Vec<SymRefName>> {
        let mut refs = WalkDir::new(path)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                if entry.path().is_file() {
                    let relative_path = entry.path().strip_prefix(self.path.as_ref()).ok()?;
                    Some(SymRefName::new(relative_path.to_string_lossy().to_string()))
                } else {
                    None
                }
            })
            .collect::<Vec<_>>();
        refs.sort();

        Ok(refs)
    }

    pub fn reverse_refs(&self) -> anyhow::Result<HashMap<ObjectId, Vec<SymRefName>>> {
        Ok(self
            .list_all_refs()?
            .into_iter()
            .fold(HashMap::new(), |mut acc, sym_ref| {
                if let Ok(Some(oid)) = self.read_oid(&sym_ref) {
                    acc.entry(oid).or_insert_with(Vec::new).push(sym_ref);
                }
                acc
            }))
    }

    fn list_all_refs(&self) -> anyhow::Result<Vec<SymRefName>> {
        Ok(self
            .list_refs(self.refs_path().as_ref())?
            .into_iter()
            .chain(std::iter::once(SymRefName::new(HEAD_REF_NAME.to_string())))
            .collect::<Vec<_>>())
    }

    pub fn head_path(&self) -> Box<Path> {
        self.path.join(HEAD_REF_NAME).into_boxed_path()
    }

    pub fn refs_path(&self) -> Box<Path> {
        self.path.join("refs").into_boxed_path()
    }

    pub fn heads_path(&self) -> Box<Path> {
        self.refs_path().join("heads").into_boxed_path()
    }

    pub fn tags_path(&self) -> Box<Path> {
        self.refs_path().join("tags").into_boxed_path()
    }
}
