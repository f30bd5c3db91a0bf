use crate::areas::repository::Repository;
use crate::artifacts::errors::KitError;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::revision::revision::Revision;
use std::collections::BTreeMap;
use std::io::Write;

impl Repository {
    /// List the files a tree snapshots, resolving a commit-ish argument to
    /// the tree it points at. Subtrees are flattened into full paths.
    pub fn ls_tree(&self, tree_ish: &str, name_only: bool) -> anyhow::Result<()> {
        let oid = self.resolve_tree_ish(tree_ish)?;

        let tree_oid = match self.database().parse_object_as_commit(&oid)? {
            Some(commit) => commit.tree_oid().clone(),
            None => oid,
        };

        let mut flat_tree = BTreeMap::new();
        self.parse_tree(&tree_oid, None, &mut flat_tree)?;

        // flattening leaves only blob entries
        for (path, entry) in &flat_tree {
            if name_only {
                writeln!(self.writer(), "{}", path.display())?;
            } else {
                writeln!(
                    self.writer(),
                    "{} {} {}\t{}",
                    entry.mode.as_str(),
                    ObjectType::Blob,
                    entry.oid,
                    path.display()
                )?;
            }
        }

        Ok(())
    }

    fn resolve_tree_ish(&self, tree_ish: &str) -> anyhow::Result<ObjectId> {
        // A full hash names a tree or a commit directly
        if let Ok(oid) = ObjectId::try_parse(tree_ish.to_string()) {
            return Ok(oid);
        }

        let oid = match Revision::try_parse(tree_ish) {
            Ok(revision) => revision.resolve(self).ok().flatten(),
            Err(_) => None,
        }
        .ok_or_else(|| KitError::InvalidObjectName {
            name: tree_ish.to_string(),
        })?;

        Ok(oid)
    }
}
