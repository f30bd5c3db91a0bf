use crate::areas::repository::Repository;
use crate::artifacts::errors::KitError;
use crate::artifacts::objects::commit::{Author, Commit};
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use std::io::Write;

impl Repository {
    pub fn commit(&self, message: &str) -> anyhow::Result<()> {
        let mut index = self.index();
        index.rehydrate()?;

        let parent_oid = self.refs().read_head()?;

        // A root commit from an empty index would snapshot nothing
        if parent_oid.is_none() && index.is_empty() {
            anyhow::bail!(KitError::NothingToCommit);
        }

        let tree = Tree::build(index.entries())?;
        drop(index);

        tree.traverse(&|subtree| self.database().store(subtree.clone()))?;
        let tree_oid = tree.object_id()?;

        // The index reproducing the parent's tree means nothing is staged
        if let Some(parent_oid) = &parent_oid {
            let parent = self
                .database()
                .parse_object_as_commit(parent_oid)?
                .ok_or_else(|| anyhow::anyhow!("object {} is not a commit", parent_oid))?;

            if parent.tree_oid() == &tree_oid {
                anyhow::bail!(KitError::NothingToCommit);
            }
        }

        let author = self.commit_author()?;
        let commit = Commit::new(parent_oid, tree_oid, author, message.to_string());
        let commit_oid = commit.object_id()?;

        self.database().store(commit.clone())?;
        self.refs().update_head(commit_oid.clone())?;

        self.print_commit_summary(&commit, &commit_oid)?;

        Ok(())
    }

    /// Author identity comes from `KIT_AUTHOR_NAME`/`KIT_AUTHOR_EMAIL` when
    /// set, otherwise from the repository configuration
    fn commit_author(&self) -> anyhow::Result<Author> {
        if let Ok(author) = Author::load_from_env() {
            return Ok(author);
        }

        let name = self.config().get("user.name")?;
        let email = self.config().get("user.email")?;

        Ok(Author::new(name, email))
    }

    fn print_commit_summary(&self, commit: &Commit, commit_oid: &ObjectId) -> anyhow::Result<()> {
        let current_ref = self.refs().current_ref(None)?;
        let location = if current_ref.is_detached_head() {
            "detached HEAD"
        } else {
            current_ref.short_name()
        };
        let root_marker = if commit.is_root() { " (root-commit)" } else { "" };

        writeln!(
            self.writer(),
            "[{}{} {}] {}",
            location,
            root_marker,
            commit_oid.to_short_oid(),
            commit.short_message()
        )?;

        Ok(())
    }
}
