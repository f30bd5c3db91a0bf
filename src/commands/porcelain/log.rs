use crate::areas::repository::Repository;
use crate::artifacts::log::{RevList, time_ago};
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use colored::Colorize;
use std::io::Write;

impl Repository {
    pub fn log(&self) -> anyhow::Result<()> {
        self.set_reverse_refs(self.refs().reverse_refs()?);
        self.set_current_ref(self.refs().current_ref(None)?);

        for commit in RevList::new(self).into_iter()? {
            self.show_commit_line(&commit)?;
        }

        Ok(())
    }

    fn show_commit_line(&self, commit: &Commit) -> anyhow::Result<()> {
        let commit_oid = commit.object_id()?;

        writeln!(
            self.writer(),
            "* {}{} {} [{}] ({})",
            commit_oid.to_short_oid().red(),
            self.commit_decorations(&commit_oid),
            commit.short_message(),
            commit.author().display_name().green(),
            time_ago(commit.timestamp()).green()
        )?;

        Ok(())
    }

    /// Branch and tag names pointing at the commit, with the current branch
    /// rendered as `HEAD -> <branch>` and a detached HEAD as plain `HEAD`
    fn commit_decorations(&self, commit_oid: &ObjectId) -> String {
        let reverse_refs = self.reverse_refs();
        let Some(ref_names) = reverse_refs.get(commit_oid) else {
            return String::new();
        };

        let current_ref = self.current_ref();
        let mut names = Vec::new();
        let mut decorates_current_branch = false;

        for ref_name in ref_names {
            if ref_name.is_detached_head() {
                if current_ref.is_detached_head() {
                    names.push("HEAD".to_string());
                }
            } else if *ref_name == *current_ref {
                decorates_current_branch = true;
            } else {
                names.push(ref_name.short_name().to_string());
            }
        }

        if decorates_current_branch {
            names.push(format!("HEAD -> {}", current_ref.short_name()));
        }

        if names.is_empty() {
            return String::new();
        }

        format!(" {}", format!("({})", names.join(", ")).yellow())
    }
}
