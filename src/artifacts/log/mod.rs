//! Commit history traversal
//!
//! History is linear: every commit carries at most one parent, so walking
//! from a tip to the root is a single chain. `RevList` iterates that chain
//! newest first, starting from whatever HEAD currently resolves to. An
//! unborn HEAD yields an empty walk.

use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use chrono::{DateTime, Duration, FixedOffset, Utc};
use derive_new::new;

#[derive(Clone, new)]
pub struct RevList<'r> {
    repository: &'r Repository,
}

impl<'r> RevList<'r> {
    pub fn into_iter(self) -> anyhow::Result<RevListIntoIter<'r>> {
        Ok(RevListIntoIter {
            repository: self.repository,
            current_commit_oid: self.repository.refs().read_head()?,
        })
    }
}

#[derive(Clone)]
pub struct RevListIntoIter<'r> {
    repository: &'r Repository,
    current_commit_oid: Option<ObjectId>,
}

impl Iterator for RevListIntoIter<'_> {
    type Item = Commit;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(commit_oid) = &self.current_commit_oid {
            match self
                .repository
                .database()
                .parse_object_as_commit(commit_oid)
            {
                Ok(Some(commit)) => {
                    // Move to the parent commit for the next iteration
                    self.current_commit_oid = commit.parent().cloned();
                    Some(commit)
                }
                _ => {
                    // If we can't parse the commit, end the iteration
                    self.current_commit_oid = None;
                    None
                }
            }
        } else {
            None
        }
    }
}

/// Render the distance between `timestamp` and now as the most significant
/// time unit, e.g. "3 days ago" or "just now"
pub fn time_ago(timestamp: DateTime<FixedOffset>) -> String {
    humanize_elapsed(Utc::now().signed_duration_since(timestamp))
}

fn humanize_elapsed(elapsed: Duration) -> String {
    let seconds = elapsed.num_seconds().max(0);
    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;
    let months = days / 30;
    let years = days / 365;

    let (amount, unit) = if years > 0 {
        (years, "year")
    } else if months > 0 {
        (months, "month")
    } else if days > 0 {
        (days, "day")
    } else if hours > 0 {
        (hours, "hour")
    } else if minutes > 0 {
        (minutes, "minute")
    } else if seconds > 0 {
        (seconds, "second")
    } else {
        return "just now".to_string();
    };

    format!("{} {}{} ago", amount, unit, if amount > 1 { "s" } else { "" })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::areas::repository::Repository;
    use crate::artifacts::index::entry_mode::FileMode;
    use crate::artifacts::objects::blob::Blob;
    use crate::artifacts::objects::commit::Author;
    use crate::artifacts::objects::object::Object;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(0, "just now")]
    #[case(1, "1 second ago")]
    #[case(59, "59 seconds ago")]
    #[case(60, "1 minute ago")]
    #[case(2 * 60 * 60, "2 hours ago")]
    #[case(3 * 24 * 60 * 60, "3 days ago")]
    #[case(45 * 24 * 60 * 60, "1 month ago")]
    #[case(2 * 365 * 24 * 60 * 60, "2 years ago")]
    fn elapsed_time_humanizes_to_the_most_significant_unit(
        #[case] seconds: i64,
        #[case] expected: &str,
    ) {
        assert_eq!(expected, humanize_elapsed(Duration::seconds(seconds)));
    }

    #[test]
    fn rev_list_walks_from_head_back_to_the_root() -> anyhow::Result<()> {
        let temp = assert_fs::TempDir::new()?;
        let repository = Repository::new(temp.path().to_str().unwrap(), Box::new(std::io::sink()))?;
        std::fs::create_dir_all(repository.kit_path().join("objects"))?;
        repository
            .refs()
            .update_ref_file(repository.refs().head_path(), "ref: refs/heads/master".to_string())?;

        let blob = Blob::new("content".to_string(), FileMode::Regular);
        let tree_oid = blob.object_id()?;
        repository.database().store(blob)?;

        let author = Author::new("A".to_string(), "a@kit.dev".to_string());
        let root = Commit::new(None, tree_oid.clone(), author.clone(), "root".to_string());
        let root_oid = root.object_id()?;
        repository.database().store(root.clone())?;

        let tip = Commit::new(Some(root_oid), tree_oid, author, "tip".to_string());
        repository.database().store(tip.clone())?;
        repository.refs().update_head(tip.object_id()?)?;

        let messages = RevList::new(&repository)
            .into_iter()?
            .map(|commit| commit.message().to_string())
            .collect::<Vec<_>>();

        assert_eq!(vec!["tip".to_string(), "root".to_string()], messages);
        Ok(())
    }

    #[test]
    fn rev_list_is_empty_on_an_unborn_branch() -> anyhow::Result<()> {
        let temp = assert_fs::TempDir::new()?;
        let repository = Repository::new(temp.path().to_str().unwrap(), Box::new(std::io::sink()))?;
        repository
            .refs()
            .update_ref_file(repository.refs().head_path(), "ref: refs/heads/master".to_string())?;

        assert_eq!(0, RevList::new(&repository).into_iter()?.count());
        Ok(())
    }
}
