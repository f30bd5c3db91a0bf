use crate::areas::repository::Repository;
use crate::artifacts::checkout::Materializer;
use crate::artifacts::errors::KitError;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::revision::ref_name::SymRefName;
use crate::artifacts::revision::revision::Revision;

const DETACHMENT_NOTICE: &str = r#"
You are in 'detached HEAD' state. You can look around, make experimental
changes and commit them, and you can discard any commits you make in this
state without impacting any branches by performing another checkout.

If you want to create a new branch to retain commits you create, you may
do so (now or later) by using the branch command. Example:

    kit branch <new-branch-name>
"#;

impl Repository {
    pub fn checkout(&self, target: &str) -> anyhow::Result<()> {
        let current_ref = self.refs().current_ref(None)?;
        // an unborn branch has no ref file yet, so there is no previous oid
        let current_oid = self.refs().read_oid(&current_ref).ok().flatten();

        let target_oid = match Revision::try_parse(target) {
            Ok(revision) => revision.resolve(self).ok().flatten(),
            Err(_) => None,
        }
        .ok_or_else(|| KitError::RevisionNotMatched {
            revision: target.to_string(),
        })?;

        Materializer::new(self).materialize_commit(&target_oid)?;

        self.refs()
            .set_head(target, target_oid.clone().as_ref().into())?;
        let new_ref = self.refs().current_ref(None)?;

        self.print_previous_head(&current_ref, current_oid.as_ref(), &target_oid)?;
        self.print_detachment_notice(&current_ref, &new_ref, target)?;
        self.print_new_head(&current_ref, &new_ref, &target_oid, target)?;

        Ok(())
    }

    fn print_previous_head(
        &self,
        current_ref: &SymRefName,
        current_oid: Option<&ObjectId>,
        target_oid: &ObjectId,
    ) -> anyhow::Result<()> {
        if let Some(current_oid) = current_oid
            && current_ref.is_detached_head()
            && current_oid != target_oid
        {
            self.print_head_position("Previous HEAD position was", current_oid)?;
        }

        Ok(())
    }

    fn print_detachment_notice(
        &self,
        current_ref: &SymRefName,
        new_ref: &SymRefName,
        target: &str,
    ) -> anyhow::Result<()> {
        if !current_ref.is_detached_head() && new_ref.is_detached_head() {
            eprintln!("Note: checking out '{}'.\n{}", target, DETACHMENT_NOTICE);
        }

        Ok(())
    }

    fn print_new_head(
        &self,
        current_ref: &SymRefName,
        new_ref: &SymRefName,
        target_oid: &ObjectId,
        target: &str,
    ) -> anyhow::Result<()> {
        if new_ref.is_detached_head() {
            self.print_head_position("HEAD is now at", target_oid)?;
        } else if new_ref == current_ref {
            eprintln!("Already on '{}'", target);
        } else {
            eprintln!("Switched to branch '{}'", target);
        }

        Ok(())
    }

    fn print_head_position(&self, message: &str, oid: &ObjectId) -> anyhow::Result<()> {
        let commit = self
            .database()
            .parse_object_as_commit(oid)?
            .ok_or_else(|| anyhow::anyhow!("object is not a commit"))?;
        let short_oid = oid.to_short_oid();

        eprintln!("{} {} {}", message, short_oid, commit.short_message());
        Ok(())
    }
}
