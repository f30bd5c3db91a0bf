use crate::areas::repository::Repository;
use crate::artifacts::errors::KitError;
use crate::artifacts::revision::ref_name::RefName;
use crate::artifacts::revision::revision::Revision;
use colored::Colorize;
use std::io::Write;

impl Repository {
    pub fn branch(
        &self,
        branch_name: Option<&str>,
        source_refname: Option<&str>,
    ) -> anyhow::Result<()> {
        match branch_name {
            Some(branch_name) => self.create_branch_from(branch_name, source_refname),
            None => self.print_branch_list(),
        }
    }

    fn create_branch_from(
        &self,
        branch_name: &str,
        source_refname: Option<&str>,
    ) -> anyhow::Result<()> {
        let branch_name = RefName::try_parse(branch_name.to_string())?;

        let source_oid = if let Some(source_refname) = source_refname {
            let revision = Revision::try_parse(source_refname)?;
            revision
                .resolve(self)?
                .ok_or_else(|| anyhow::anyhow!("ref {} not found", source_refname))?
        } else {
            // branching off an unborn branch names the branch itself
            let current_ref = self.refs().current_ref(None)?;
            self.refs()
                .read_head()?
                .ok_or_else(|| KitError::InvalidObjectName {
                    name: current_ref.short_name().to_string(),
                })?
        };

        self.refs().create_branch(branch_name, source_oid)?;

        Ok(())
    }

    fn print_branch_list(&self) -> anyhow::Result<()> {
        let current_ref = self.refs().current_ref(None)?;

        for branch in self.refs().list_branches()? {
            if branch == current_ref {
                writeln!(self.writer(), "* {}", branch.short_name().green())?;
            } else {
                writeln!(self.writer(), "  {}", branch.short_name())?;
            }
        }

        Ok(())
    }
}
