use crate::areas::repository::Repository;
use crate::artifacts::status::file_change::LABEL_WIDTH;
use crate::artifacts::status::report::{Status, StatusReport};
use colored::Colorize;
use std::io::Write;

impl Repository {
    pub fn status(&self, porcelain: bool) -> anyhow::Result<()> {
        let mut index = self.index();
        index.rehydrate()?;

        let report = Status::new(self).initialize(&index)?;
        drop(index);

        if porcelain {
            self.print_porcelain_status(&report)
        } else {
            self.print_long_status(&report)
        }
    }

    /// Two-character code per changed path, then untracked paths, both in
    /// name order
    fn print_porcelain_status(&self, report: &StatusReport) -> anyhow::Result<()> {
        for (file, change) in &report.changed_files {
            writeln!(self.writer(), "{} {}", String::from(change), file.display())?;
        }

        for file in &report.untracked_files {
            writeln!(self.writer(), "?? {}", file.display())?;
        }

        Ok(())
    }

    fn print_long_status(&self, report: &StatusReport) -> anyhow::Result<()> {
        self.print_branch_header()?;

        if report.is_clean() {
            writeln!(self.writer(), "nothing to commit, working tree clean")?;
            return Ok(());
        }

        if !report.index_changeset.is_empty() {
            writeln!(self.writer())?;
            writeln!(self.writer(), "Changes to be committed:")?;
            for (file, change_type) in &report.index_changeset {
                writeln!(self.writer(), "{}{}", change_type, file.display())?;
            }
        }

        if !report.workspace_changeset.is_empty() {
            writeln!(self.writer())?;
            writeln!(self.writer(), "Changes not staged for commit:")?;
            for (file, change_type) in &report.workspace_changeset {
                writeln!(self.writer(), "{}{}", change_type, file.display())?;
            }
        }

        if !report.untracked_files.is_empty() {
            writeln!(self.writer())?;
            writeln!(self.writer(), "Untracked files:")?;
            for file in &report.untracked_files {
                writeln!(
                    self.writer(),
                    "{:>width$}{}",
                    "",
                    file.display().to_string().red(),
                    width = LABEL_WIDTH
                )?;
            }
        }

        Ok(())
    }

    fn print_branch_header(&self) -> anyhow::Result<()> {
        let current_ref = self.refs().current_ref(None)?;

        if current_ref.is_detached_head()
            && let Some(oid) = self.refs().read_head()?
        {
            writeln!(self.writer(), "HEAD detached at {}", oid.to_short_oid())?;
            return Ok(());
        }

        writeln!(self.writer(), "On branch {}", current_ref.short_name())?;

        Ok(())
    }
}
