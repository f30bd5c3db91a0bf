use crate::areas::repository::Repository;
use crate::artifacts::errors::KitError;
use crate::artifacts::revision::ref_name::RefName;
use crate::artifacts::revision::revision::Revision;
use std::io::Write;

impl Repository {
    /// Tags are lightweight: the ref file holds the commit hash and the
    /// message is accepted only for CLI compatibility
    pub fn tag(
        &self,
        tag_name: Option<&str>,
        _message: Option<&str>,
        source_refname: Option<&str>,
    ) -> anyhow::Result<()> {
        match tag_name {
            Some(tag_name) => self.create_tag_at(tag_name, source_refname),
            None => self.print_tag_list(),
        }
    }

    fn create_tag_at(&self, tag_name: &str, source_refname: Option<&str>) -> anyhow::Result<()> {
        let tag_name = RefName::try_parse(tag_name.to_string())?;

        let source_oid = if let Some(source_refname) = source_refname {
            let revision = Revision::try_parse(source_refname)?;
            revision.resolve(self)?
        } else {
            self.refs().read_head()?
        }
        .ok_or_else(|| KitError::RefResolutionFailed {
            name: source_refname.unwrap_or("HEAD").to_string(),
        })?;

        self.refs().create_tag(tag_name, source_oid)?;

        Ok(())
    }

    fn print_tag_list(&self) -> anyhow::Result<()> {
        for tag in self.refs().list_tags()? {
            writeln!(self.writer(), "{}", tag.short_name())?;
        }

        Ok(())
    }
}
