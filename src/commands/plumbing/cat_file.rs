use crate::areas::repository::Repository;
use crate::artifacts::errors::KitError;
use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::artifacts::objects::object_id::ObjectId;
use std::io::Write;

/// What `cat-file` reports about an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatFileMode {
    PrettyPrint,
    Type,
    Size,
}

impl Repository {
    /// Inspect a stored object by hash, full or abbreviated.
    pub fn cat_file(&self, object_name: &str, mode: CatFileMode) -> anyhow::Result<()> {
        let object_id = self.resolve_object_name(object_name)?;

        match mode {
            CatFileMode::PrettyPrint => {
                let object = self.database().parse_object(&object_id)?;
                write!(self.writer(), "{}", object.display())?;
            }
            CatFileMode::Type => {
                let object_type = self.database().get_object_type(&object_id)?;
                writeln!(self.writer(), "{}", object_type)?;
            }
            CatFileMode::Size => {
                let object_size = self.database().get_object_size(&object_id)?;
                writeln!(self.writer(), "{}", object_size)?;
            }
        }

        Ok(())
    }

    fn resolve_object_name(&self, object_name: &str) -> anyhow::Result<ObjectId> {
        if object_name.len() == OBJECT_ID_LENGTH {
            return ObjectId::try_parse(object_name.to_string());
        }

        let matches = self.database().find_objects_by_prefix(object_name)?;

        match matches.len() {
            1 => Ok(matches[0].clone()),
            0 => anyhow::bail!(KitError::InvalidObjectName {
                name: object_name.to_string(),
            }),
            _ => anyhow::bail!("short object id {} is ambiguous", object_name),
        }
    }
}
