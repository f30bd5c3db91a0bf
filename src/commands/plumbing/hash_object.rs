use crate::areas::repository::Repository;
use crate::artifacts::objects::object::Object;
use std::io::Write;

impl Repository {
    /// Hash a workspace file as a blob and print its object id. With `write`
    /// the blob is also stored in the object database.
    pub fn hash_object(&self, object_path: &str, write: bool) -> anyhow::Result<()> {
        let blob = self.workspace().parse_blob(object_path.as_ref())?;
        let object_id = blob.object_id()?;

        writeln!(self.writer(), "{}", object_id)?;

        if !write {
            return Ok(());
        }

        self.database().store(blob)?;

        Ok(())
    }
}
