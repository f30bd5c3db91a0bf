use crate::areas::repository::Repository;
use std::io::Write;

impl Repository {
    pub fn config_get(&self, name: &str) -> anyhow::Result<()> {
        let value = self.config().get(name)?;
        writeln!(self.writer(), "{}", value)?;

        Ok(())
    }

    pub fn config_set(&self, name: &str, value: &str) -> anyhow::Result<()> {
        self.config().set(name, value)
    }
}
