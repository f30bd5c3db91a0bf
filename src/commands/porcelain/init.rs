use crate::areas::repository::Repository;
use anyhow::Context;
use std::fs;
use std::io::Write;

pub const DEFAULT_BRANCH: &str = "master";

impl Repository {
    pub fn init(&self) -> anyhow::Result<()> {
        let reinitialized = self.kit_path().exists();

        fs::create_dir_all(self.database().objects_path())
            .context("Failed to create .kit/objects directory")?;

        fs::create_dir_all(self.refs().heads_path())
            .context("Failed to create .kit/refs/heads directory")?;

        fs::create_dir_all(self.refs().tags_path())
            .context("Failed to create .kit/refs/tags directory")?;

        // an existing HEAD keeps pointing at whatever it pointed at
        if !self.refs().head_path().exists() {
            self.refs()
                .set_head(
                    DEFAULT_BRANCH,
                    format!("ref: refs/heads/{}", DEFAULT_BRANCH),
                )
                .context("Failed to create initial HEAD reference")?;
        }

        self.config()
            .initialize()
            .context("Failed to write default configuration")?;

        let index = self.index();
        // create the index file if it does not exist
        if !index.path().exists() {
            fs::write(index.path(), b"").context("Failed to create .kit/index file")?;
        }

        if reinitialized {
            writeln!(
                self.writer(),
                "Reinitialized existing Kit repository in {}",
                self.kit_path().display()
            )?;
        } else {
            writeln!(
                self.writer(),
                "Initialized empty Kit repository in {}",
                self.kit_path().display()
            )?;
        }

        Ok(())
    }
}
