//! Repository configuration
//!
//! The configuration lives in `.kit/config` as a small INI-style file:
//!
//! ```text
//! [core]
//! 	repositoryformatversion = 0
//! 	filemode = true
//! ```
//!
//! Keys are addressed with the dotted `section.key` form used on the command
//! line. The file is parsed in full and rewritten in full on every update.

use crate::artifacts::errors::KitError;
use anyhow::Context;
use derive_new::new;
use std::io::Write;
use std::path::Path;

/// Default configuration written by `init`
const DEFAULT_CONFIG: &str = "[core]\n\
    \trepositoryformatversion = 0\n\
    \tfilemode = true\n\
    \tbare = false\n\
    \tlogallrefupdates = true\n";

/// Repository configuration store
///
/// Reads and writes the `.kit/config` file. Sections and keys keep the
/// order in which they appear on disk.
#[derive(Debug, new)]
pub struct Config {
    /// Path to the config file (typically `.kit/config`)
    path: Box<Path>,
}

/// One `[section]` block and its key/value pairs, in file order
type ConfigSection = (String, Vec<(String, String)>);

impl Config {
    /// Write the default configuration, unless a config file already exists
    pub fn initialize(&self) -> anyhow::Result<()> {
        if self.path.exists() {
            return Ok(());
        }

        self.write_contents(&Self::parse(DEFAULT_CONFIG)?)
    }

    /// Look up a dotted `section.key` name
    ///
    /// `user.name` and `user.email` fall back to a placeholder identity when
    /// they have not been set, so commits work out of the box.
    pub fn get(&self, name: &str) -> anyhow::Result<String> {
        let (section, key) = Self::split_name(name)?;
        let sections = self.load()?;

        let value = sections
            .iter()
            .find(|(section_name, _)| section_name == &section)
            .and_then(|(_, entries)| {
                entries
                    .iter()
                    .find(|(entry_key, _)| entry_key == &key)
                    .map(|(_, value)| value.clone())
            });

        match value {
            Some(value) => Ok(value),
            None if section == "user" && (key == "name" || key == "email") => {
                Ok(format!("Kit {}", key))
            }
            None => anyhow::bail!("key not found: {}", name),
        }
    }

    /// Set a dotted `section.key` name, creating the section if needed
    pub fn set(&self, name: &str, value: &str) -> anyhow::Result<()> {
        let (section, key) = Self::split_name(name)?;
        let mut sections = self.load()?;

        let entries = match sections
            .iter_mut()
            .find(|(section_name, _)| section_name == &section)
        {
            Some((_, entries)) => entries,
            None => {
                sections.push((section, Vec::new()));
                &mut sections
                    .last_mut()
                    .context("config section list cannot be empty after push")?
                    .1
            }
        };

        match entries.iter_mut().find(|(entry_key, _)| entry_key == &key) {
            Some((_, entry_value)) => *entry_value = value.to_string(),
            None => entries.push((key, value.to_string())),
        }

        self.write_contents(&sections)
    }

    fn split_name(name: &str) -> anyhow::Result<(String, String)> {
        match name.split_once('.') {
            Some((section, key)) if !section.is_empty() && !key.is_empty() => {
                Ok((section.to_string(), key.to_string()))
            }
            _ => Err(KitError::SectionlessConfigKey {
                name: name.to_string(),
            }
            .into()),
        }
    }

    fn load(&self) -> anyhow::Result<Vec<ConfigSection>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read config file at {:?}", self.path))?;

        Self::parse(&content)
    }

    fn parse(content: &str) -> anyhow::Result<Vec<ConfigSection>> {
        let mut sections: Vec<ConfigSection> = Vec::new();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(section_name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                sections.push((section_name.trim().to_string(), Vec::new()));
            } else {
                let (key, value) = line
                    .split_once('=')
                    .with_context(|| format!("invalid config line: {}", line))?;
                sections
                    .last_mut()
                    .with_context(|| format!("config entry outside of a section: {}", line))?
                    .1
                    .push((key.trim().to_string(), value.trim().to_string()));
            }
        }

        Ok(sections)
    }

    fn write_contents(&self, sections: &[ConfigSection]) -> anyhow::Result<()> {
        let mut config_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)
            .with_context(|| format!("failed to open config file at {:?}", self.path))?;

        for (section_name, entries) in sections {
            writeln!(config_file, "[{}]", section_name)?;
            for (key, value) in entries {
                writeln!(config_file, "\t{} = {}", key, value)?;
            }
        }

        Ok(())
    }
}
