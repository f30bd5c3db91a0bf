//! User-facing command failures
//!
//! Porcelain commands surface these through anyhow, so each message is written
//! the way it should read on stderr. Internal plumbing failures (corrupt
//! objects, torn index files) stay as plain anyhow errors since they indicate
//! repository damage rather than a user mistake.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum KitError {
    #[error("pathspec '{path}' is outside repository")]
    PathspecOutsideRepository { path: String },

    #[error("pathspec '{path}' did not match any files")]
    PathspecNotMatched { path: String },

    #[error("pathspec '{revision}' did not match any file(s) known to kit")]
    RevisionNotMatched { revision: String },

    #[error("A branch named '{name}' already exists.")]
    BranchAlreadyExists { name: String },

    #[error("Not a valid object name: '{name}'.")]
    InvalidObjectName { name: String },

    #[error("tag '{name}' already exists")]
    TagAlreadyExists { name: String },

    #[error("Failed to resolve '{name}' as a valid ref.")]
    RefResolutionFailed { name: String },

    #[error("key does not contain a section: {name}")]
    SectionlessConfigKey { name: String },

    #[error("nothing to commit, working tree clean")]
    NothingToCommit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_render_without_a_prefix() {
        let err = KitError::BranchAlreadyExists {
            name: "feature".to_string(),
        };
        assert_eq!(err.to_string(), "A branch named 'feature' already exists.");

        let err = KitError::NothingToCommit;
        assert_eq!(err.to_string(), "nothing to commit, working tree clean");
    }
}
