//! Porcelain commands (user-facing operations)
//!
//! Porcelain commands provide the high-level user interface for version control.
//! They compose plumbing commands and internal operations into workflows that
//! match typical Git usage patterns.
//!
//! ## Commands
//!
//! - `init`: Initialize a new repository
//! - `add`: Stage files for commit
//! - `unstage`: Remove files from the staging area
//! - `commit`: Create a new commit
//! - `status`: Show working tree status
//! - `checkout`: Switch branches or restore a commit snapshot
//! - `branch`: Create or list branches
//! - `tag`: Create or list tags
//! - `log`: Show commit history
//! - `config`: Read and write repository configuration

pub mod add;
pub mod branch;
pub mod checkout;
pub mod commit;
pub mod config;
pub mod init;
pub mod log;
pub mod status;
pub mod tag;
pub mod unstage;
