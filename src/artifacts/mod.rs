//! Data structures and algorithms shared by the repository areas
//!
//! - `checkout`: materializing a commit snapshot into the working directory
//! - `core`: shared utilities (pager wrapper, etc.)
//! - `database`: database entry types
//! - `errors`: the failure taxonomy surfaced by porcelain commands
//! - `index`: staging index entries and their on-disk codec
//! - `log`: commit history traversal and presentation
//! - `objects`: object types (blob, tree, commit)
//! - `revision`: ref names and revision expression resolution
//! - `status`: working tree status inspection

pub mod checkout;
pub mod core;
pub mod database;
pub mod errors;
pub mod index;
pub mod log;
pub mod objects;
pub mod revision;
pub mod status;
