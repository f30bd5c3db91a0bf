//! Object types and operations
//!
//! All repository content is stored as objects identified by SHA-1 hashes.
//! There are three object kinds:
//!
//! - **Blob**: file content (raw bytes)
//! - **Tree**: directory listing (names, modes, and object IDs)
//! - **Commit**: snapshot with metadata (author, message, parent commit, tree)
//!
//! All objects serialize to and deserialize from the on-disk object format:
//! `<type> <size>\0<content>`

pub mod blob;
pub mod commit;
pub mod object;
pub mod object_id;
pub mod object_type;
pub mod tree;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;
