//! Plumbing commands (low-level operations)
//!
//! Plumbing commands provide direct access to the internal data structures
//! and operations. They're primarily used for scripting, for inspecting the
//! object database, and as building blocks for porcelain commands.
//!
//! ## Commands
//!
//! - `hash-object`: Compute object ID and optionally store in database
//! - `cat-file`: Show type, size or content of a stored object
//! - `ls-tree`: List contents of a tree object

pub mod cat_file;
pub mod hash_object;
pub mod ls_tree;
