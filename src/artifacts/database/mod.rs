//! Database entry types
//!
//! Types used when reading objects back out of the object database. A
//! database entry pairs an object id with the mode it was recorded under.

pub mod database_entry;
