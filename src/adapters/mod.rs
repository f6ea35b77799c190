//! Storage and collaborator adapters.

pub mod sqlite;
