//! CLI table formatting.

pub mod table;
