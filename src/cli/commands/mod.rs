pub mod bug;
pub mod classify;
pub mod errors;
pub mod init;
