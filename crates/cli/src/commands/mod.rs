//! Subcommand implementations for `hc2`.

pub mod devices;
pub mod download;
pub mod globals;
pub mod info;
pub mod init;
pub mod interact;
pub mod upload;
