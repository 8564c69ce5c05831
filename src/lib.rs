// ABOUTME: Library root for copyid - exposes the installer and SSH types for testing.
// ABOUTME: The main binary is in main.rs.

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod install;
pub mod key;
pub mod output;
pub mod ssh;
