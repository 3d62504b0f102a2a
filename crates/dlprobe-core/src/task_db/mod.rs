//! Persistent task store (SQLite via sqlx).
//!
//! Holds the per-task facts a probe establishes (status code, range support,
//! chunking, size, checksum hint, disposition, redirect target) so the next
//! probe can detect that the remote resource changed.

pub mod db;
mod tasks;
pub mod types;

pub use db::*;
pub use types::*;
