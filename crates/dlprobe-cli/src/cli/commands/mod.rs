//! CLI command handlers, one per file.

mod add;
mod check;
mod probe;
mod remove;
mod status;

pub use add::run_add;
pub use check::run_check;
pub use probe::{run_probe, ProbeArgs};
pub use remove::run_remove;
pub use status::run_status;
