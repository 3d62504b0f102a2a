pub mod config;
pub mod logging;

pub mod error;
pub mod filename;
pub mod interpret;
pub mod probe;
pub mod redirect;
pub mod task_db;
pub mod transport;

pub use error::{ProbeError, ProbeErrorKind};
pub use probe::{ProbeListener, ProbeRequest, ProbeResult, Prober};
