//! CLI command implementations.

mod ask;
mod config;
mod schedule;

pub use ask::{build_tools, run_ask};
pub use config::run_config;
pub use schedule::run_schedule;
