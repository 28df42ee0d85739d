//! Port traits implemented by adapters.

pub mod holdings_port;
pub mod config_port;
pub mod report_port;
