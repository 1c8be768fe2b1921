//! CLI command implementations.

mod ask;
mod config;
mod doctor;
mod serve;

pub use ask::run_ask;
pub use config::run_config;
pub use doctor::run_doctor;
pub use serve::run_serve;
