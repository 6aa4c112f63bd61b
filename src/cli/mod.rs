pub mod analyze;
pub mod commands;
pub mod progress;
pub mod roles;
pub mod serve;

pub use commands::{Cli, Commands};
