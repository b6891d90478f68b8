pub mod cli;
pub mod commands;
pub mod report;

pub use cli::Cli;
