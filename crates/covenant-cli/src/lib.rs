//! Covenant CLI - command-line front end for the contract extraction pipeline.

mod cli;
mod config;
mod error;
mod output;

pub use cli::Cli;
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
