//! Command line surface: arguments and the configuration file

pub mod args;
pub mod config;

#[cfg(test)]
mod tests;

pub use args::Args;
pub use config::{default_config_path, load_config_file, ConfigError};
