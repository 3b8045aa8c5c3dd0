mod discover;
mod error;
mod loader;
mod settings;
mod validate;

#[cfg(test)]
mod tests;

pub use discover::{discover_log_files, is_gzip, sibling_pattern};
pub use error::ConfigError;
pub use settings::*;
pub use validate::validate_config;
