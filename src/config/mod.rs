#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use std::time::Duration;

pub const DEFAULT_CEP: &str = "06233030";
pub const DEFAULT_TIMEOUT_MS: u64 = 1_000;
pub const MAX_TIMEOUT: Duration = Duration::from_secs(600);

#[cfg(feature = "cli")]
pub use cli::CliConfig;
