pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::toml_config::TomlConfig;
pub use core::{engine::LookupEngine, race::RaceCoordinator, scope::CancellationScope, sink::ResultSink};
pub use domain::model::{ApiCepData, Provider, ProviderEndpoint, ProviderResult, RaceOutcome, ViaCepData};
pub use utils::error::{CepError, FetchError, Result};
