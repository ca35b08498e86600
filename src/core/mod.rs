pub mod engine;
pub mod race;
pub mod scope;
pub mod sink;

pub use crate::domain::model::{ProviderResult, RaceOutcome};
pub use crate::domain::ports::{ConfigProvider, Fetcher};
pub use crate::utils::error::Result;
