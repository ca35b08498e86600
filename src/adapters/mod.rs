// Adapters layer: concrete fetchers for the external CEP services plus the shared HTTP plumbing.

pub mod apicep;
pub mod http;
pub mod viacep;

use crate::domain::model::{Provider, ProviderEndpoint};
use crate::domain::ports::Fetcher;
use reqwest::Client;
use std::sync::Arc;

pub use apicep::ApiCepFetcher;
pub use viacep::ViaCepFetcher;

pub fn build_fetcher(client: Client, endpoint: &ProviderEndpoint) -> Arc<dyn Fetcher> {
    match endpoint.provider {
        Provider::ApiCep => Arc::new(ApiCepFetcher::new(
            client,
            endpoint.base_url.clone(),
            endpoint.identifier.clone(),
        )),
        Provider::ViaCep => Arc::new(ViaCepFetcher::new(
            client,
            endpoint.base_url.clone(),
            endpoint.identifier.clone(),
        )),
    }
}

/// 所有 fetcher 共用同一個 `Client`
pub fn build_fetchers(client: &Client, endpoints: &[ProviderEndpoint]) -> Vec<Arc<dyn Fetcher>> {
    endpoints
        .iter()
        .map(|endpoint| build_fetcher(client.clone(), endpoint))
        .collect()
}
