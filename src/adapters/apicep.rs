use crate::adapters::http;
use crate::core::scope::CancellationScope;
use crate::domain::model::{ApiCepData, Provider, ProviderResult};
use crate::domain::ports::Fetcher;
use crate::utils::error::FetchError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

/// ApiCEP 查不到時仍回 2xx，但 body 的 `status` 會是 4xx 並附上 `message`
#[derive(Deserialize)]
struct ApiCepEnvelope {
    #[serde(default)]
    message: Option<String>,
    #[serde(flatten)]
    data: ApiCepData,
}

pub struct ApiCepFetcher {
    client: Client,
    base_url: String,
    identifier: String,
}

impl ApiCepFetcher {
    pub fn new(client: Client, base_url: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            identifier: identifier.into(),
        }
    }

    pub fn url(&self) -> String {
        Provider::ApiCep.lookup_url(&self.base_url, &self.identifier)
    }
}

fn decode(body: &str) -> Result<ApiCepData, FetchError> {
    let envelope: ApiCepEnvelope = serde_json::from_str(body)?;

    if envelope.data.status >= 400 {
        return Err(FetchError::NotFound {
            message: envelope
                .message
                .unwrap_or_else(|| format!("status {}", envelope.data.status)),
        });
    }

    Ok(envelope.data)
}

#[async_trait]
impl Fetcher for ApiCepFetcher {
    fn name(&self) -> &str {
        Provider::ApiCep.name()
    }

    async fn fetch(&self, scope: &CancellationScope) -> Result<ProviderResult, FetchError> {
        let body = http::get_body(&self.client, &self.url(), scope).await?;
        Ok(ProviderResult::ApiCep(decode(&body)?))
    }
}
