use crate::adapters::http;
use crate::core::scope::CancellationScope;
use crate::domain::model::{Provider, ProviderResult, ViaCepData};
use crate::domain::ports::Fetcher;
use crate::utils::error::FetchError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

/// ViaCEP 對不存在的 CEP 回 200 加上 `{"erro": true}`，新版 API 會是字串 `"true"`
#[derive(Deserialize)]
struct ViaCepEnvelope {
    #[serde(default)]
    erro: Option<serde_json::Value>,
    #[serde(flatten)]
    data: ViaCepData,
}

impl ViaCepEnvelope {
    fn is_error(&self) -> bool {
        match &self.erro {
            Some(serde_json::Value::Bool(flag)) => *flag,
            Some(serde_json::Value::String(flag)) => flag.eq_ignore_ascii_case("true"),
            _ => false,
        }
    }
}

pub struct ViaCepFetcher {
    client: Client,
    base_url: String,
    identifier: String,
}

impl ViaCepFetcher {
    pub fn new(client: Client, base_url: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            identifier: identifier.into(),
        }
    }

    pub fn url(&self) -> String {
        Provider::ViaCep.lookup_url(&self.base_url, &self.identifier)
    }
}

fn decode(body: &str, identifier: &str) -> Result<ViaCepData, FetchError> {
    let envelope: ViaCepEnvelope = serde_json::from_str(body)?;

    if envelope.is_error() {
        return Err(FetchError::NotFound {
            message: format!("viacep has no record for '{}'", identifier),
        });
    }

    Ok(envelope.data)
}

#[async_trait]
impl Fetcher for ViaCepFetcher {
    fn name(&self) -> &str {
        Provider::ViaCep.name()
    }

    async fn fetch(&self, scope: &CancellationScope) -> Result<ProviderResult, FetchError> {
        let body = http::get_body(&self.client, &self.url(), scope).await?;
        Ok(ProviderResult::ViaCep(decode(&body, &self.identifier)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use std::time::Duration;

    #[test]
    fn test_decode_erro_flag_variants() {
        assert!(matches!(
            decode(r#"{"erro": true}"#, "99999999"),
            Err(FetchError::NotFound { .. })
        ));
        assert!(matches!(
            decode(r#"{"erro": "true"}"#, "99999999"),
            Err(FetchError::NotFound { .. })
        ));
        assert!(decode(r#"{"cep": "06233-030", "erro": false}"#, "06233030").is_ok());
    }

    #[tokio::test]
    async fn test_fetch_uses_json_path_segment() {
        let server = MockServer::start_async().await;
        let api_mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/ws/06233030/json");
                then.status(200)
                    .header("Content-Type", "application/json")
                    .json_body(serde_json::json!({
                        "cep": "06233-030",
                        "logradouro": "Rua Paula Rodrigues",
                        "complemento": "",
                        "bairro": "Piratininga",
                        "localidade": "Osasco",
                        "uf": "SP",
                        "ibge": "3534401",
                        "gia": "4923",
                        "ddd": "11",
                        "siafi": "6789"
                    }));
            })
            .await;

        let fetcher = ViaCepFetcher::new(Client::new(), server.url("/ws"), "06233030");
        let scope = CancellationScope::with_timeout(Duration::from_secs(5));

        let result = fetcher.fetch(&scope).await.unwrap();

        api_mock.assert_async().await;
        match result {
            ProviderResult::ViaCep(data) => {
                assert_eq!(data.localidade, "Osasco");
                assert_eq!(data.ddd, "11");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_reports_not_found_status() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/ws/0000/json");
                then.status(400).body("Http 400");
            })
            .await;

        let fetcher = ViaCepFetcher::new(Client::new(), server.url("/ws"), "0000");
        let scope = CancellationScope::with_timeout(Duration::from_secs(5));

        let err = fetcher.fetch(&scope).await.unwrap_err();
        assert!(matches!(err, FetchError::Remote { status: 400, .. }));
    }
}
