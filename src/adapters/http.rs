use crate::core::scope::CancellationScope;
use crate::utils::error::{CepError, FetchError};
use reqwest::{Client, StatusCode};

pub const USER_AGENT: &str = concat!("cep-race/", env!("CARGO_PKG_VERSION"));

pub fn build_client() -> Result<Client, CepError> {
    let client = Client::builder().user_agent(USER_AGENT).build()?;
    Ok(client)
}

/// 發出 GET 並讀完整個 body，送出與讀取都受 `scope` 約束。
pub async fn get_body(
    client: &Client,
    url: &str,
    scope: &CancellationScope,
) -> Result<String, FetchError> {
    tracing::debug!("Making API request to: {}", url);

    let request = async {
        let response = client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        Ok::<_, FetchError>((status, body))
    };

    let (status, body) = scope.bind(request).await.ok_or(FetchError::Cancelled)??;
    tracing::debug!("API response status: {}", status);

    if is_error_status(status) {
        return Err(FetchError::Remote {
            status: status.as_u16(),
            body,
        });
    }

    Ok(body)
}

/// [400, 599] 視為遠端錯誤
pub fn is_error_status(status: StatusCode) -> bool {
    (400..=599).contains(&status.as_u16())
}
