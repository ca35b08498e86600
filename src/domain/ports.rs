use crate::core::scope::CancellationScope;
use crate::domain::model::{ProviderEndpoint, ProviderResult};
use crate::utils::error::{FetchError, Result};
use async_trait::async_trait;
use std::time::Duration;

/// 對單一資料來源做一次查詢
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// provider 名稱，在同一場賽跑中必須唯一
    fn name(&self) -> &str;

    async fn fetch(&self, scope: &CancellationScope) -> std::result::Result<ProviderResult, FetchError>;
}

pub trait ConfigProvider: Send + Sync {
    fn timeout(&self) -> Duration;
    fn endpoints(&self) -> Result<Vec<ProviderEndpoint>>;
}
