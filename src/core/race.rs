use crate::core::scope::CancellationScope;
use crate::domain::model::{ProviderResult, RaceOutcome};
use crate::domain::ports::Fetcher;
use crate::utils::error::{CepError, FetchError, Result};
use futures::stream::{FuturesUnordered, StreamExt};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;

/// 同時向所有 fetcher 發出查詢，只採用第一個成功的結果。
pub struct RaceCoordinator {
    fetchers: Vec<Arc<dyn Fetcher>>,
    timeout: Duration,
}

impl RaceCoordinator {
    pub fn new(fetchers: Vec<Arc<dyn Fetcher>>, timeout: Duration) -> Result<Self> {
        if fetchers.is_empty() {
            return Err(CepError::MissingConfigError {
                field: "providers".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for fetcher in &fetchers {
            if !seen.insert(fetcher.name().to_string()) {
                return Err(CepError::ConfigValidationError {
                    field: "providers".to_string(),
                    message: format!("provider '{}' is registered more than once", fetcher.name()),
                });
            }
        }

        Ok(Self { fetchers, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn providers(&self) -> Vec<&str> {
        self.fetchers.iter().map(|f| f.name()).collect()
    }

    /// 執行一場賽跑，恰好產生一個 `RaceOutcome`。
    ///
    /// 落敗的 task 不會被等待：範圍撤銷後它們會在下一個 I/O 邊界自行結束。
    pub async fn race(&self) -> RaceOutcome {
        let scope = CancellationScope::with_timeout(self.timeout);
        // 呼叫端中途 drop 這個 future 時也要撤銷
        let _revoke_guard = scope.revoke_on_drop();

        if scope.is_expired() {
            scope.revoke();
            tracing::info!("⏱️ Deadline already reached, no provider launched");
            return RaceOutcome::Timeout;
        }

        tracing::debug!(
            "Racing {} providers with a {}ms deadline",
            self.fetchers.len(),
            self.timeout.as_millis()
        );

        let mut arrivals = FuturesUnordered::new();
        for fetcher in &self.fetchers {
            let (slot, receiver) = oneshot::channel();
            let name = fetcher.name().to_string();

            tokio::spawn(run_fetcher(Arc::clone(fetcher), scope.clone(), slot));

            arrivals.push(async move { (name, receiver.await) });
        }

        let deadline = tokio::time::sleep_until(scope.deadline());
        tokio::pin!(deadline);

        let outcome = loop {
            tokio::select! {
                _ = &mut deadline => {
                    tracing::info!("⏱️ No provider responded within {}ms", self.timeout.as_millis());
                    break RaceOutcome::Timeout;
                }
                arrival = arrivals.next() => match arrival {
                    Some((provider, Ok(result))) => {
                        tracing::info!("🏁 '{}' won the race", provider);
                        break RaceOutcome::Success { provider, result };
                    }
                    Some((provider, Err(_))) => {
                        // fetcher 失敗時只會丟掉 sender
                        tracing::debug!(
                            "'{}' dropped out of the race, {}ms left",
                            provider,
                            scope.remaining().as_millis()
                        );
                    }
                    None => {
                        tracing::info!("All providers failed before the deadline");
                        break RaceOutcome::Timeout;
                    }
                },
            }
        };

        scope.revoke();
        outcome
    }
}

async fn run_fetcher(
    fetcher: Arc<dyn Fetcher>,
    scope: CancellationScope,
    slot: oneshot::Sender<ProviderResult>,
) {
    match fetcher.fetch(&scope).await {
        Ok(result) => {
            if slot.send(result).is_err() {
                tracing::debug!(
                    "Result from '{}' arrived after the race was decided, discarding",
                    fetcher.name()
                );
            }
        }
        Err(FetchError::Cancelled) => {
            tracing::debug!("Request to '{}' was cancelled", fetcher.name());
        }
        Err(e) => {
            tracing::warn!("unable to get the cep data from '{}': {}", fetcher.name(), e);
        }
    }
}
