use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::{CancellationToken, DropGuard};

/// 上限約 30 年，避免 `Instant + Duration::MAX` 溢位
const FAR_FUTURE: Duration = Duration::from_secs(60 * 60 * 24 * 365 * 30);

/// 帶有截止時間、可撤銷的共享取消範圍。
///
/// coordinator 擁有並負責撤銷；fetcher 只讀取狀態。
/// 撤銷或截止時間到達任一發生即視為已取消。
#[derive(Debug, Clone)]
pub struct CancellationScope {
    token: CancellationToken,
    deadline: Instant,
}

impl CancellationScope {
    pub fn with_timeout(timeout: Duration) -> Self {
        let now = Instant::now();
        let deadline = now
            .checked_add(timeout)
            .unwrap_or_else(|| now + FAR_FUTURE);

        Self {
            token: CancellationToken::new(),
            deadline,
        }
    }

    /// 撤銷範圍。重複呼叫是 no-op。
    pub fn revoke(&self) {
        self.token.cancel();
    }

    /// guard 被 drop 時撤銷範圍
    pub fn revoke_on_drop(&self) -> DropGuard {
        self.token.clone().drop_guard()
    }

    pub fn is_revoked(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.deadline
    }

    pub fn is_cancelled(&self) -> bool {
        self.is_revoked() || self.is_expired()
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    /// 等到範圍被撤銷或逾時
    pub async fn cancelled(&self) {
        tokio::select! {
            _ = self.token.cancelled() => {}
            _ = tokio::time::sleep_until(self.deadline) => {}
        }
    }

    /// 讓 `fut` 受此範圍約束；被取消時丟棄 `fut` 並回傳 `None`
    pub async fn bind<F>(&self, fut: F) -> Option<F::Output>
    where
        F: Future,
    {
        if self.is_cancelled() {
            return None;
        }

        tokio::select! {
            biased;
            _ = self.cancelled() => None,
            output = fut => Some(output),
        }
    }
}
