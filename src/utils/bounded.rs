//! 限时等待
//!
//! 两层超时（单页审计 30 秒、单域名 60 秒）共用同一个组合子。超时后原
//! future 会被直接丢弃，由调用方决定是否需要清理底层资源。

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio::time::timeout;
use tracing::debug;

/// 限时等待超时
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{label} 超时 (限时 {}s)", .limit.as_secs())]
pub struct TimedOut {
    pub label: String,
    pub limit: Duration,
}

/// 在 `limit` 内等待 `fut` 完成，否则返回 [`TimedOut`]
pub async fn bounded_wait<F, T>(
    label: impl Into<String>,
    limit: Duration,
    fut: F,
) -> Result<T, TimedOut>
where
    F: Future<Output = T>,
{
    match timeout(limit, fut).await {
        Ok(value) => Ok(value),
        Err(_) => {
            let label = label.into();
            debug!("⏱ {} 超过 {:?}，放弃等待", label, limit);
            Err(TimedOut { label, limit })
        }
    }
}
