//! 可达性探测
//!
//! 把裸域名变成一个可访问、已跟随重定向的 URL。

pub mod http_probe;
pub mod link_cache;

use async_trait::async_trait;

pub use http_probe::{HttpResolver, DEFAULT_PREFIXES};
pub use link_cache::CachedResolver;

/// 域名 → 可达 URL
#[async_trait]
pub trait Resolver: Send + Sync {
    /// 所有候选地址都不可达时返回 `None`
    async fn resolve(&self, domain: &str) -> Option<String>;
}
