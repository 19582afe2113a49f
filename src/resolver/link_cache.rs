//! 带缓存的探测器：优先使用已验证的有效链接表

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use tracing::debug;

use crate::error::StoreResult;
use crate::resolver::Resolver;
use crate::store::read_links;

/// 先查表、再探测
///
/// 表中记录为 `None` 的域名视为已知不可达，不再探测。
pub struct CachedResolver<R> {
    links: HashMap<String, Option<String>>,
    fallback: R,
}

impl<R: Resolver> CachedResolver<R> {
    pub fn new(links: HashMap<String, Option<String>>, fallback: R) -> Self {
        Self { links, fallback }
    }

    /// 从有效链接表构造，表不存在时退化为纯探测
    pub fn from_table(path: &Path, fallback: R) -> StoreResult<Self> {
        let links = if path.exists() {
            read_links(path)?
        } else {
            HashMap::new()
        };
        Ok(Self::new(links, fallback))
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

#[async_trait]
impl<R: Resolver> Resolver for CachedResolver<R> {
    async fn resolve(&self, domain: &str) -> Option<String> {
        match self.links.get(domain) {
            Some(cached) => {
                debug!("命中有效链接缓存: {} -> {:?}", domain, cached);
                cached.clone()
            }
            None => self.fallback.resolve(domain).await,
        }
    }
}
