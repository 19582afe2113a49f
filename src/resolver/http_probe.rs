//! 基于 HTTP GET 的前缀探测

use std::time::Duration;

use async_trait::async_trait;
use reqwest::redirect::Policy;
use reqwest::{Client, StatusCode};
use tracing::{debug, info};

use crate::resolver::Resolver;

/// 按顺序尝试的地址前缀
pub const DEFAULT_PREFIXES: [&str; 4] = ["https://www.", "https://", "http://www.", "http://"];

/// 依次尝试每个前缀，返回第一个可达地址的最终 URL
pub struct HttpResolver {
    client: Client,
    prefixes: Vec<String>,
}

impl HttpResolver {
    pub fn new(timeout: Duration, max_redirects: usize) -> reqwest::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(Policy::limited(max_redirects))
            .build()?;

        Ok(Self {
            client,
            prefixes: DEFAULT_PREFIXES.iter().map(|p| p.to_string()).collect(),
        })
    }

    /// 替换前缀列表
    pub fn with_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    async fn probe(&self, candidate: &str) -> Option<String> {
        let response = match self.client.get(candidate).send().await {
            Ok(response) => response,
            Err(e) => {
                debug!("探测 {} 失败: {}", candidate, e);
                return None;
            }
        };

        let status = response.status();
        if status == StatusCode::OK || status.is_redirection() {
            Some(response.url().to_string())
        } else {
            debug!("探测 {} 返回 {}", candidate, status);
            None
        }
    }
}

#[async_trait]
impl Resolver for HttpResolver {
    async fn resolve(&self, domain: &str) -> Option<String> {
        for prefix in &self.prefixes {
            let candidate = format!("{}{}", prefix, domain);
            if let Some(url) = self.probe(&candidate).await {
                debug!("✓ {} 可达: {}", domain, url);
                return Some(url);
            }
        }

        info!("⚠️ {} 的所有地址均不可达", domain);
        None
    }
}
