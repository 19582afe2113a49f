/// PageSpeed Insights API 客户端
///
/// 在 Google 的服务器上运行一次 Lighthouse 并返回报告
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::error::RemoteApiError;
use crate::models::LighthouseReport;

#[derive(Debug, Deserialize)]
struct RunPagespeedResponse {
    #[serde(rename = "lighthouseResult")]
    lighthouse_result: Option<LighthouseReport>,
}

/// PSI API 客户端
pub struct PsiClient {
    http: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl PsiClient {
    /// 创建新的 PSI 客户端
    pub fn new(http: Client, endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            api_key,
        }
    }

    /// 以桌面策略运行性能分类
    ///
    /// # 参数
    /// - `url`: 已解析的可达地址
    ///
    /// # 返回
    /// 返回 Lighthouse 报告
    pub async fn run_pagespeed(&self, url: &str) -> Result<LighthouseReport, RemoteApiError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| RemoteApiError::MissingApiKey {
                endpoint: self.endpoint.clone(),
            })?;

        debug!("运行 PageSpeed Insights: {}", url);
        let response = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("url", url),
                ("key", api_key),
                ("strategy", "DESKTOP"),
                ("category", "PERFORMANCE"),
            ])
            .send()
            .await
            .map_err(|e| RemoteApiError::request_failed(&self.endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteApiError::BadStatus {
                endpoint: self.endpoint.clone(),
                status: status.as_u16(),
            });
        }

        let parsed: RunPagespeedResponse = response
            .json()
            .await
            .map_err(|e| RemoteApiError::malformed(&self.endpoint, e.to_string()))?;

        parsed
            .lighthouse_result
            .ok_or_else(|| RemoteApiError::malformed(&self.endpoint, "响应中没有 lighthouseResult"))
    }
}
