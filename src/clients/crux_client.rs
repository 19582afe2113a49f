/// Chrome UX Report API 客户端
///
/// 查询某个 origin 的真实用户 p75 指标
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use tracing::debug;

use crate::error::RemoteApiError;
use crate::models::VitalsResult;

/// 请求的指标名
pub const CRUX_METRICS: [&str; 4] = [
    "largest_contentful_paint",
    "first_input_delay",
    "interaction_to_next_paint",
    "cumulative_layout_shift",
];

#[derive(Debug, Deserialize)]
struct QueryResponse {
    record: Option<CruxRecord>,
}

#[derive(Debug, Deserialize)]
struct CruxRecord {
    #[serde(default)]
    metrics: HashMap<String, CruxMetric>,
}

#[derive(Debug, Deserialize)]
struct CruxMetric {
    percentiles: Option<Percentiles>,
}

#[derive(Debug, Deserialize)]
struct Percentiles {
    /// 数字或数字字符串（CLS 以字符串返回）
    p75: Option<Value>,
}

/// CrUX API 客户端
pub struct CruxClient {
    http: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl CruxClient {
    /// 创建新的 CrUX 客户端
    pub fn new(http: Client, endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            api_key,
        }
    }

    /// 查询 `url` 所在 origin 的指标
    ///
    /// # 参数
    /// - `url`: 已解析的可达地址
    ///
    /// # 返回
    /// 返回 p75 指标；FID 缺失时用 INP 代替
    pub async fn query(&self, url: &str) -> Result<VitalsResult, RemoteApiError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| RemoteApiError::MissingApiKey {
                endpoint: self.endpoint.clone(),
            })?;

        let origin = url::Url::parse(url)
            .map_err(|e| RemoteApiError::malformed(&self.endpoint, format!("非法地址 {}: {}", url, e)))?
            .origin()
            .ascii_serialization();

        let body = json!({
            "origin": origin,
            "metrics": CRUX_METRICS,
        });
        debug!("查询 CrUX: {}", origin);

        let response = self
            .http
            .post(&self.endpoint)
            .query(&[("key", api_key)])
            .json(&body)
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

        let parsed: QueryResponse = response
            .json()
            .await
            .map_err(|e| RemoteApiError::malformed(&self.endpoint, e.to_string()))?;
        let record = parsed
            .record
            .ok_or_else(|| RemoteApiError::malformed(&self.endpoint, "响应中没有 record"))?;

        Ok(record.to_vitals())
    }
}

impl CruxRecord {
    fn p75(&self, metric: &str) -> Option<f64> {
        let value = self.metrics.get(metric)?.percentiles.as_ref()?.p75.as_ref()?;
        match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    fn to_vitals(&self) -> VitalsResult {
        VitalsResult::new(
            self.p75("largest_contentful_paint"),
            self.p75("first_input_delay")
                .or_else(|| self.p75("interaction_to_next_paint")),
            self.p75("cumulative_layout_shift"),
        )
    }
}
