//! Lighthouse 报告（只解析用到的部分）

use std::collections::HashMap;

use serde::Deserialize;

use crate::models::vitals::VitalsResult;

/// Lighthouse 结果（LHR）
///
/// 本地 CLI 的 JSON 输出与 PSI 响应中的 `lighthouseResult` 结构相同。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LighthouseReport {
    #[serde(default)]
    pub audits: HashMap<String, AuditEntry>,
}

/// 单个审计项
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditEntry {
    #[serde(rename = "numericValue")]
    pub numeric_value: Option<f64>,
}

impl LighthouseReport {
    /// 提取三项指标，缺失或为 0 的审计项记为空
    pub fn to_vitals(&self) -> VitalsResult {
        VitalsResult::from_audit_values(|id| {
            self.audits
                .get(id.key())
                .and_then(|audit| audit.numeric_value)
        })
    }
}
