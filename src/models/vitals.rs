//! Core Web Vitals 结果模型

use serde::{Deserialize, Serialize};

/// 结果表中的空值标记
pub const NULL_MARKER: &str = "null";

/// 一次测量得到的三项指标，每项独立可空
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct VitalsResult {
    /// Largest Contentful Paint（毫秒）
    pub lcp: Option<f64>,
    /// First Input Delay（毫秒）
    pub fid: Option<f64>,
    /// Cumulative Layout Shift
    pub cls: Option<f64>,
}

/// Lighthouse 报告中的审计项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditId {
    LargestContentfulPaint,
    MaxPotentialFid,
    CumulativeLayoutShift,
}

impl AuditId {
    pub const ALL: [AuditId; 3] = [
        AuditId::LargestContentfulPaint,
        AuditId::MaxPotentialFid,
        AuditId::CumulativeLayoutShift,
    ];

    /// 报告中的审计 key
    pub fn key(&self) -> &'static str {
        match self {
            AuditId::LargestContentfulPaint => "largest-contentful-paint",
            AuditId::MaxPotentialFid => "max-potential-fid",
            AuditId::CumulativeLayoutShift => "cumulative-layout-shift",
        }
    }
}

impl VitalsResult {
    pub fn new(lcp: Option<f64>, fid: Option<f64>, cls: Option<f64>) -> Self {
        Self { lcp, fid, cls }
    }

    /// 全空结果
    pub fn null() -> Self {
        Self::default()
    }

    /// 三项是否全部缺失
    pub fn is_null(&self) -> bool {
        self.lcp.is_none() && self.fid.is_none() && self.cls.is_none()
    }

    /// 从审计数值构造结果
    ///
    /// 审计报告中数值恰好为 0 与"未计算"无法区分，一律视为缺失。
    pub fn from_audit_values(lookup: impl Fn(AuditId) -> Option<f64>) -> Self {
        let pick = |id: AuditId| lookup(id).filter(|v| *v != 0.0);
        Self {
            lcp: pick(AuditId::LargestContentfulPaint),
            fid: pick(AuditId::MaxPotentialFid),
            cls: pick(AuditId::CumulativeLayoutShift),
        }
    }

    /// 转换为 CSV 字段（LCP, FID, CLS）
    pub fn to_fields(&self) -> [String; 3] {
        [self.lcp, self.fid, self.cls].map(format_metric)
    }
}

fn format_metric(value: Option<f64>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => NULL_MARKER.to_string(),
    }
}
