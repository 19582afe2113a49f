//! 业务能力层
//!
//! 每个能力只回答"给我一个地址，我测出三项指标"，不关心批次与续跑。

pub mod audit_engine;
pub mod crux_reporter;
pub mod lighthouse_auditor;
pub mod psi_reporter;

use async_trait::async_trait;

use crate::browser::BrowserHandle;
use crate::error::MeasureResult;
use crate::models::VitalsResult;

pub use audit_engine::{AuditEngine, LighthouseCli};
pub use crux_reporter::CruxReporter;
pub use lighthouse_auditor::LighthouseAuditor;
pub use psi_reporter::PsiReporter;

/// 一次测量的目标
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasureTarget {
    pub rank: u64,
    pub domain: String,
    /// 已解析的可达地址
    pub url: String,
}

/// 测量能力
#[async_trait]
pub trait VitalsMeasurer: Send + Sync {
    /// 用于日志的名称
    fn name(&self) -> &'static str;

    /// 测量单个目标
    ///
    /// 远程 API 类的实现不使用 `browser`，并且从不返回错误。
    async fn measure(
        &self,
        browser: Option<&dyn BrowserHandle>,
        target: &MeasureTarget,
    ) -> MeasureResult<VitalsResult>;
}
