//! 浏览器 + Lighthouse 测量

use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::browser::{BrowserHandle, PageHandle};
use crate::error::{BrowserError, MeasureError, MeasureResult};
use crate::models::VitalsResult;
use crate::services::{AuditEngine, MeasureTarget, VitalsMeasurer};
use crate::utils::bounded_wait;

/// 在共享浏览器中打开页面，再用审计引擎测量
///
/// 页面在每条退出路径上都会被关闭。
pub struct LighthouseAuditor {
    engine: Box<dyn AuditEngine>,
    audit_timeout: Duration,
}

impl LighthouseAuditor {
    pub fn new(engine: Box<dyn AuditEngine>, audit_timeout: Duration) -> Self {
        Self {
            engine,
            audit_timeout,
        }
    }

    async fn audit_page(&self, page: &dyn PageHandle, port: u16) -> MeasureResult<VitalsResult> {
        let url = page.current_url().await?;

        let report = bounded_wait("Lighthouse 审计", self.audit_timeout, self.engine.run(&url, port))
            .await
            .map_err(|e| MeasureError::ProfilingTimeout {
                url: url.clone(),
                limit: e.limit,
            })?;

        match report {
            Some(report) => Ok(report.to_vitals()),
            None => Err(MeasureError::AuditUnavailable { url }),
        }
    }
}

#[async_trait]
impl VitalsMeasurer for LighthouseAuditor {
    fn name(&self) -> &'static str {
        "Lighthouse"
    }

    async fn measure(
        &self,
        browser: Option<&dyn BrowserHandle>,
        target: &MeasureTarget,
    ) -> MeasureResult<VitalsResult> {
        let browser = browser.ok_or(BrowserError::NotRunning)?;
        let port = browser.endpoint_port()?;
        let page = browser.open_page(&target.url).await?;

        let result = self.audit_page(page.as_ref(), port).await;

        if let Err(e) = page.close().await {
            warn!("⚠️ 关闭页面失败 ({}): {}", target.url, e);
        }

        if let Ok(vitals) = &result {
            info!("✓ 测得 {}: {:?}", target.url, vitals);
        }
        result
    }
}
