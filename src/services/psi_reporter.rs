//! PageSpeed Insights 测量

use async_trait::async_trait;
use tracing::warn;

use crate::browser::BrowserHandle;
use crate::clients::PsiClient;
use crate::error::MeasureResult;
use crate::models::VitalsResult;
use crate::services::{MeasureTarget, VitalsMeasurer};

/// 通过 PSI 在远端运行 Lighthouse，指标映射与本地审计相同
pub struct PsiReporter {
    client: PsiClient,
}

impl PsiReporter {
    pub fn new(client: PsiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl VitalsMeasurer for PsiReporter {
    fn name(&self) -> &'static str {
        "PSI"
    }

    async fn measure(
        &self,
        _browser: Option<&dyn BrowserHandle>,
        target: &MeasureTarget,
    ) -> MeasureResult<VitalsResult> {
        match self.client.run_pagespeed(&target.url).await {
            Ok(report) => Ok(report.to_vitals()),
            Err(e) => {
                warn!("⚠️ PSI 调用失败 ({}): {}", target.domain, e);
                Ok(VitalsResult::null())
            }
        }
    }
}
