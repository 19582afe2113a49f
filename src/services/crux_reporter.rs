//! CrUX 测量

use async_trait::async_trait;
use tracing::warn;

use crate::browser::BrowserHandle;
use crate::clients::CruxClient;
use crate::error::MeasureResult;
use crate::models::VitalsResult;
use crate::services::{MeasureTarget, VitalsMeasurer};

/// 从 Chrome UX Report 读取真实用户指标
///
/// 远程故障（缺少 key、网络、配额、响应格式）一律折叠为全空结果。
pub struct CruxReporter {
    client: CruxClient,
}

impl CruxReporter {
    pub fn new(client: CruxClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl VitalsMeasurer for CruxReporter {
    fn name(&self) -> &'static str {
        "CrUX"
    }

    async fn measure(
        &self,
        _browser: Option<&dyn BrowserHandle>,
        target: &MeasureTarget,
    ) -> MeasureResult<VitalsResult> {
        match self.client.query(&target.url).await {
            Ok(vitals) => Ok(vitals),
            Err(e) => {
                warn!("⚠️ CrUX 查询失败 ({}): {}", target.domain, e);
                Ok(VitalsResult::null())
            }
        }
    }
}
