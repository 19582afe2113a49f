//! 域名处理流程 - 流程层
//!
//! 核心职责：定义"一个域名"的完整处理流程
//!
//! 流程顺序：
//! 1. 可达性探测（不可达 → 空记录）
//! 2. 在单域名时限内测量
//! 3. 把结果或故障交给编排层

use std::time::Duration;

use thiserror::Error;
use tracing::{error, info, warn};

use crate::browser::BrowserHandle;
use crate::error::MeasureError;
use crate::models::VitalsResult;
use crate::resolver::Resolver;
use crate::services::{MeasureTarget, VitalsMeasurer};
use crate::utils::{bounded_wait, TimedOut};
use crate::workflow::domain_ctx::DomainCtx;

/// 单个域名的故障
#[derive(Debug, Error)]
pub enum FlowFault {
    /// 所有候选地址均不可达
    #[error("域名不可达")]
    Unreachable,
    /// 测量失败
    #[error("测量失败: {0}")]
    Measure(#[from] MeasureError),
    /// 整体超时（浏览器可能已卡死）
    #[error("{0}")]
    DomainTimeout(TimedOut),
}

impl FlowFault {
    /// 是否需要重启浏览器
    pub fn requires_restart(&self) -> bool {
        match self {
            FlowFault::Unreachable => false,
            FlowFault::Measure(e) => e.requires_restart(),
            FlowFault::DomainTimeout(_) => true,
        }
    }
}

/// 单个域名的处理结果
///
/// 无论成败都会产生一条结果：故障时 `vitals` 为全空。
#[derive(Debug)]
pub struct FlowOutcome {
    pub vitals: VitalsResult,
    /// 探测得到的地址，`None` 表示不可达
    pub link: Option<String>,
    pub fault: Option<FlowFault>,
}

impl FlowOutcome {
    fn measured(vitals: VitalsResult, link: String) -> Self {
        Self {
            vitals,
            link: Some(link),
            fault: None,
        }
    }

    fn failed(link: Option<String>, fault: FlowFault) -> Self {
        Self {
            vitals: VitalsResult::null(),
            link,
            fault: Some(fault),
        }
    }

    pub fn requires_restart(&self) -> bool {
        self.fault.as_ref().is_some_and(FlowFault::requires_restart)
    }
}

/// 域名处理流程
///
/// - 编排"探测 → 测量"
/// - 不持有浏览器，只借用
/// - 只依赖业务能力（resolver / measurer）
pub struct DomainFlow {
    resolver: Box<dyn Resolver>,
    measurer: Box<dyn VitalsMeasurer>,
    domain_timeout: Duration,
    resolve_timeout: Duration,
}

impl DomainFlow {
    /// 创建新的域名处理流程
    pub fn new(
        resolver: Box<dyn Resolver>,
        measurer: Box<dyn VitalsMeasurer>,
        domain_timeout: Duration,
        resolve_timeout: Duration,
    ) -> Self {
        Self {
            resolver,
            measurer,
            domain_timeout,
            resolve_timeout,
        }
    }

    pub async fn run(&self, browser: Option<&dyn BrowserHandle>, ctx: &DomainCtx) -> FlowOutcome {
        // ========== 1. 可达性探测 ==========
        let link = match bounded_wait(
            "可达性探测",
            self.resolve_timeout,
            self.resolver.resolve(&ctx.domain),
        )
        .await
        {
            Ok(Some(url)) => url,
            Ok(None) => {
                warn!("{} ⚠️ 所有地址均不可达，写入空记录", ctx);
                return FlowOutcome::failed(None, FlowFault::Unreachable);
            }
            Err(e) => {
                warn!("{} ⚠️ {}，写入空记录", ctx, e);
                return FlowOutcome::failed(None, FlowFault::Unreachable);
            }
        };
        info!("{} 🔍 可达地址: {}", ctx, link);

        // ========== 2. 限时测量 ==========
        let target = MeasureTarget {
            rank: ctx.rank,
            domain: ctx.domain.clone(),
            url: link.clone(),
        };
        let result = bounded_wait(
            format!("{} 测量", self.measurer.name()),
            self.domain_timeout,
            self.measurer.measure(browser, &target),
        )
        .await;

        match result {
            Ok(Ok(vitals)) => {
                info!("{} ✓ {} 测量完成: {:?}", ctx, self.measurer.name(), vitals);
                FlowOutcome::measured(vitals, link)
            }
            Ok(Err(e)) => {
                let fault = FlowFault::Measure(e);
                if fault.requires_restart() {
                    error!("{} ❌ {}", ctx, fault);
                } else {
                    warn!("{} ⚠️ {}", ctx, fault);
                }
                FlowOutcome::failed(Some(link), fault)
            }
            Err(timed_out) => {
                error!("{} ❌ {}，浏览器可能已卡死", ctx, timed_out);
                FlowOutcome::failed(Some(link), FlowFault::DomainTimeout(timed_out))
            }
        }
    }
}
