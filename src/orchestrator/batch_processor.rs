//! 批量域名处理器 - 编排层
//!
//! ## 核心流程（每个域名，`index` 从 1 开始）
//!
//! 1. `index <= success`：已记录，跳过
//! 2. `success < visited`：上次运行在测量途中崩溃，补写空记录，不再访问
//! 3. 落盘访问记录，`visited += 1`
//! 4. 交给 [`DomainFlow`] 探测并限时测量
//! 5. 写入结果（失败时为空记录），`success += 1`
//! 6. 资源类故障时重启浏览器；重启失败只记录日志
//!
//! 存储错误是致命的，直接返回给调用方。

use std::fmt::Display;

use tracing::{error, info, warn};

use crate::error::{AppResult, StoreResult};
use crate::infrastructure::BrowserSession;
use crate::models::{OutputRecord, RankedDomain, ResolvedLink};
use crate::store::{RecordStore, ResumeCounters};
use crate::utils::logging::log_resume;
use crate::workflow::{DomainCtx, DomainFlow, FlowFault};

/// 处理统计
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchStats {
    /// 输入序列中的域名数
    pub total: u64,
    /// 至少测得一项指标
    pub measured: u64,
    /// 写入的全空记录（含补写）
    pub null_records: u64,
    /// 续跑时跳过的已记录域名
    pub skipped: u64,
    /// 为崩溃时正在测量的域名补写的空记录
    pub backfilled: u64,
    /// 不可达的域名
    pub unreachable: u64,
    /// 浏览器重启次数
    pub restarts: u64,
}

impl BatchStats {
    /// 本次运行写入的行数
    pub fn written(&self) -> u64 {
        self.total - self.skipped
    }
}

impl Display for BatchStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "域名总数: {}", self.total)?;
        writeln!(f, "测得指标: {}", self.measured)?;
        writeln!(
            f,
            "空记录: {} (不可达 {}, 补写 {})",
            self.null_records, self.unreachable, self.backfilled
        )?;
        writeln!(f, "跳过: {}", self.skipped)?;
        write!(f, "浏览器重启: {}", self.restarts)
    }
}

/// 批量域名处理器
///
/// 唯一持有浏览器会话的模块；远程 API 管线没有会话。
pub struct BatchProcessor {
    store: RecordStore,
    flow: DomainFlow,
    session: Option<BrowserSession>,
}

impl BatchProcessor {
    pub fn new(store: RecordStore, flow: DomainFlow, session: Option<BrowserSession>) -> Self {
        Self {
            store,
            flow,
            session,
        }
    }

    /// 处理整个域名序列
    ///
    /// 浏览器在循环开始前获取一次（失败即中止），结束后释放一次。
    pub async fn run<I>(&mut self, domains: I) -> AppResult<BatchStats>
    where
        I: IntoIterator<Item = StoreResult<RankedDomain>>,
    {
        self.store.initialize()?;
        let mut counters = self.store.load_counters()?;
        log_resume(&counters);

        if let Some(session) = self.session.as_mut() {
            session.acquire().await?;
        }

        let mut stats = BatchStats::default();
        let result = self.process_all(domains, &mut counters, &mut stats).await;

        if let Some(session) = self.session.as_mut() {
            session.release().await;
        }

        result?;
        Ok(stats)
    }

    async fn process_all<I>(
        &mut self,
        domains: I,
        counters: &mut ResumeCounters,
        stats: &mut BatchStats,
    ) -> AppResult<()>
    where
        I: IntoIterator<Item = StoreResult<RankedDomain>>,
    {
        for (position, entry) in domains.into_iter().enumerate() {
            let entry = entry?;
            let index = position as u64 + 1;
            stats.total += 1;

            if index <= counters.success {
                stats.skipped += 1;
                continue;
            }

            let ctx = DomainCtx::new(&entry, index);

            if counters.success < counters.visited {
                warn!("{} ⚠️ 上次运行在测量途中中断，补写空记录", ctx);
                self.record(&entry, OutputRecord::null(&entry), None)?;
                counters.success += 1;
                stats.backfilled += 1;
                stats.null_records += 1;
                continue;
            }

            self.store.mark_visited(&entry.domain)?;
            counters.visited += 1;

            info!("{} 🚀 开始处理 (第 {} 个)", ctx, index);
            let browser = self.session.as_ref().and_then(BrowserSession::handle);
            let outcome = self.flow.run(browser, &ctx).await;

            let restart = outcome.requires_restart();
            let record = OutputRecord::new(&entry, outcome.vitals);
            if record.vitals.is_null() {
                stats.null_records += 1;
            } else {
                stats.measured += 1;
            }
            if matches!(outcome.fault, Some(FlowFault::Unreachable)) {
                stats.unreachable += 1;
            }

            self.record(&entry, record, outcome.link)?;
            counters.success += 1;

            if restart {
                self.restart_browser(&ctx, stats).await;
            }
        }

        Ok(())
    }

    /// 写入结果行与（可选的）有效链接行
    fn record(
        &self,
        entry: &RankedDomain,
        record: OutputRecord,
        link: Option<String>,
    ) -> StoreResult<()> {
        self.store.append_result(&record)?;
        self.store
            .append_link(&ResolvedLink::new(entry.domain.clone(), link))
    }

    async fn restart_browser(&mut self, ctx: &DomainCtx, stats: &mut BatchStats) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        stats.restarts += 1;
        match session.restart().await {
            Ok(()) => info!("{} ✓ 浏览器已重启", ctx),
            Err(e) => error!("{} ❌ 浏览器重启失败，后续域名将继续尝试: {}", ctx, e),
        }
    }
}
