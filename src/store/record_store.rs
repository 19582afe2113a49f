//! 一次批次运行所使用的表集合

use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::StoreResult;
use crate::models::{OutputRecord, ResolvedLink};
use crate::store::csv_table::{append_row, count_rows, init_table};

/// 结果表表头
pub const VITALS_HEADER: [&str; 5] = ["Rank", "Domain", "LCP", "FID", "CLS"];
/// 有效链接表表头
pub const LINKS_HEADER: [&str; 2] = ["Domain", "ValidLink"];
/// 访问日志表头
pub const VISITED_HEADER: [&str; 1] = ["Domain"];

/// 续跑计数
///
/// - `success`: 结果表中已有的行数
/// - `visited`: 访问日志中已有的行数
///
/// 正常情况下 `visited - success` 为 0 或 1；为 1 时说明上次运行在测量
/// 途中崩溃，需要为该域名补一条空记录。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResumeCounters {
    pub success: u64,
    pub visited: u64,
}

/// 结果表、访问日志与（可选的）有效链接表
#[derive(Debug, Clone)]
pub struct RecordStore {
    vitals_path: PathBuf,
    visited_path: PathBuf,
    links_path: Option<PathBuf>,
}

impl RecordStore {
    pub fn new(vitals_path: impl Into<PathBuf>, visited_path: impl Into<PathBuf>) -> Self {
        Self {
            vitals_path: vitals_path.into(),
            visited_path: visited_path.into(),
            links_path: None,
        }
    }

    /// 同时记录可达性探测结果
    pub fn with_links(mut self, links_path: impl Into<PathBuf>) -> Self {
        self.links_path = Some(links_path.into());
        self
    }

    pub fn vitals_path(&self) -> &Path {
        &self.vitals_path
    }

    pub fn visited_path(&self) -> &Path {
        &self.visited_path
    }

    pub fn links_path(&self) -> Option<&Path> {
        self.links_path.as_deref()
    }

    /// 创建缺失的表（已有的表保持不变）
    pub fn initialize(&self) -> StoreResult<()> {
        init_table(&self.vitals_path, &VITALS_HEADER)?;
        init_table(&self.visited_path, &VISITED_HEADER)?;
        if let Some(links_path) = &self.links_path {
            init_table(links_path, &LINKS_HEADER)?;
        }
        Ok(())
    }

    /// 从已落盘的行数恢复续跑计数
    pub fn load_counters(&self) -> StoreResult<ResumeCounters> {
        let counters = ResumeCounters {
            success: count_rows(&self.vitals_path)?,
            visited: count_rows(&self.visited_path)?,
        };
        info!(
            "续跑计数: 已写入 {} 行, 已访问 {} 个域名",
            counters.success, counters.visited
        );
        Ok(counters)
    }

    pub fn append_result(&self, record: &OutputRecord) -> StoreResult<()> {
        append_row(&self.vitals_path, record.to_fields())
    }

    /// 在测量开始前记录访问
    pub fn mark_visited(&self, domain: &str) -> StoreResult<()> {
        append_row(&self.visited_path, [domain])
    }

    /// 未配置链接表时什么也不做
    pub fn append_link(&self, link: &ResolvedLink) -> StoreResult<()> {
        match &self.links_path {
            Some(path) => append_row(path, link.to_fields()),
            None => Ok(()),
        }
    }
}
