//! 域名处理上下文
//!
//! 封装"我正在处理排名第几的哪个域名"这一信息

use std::fmt::Display;

use crate::models::RankedDomain;

/// 域名处理上下文
///
/// 只用于日志前缀
#[derive(Debug, Clone)]
pub struct DomainCtx {
    /// 排名
    pub rank: u64,

    /// 域名
    pub domain: String,

    /// 在本次输入序列中的位置（从1开始）
    pub index: u64,
}

impl DomainCtx {
    /// 创建新的域名上下文
    pub fn new(entry: &RankedDomain, index: u64) -> Self {
        Self {
            rank: entry.rank,
            domain: entry.domain.clone(),
            index,
        }
    }
}

impl Display for DomainCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[排名 #{} {}]", self.rank, self.domain)
    }
}
