//! 排名域名与输出记录

use std::fmt::Display;

use crate::models::vitals::VitalsResult;

/// 排名列表中的一条记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedDomain {
    /// 排名（从 1 开始）
    pub rank: u64,
    /// 裸域名，不带协议
    pub domain: String,
}

impl RankedDomain {
    pub fn new(rank: u64, domain: impl Into<String>) -> Self {
        Self {
            rank,
            domain: domain.into(),
        }
    }
}

impl Display for RankedDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{} {}", self.rank, self.domain)
    }
}

/// 写入结果表的一行
#[derive(Debug, Clone, PartialEq)]
pub struct OutputRecord {
    pub rank: u64,
    pub domain: String,
    pub vitals: VitalsResult,
}

impl OutputRecord {
    pub fn new(entry: &RankedDomain, vitals: VitalsResult) -> Self {
        Self {
            rank: entry.rank,
            domain: entry.domain.clone(),
            vitals,
        }
    }

    /// 全空记录（测量失败或跳过时使用）
    pub fn null(entry: &RankedDomain) -> Self {
        Self::new(entry, VitalsResult::null())
    }

    /// 转换为 CSV 字段：`Rank,Domain,LCP,FID,CLS`
    pub fn to_fields(&self) -> [String; 5] {
        let [lcp, fid, cls] = self.vitals.to_fields();
        [self.rank.to_string(), self.domain.clone(), lcp, fid, cls]
    }
}

/// 可达性探测结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLink {
    pub domain: String,
    /// `None` 表示所有前缀都不可达
    pub url: Option<String>,
}

impl ResolvedLink {
    pub fn new(domain: impl Into<String>, url: Option<String>) -> Self {
        Self {
            domain: domain.into(),
            url,
        }
    }

    /// 转换为 CSV 字段：`Domain,ValidLink`
    pub fn to_fields(&self) -> [String; 2] {
        [
            self.domain.clone(),
            self.url
                .clone()
                .unwrap_or_else(|| crate::models::vitals::NULL_MARKER.to_string()),
        ]
    }
}
