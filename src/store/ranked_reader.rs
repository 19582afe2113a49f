//! 排名列表的惰性读取
//!
//! 列表可能有上百万行，因此只按需逐行解析，不一次性加载。

use std::fs::File;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};
use crate::models::RankedDomain;

/// 按排名区间过滤后的域名序列
///
/// 只能遍历一次。格式错误的行会被记录并跳过；底层 I/O 错误会作为
/// `Err` 产出一次，随后序列结束。
pub struct RankedDomains {
    records: csv::StringRecordsIntoIter<File>,
    path: PathBuf,
    from_rank: u64,
    to_rank: u64,
    finished: bool,
}

/// 打开排名列表，返回 `[from_rank, to_rank]` 闭区间内的域名序列
///
/// 上游列表按排名升序排列，因此遇到第一个超出上界的排名即停止读取。
pub fn read_ranked(path: &Path, from_rank: u64, to_rank: u64) -> StoreResult<RankedDomains> {
    let reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| StoreError::csv(path, e))?;

    debug!(
        "打开排名列表 {}，区间 [{}, {}]",
        path.display(),
        from_rank,
        to_rank
    );

    Ok(RankedDomains {
        records: reader.into_records(),
        path: path.to_path_buf(),
        from_rank,
        to_rank,
        finished: false,
    })
}

impl Iterator for RankedDomains {
    type Item = StoreResult<RankedDomain>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            let record = match self.records.next() {
                Some(Ok(record)) => record,
                Some(Err(e)) if e.is_io_error() => {
                    self.finished = true;
                    return Some(Err(StoreError::csv(&self.path, e)));
                }
                Some(Err(e)) => {
                    warn!("⚠️ 跳过无法解析的行 ({}): {}", self.path.display(), e);
                    continue;
                }
                None => {
                    self.finished = true;
                    return None;
                }
            };

            let line = record.position().map(|p| p.line()).unwrap_or_default();
            let entry = match parse_row(&record) {
                Ok(entry) => entry,
                Err(_) if line == 1 && is_header(&record) => continue,
                Err(reason) => {
                    warn!(
                        "⚠️ 跳过格式错误的行 {}:{} ({})",
                        self.path.display(),
                        line,
                        reason
                    );
                    continue;
                }
            };

            if entry.rank < self.from_rank {
                continue;
            }
            if entry.rank > self.to_rank {
                self.finished = true;
                return None;
            }
            return Some(Ok(entry));
        }
    }
}

fn is_header(record: &csv::StringRecord) -> bool {
    record
        .get(0)
        .is_some_and(|field| field.eq_ignore_ascii_case("rank"))
}

fn parse_row(record: &csv::StringRecord) -> Result<RankedDomain, String> {
    let (Some(rank), Some(domain)) = (record.get(0), record.get(1)) else {
        return Err(format!("字段数不足: {}", record.len()));
    };

    let rank: u64 = rank
        .parse()
        .map_err(|_| format!("排名不是整数: '{}'", rank))?;
    if rank == 0 {
        return Err("排名必须从 1 开始".to_string());
    }
    if domain.is_empty() || domain.contains("://") {
        return Err(format!("域名非法: '{}'", domain));
    }

    Ok(RankedDomain::new(rank, domain))
}
