//! CSV 表的基础操作：初始化、追加、计数

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::{StoreError, StoreResult};
use crate::models::vitals::NULL_MARKER;

/// 初始化表文件
///
/// 已有内容的文件不会覆盖，重复调用无副作用。空文件（崩溃残留或手工创建）
/// 视为不存在，会重新写入表头。
pub fn init_table(path: &Path, header: &[&str]) -> StoreResult<()> {
    match fs::metadata(path) {
        Ok(meta) if meta.len() > 0 => {
            info!("{} 已存在，不会覆盖", path.display());
            return Ok(());
        }
        Ok(_) => warn!("⚠️ {} 是空文件，重新写入表头", path.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(StoreError::io(path, e)),
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
    }

    let file = File::create(path).map_err(|e| StoreError::io(path, e))?;
    let mut writer = csv::Writer::from_writer(file);
    writer
        .write_record(header)
        .map_err(|e| StoreError::csv(path, e))?;
    let file = writer
        .into_inner()
        .map_err(|e| StoreError::io(path, e.into_error()))?;
    file.sync_data().map_err(|e| StoreError::io(path, e))?;

    info!("✓ 已初始化 {} (表头: {})", path.display(), header.join(","));
    Ok(())
}

/// 追加一行并同步到磁盘
///
/// 不做批量缓冲：进程随时可能被杀死，续跑依赖已落盘的行数。
pub fn append_row<I, T>(path: &Path, fields: I) -> StoreResult<()>
where
    I: IntoIterator<Item = T>,
    T: AsRef<[u8]>,
{
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| StoreError::io(path, e))?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_writer(file);
    writer
        .write_record(fields)
        .map_err(|e| StoreError::csv(path, e))?;

    let file = writer
        .into_inner()
        .map_err(|e| StoreError::io(path, e.into_error()))?;
    file.sync_data().map_err(|e| StoreError::io(path, e))?;

    debug!("已追加一行到 {}", path.display());
    Ok(())
}

/// 统计数据行数（不含表头），文件不存在时返回 0
pub fn count_rows(path: &Path) -> StoreResult<u64> {
    if !path.exists() {
        return Ok(0);
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| StoreError::csv(path, e))?;

    let mut rows = 0;
    for record in reader.byte_records() {
        record.map_err(|e| StoreError::csv(path, e))?;
        rows += 1;
    }
    Ok(rows)
}

/// 读取有效链接表：域名 -> 可达 URL（`None` 表示已知不可达）
pub fn read_links(path: &Path) -> StoreResult<HashMap<String, Option<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| StoreError::csv(path, e))?;

    let mut links = HashMap::new();
    for record in reader.records() {
        let record = record.map_err(|e| StoreError::csv(path, e))?;
        let (Some(domain), Some(link)) = (record.get(0), record.get(1)) else {
            continue;
        };
        let link = link.trim();
        let url = (!link.is_empty() && link != NULL_MARKER).then(|| link.to_string());
        links.insert(domain.trim().to_string(), url);
    }

    info!("从 {} 读取了 {} 条有效链接记录", path.display(), links.len());
    Ok(links)
}
