use anyhow::Result;
/// 日志工具模块
///
/// 提供运行日志文件与横幅输出的辅助函数
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use tracing::info;

use crate::config::Pipeline;
use crate::orchestrator::BatchStats;
use crate::store::ResumeCounters;

/// 初始化运行日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
/// - `pipeline`: 本次运行的测量管线
pub fn init_log_file(log_file_path: &Path, pipeline: Pipeline) -> Result<()> {
    if let Some(parent) = log_file_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
    {
        fs::create_dir_all(parent)?;
    }

    let log_header = format!(
        "{}\nCore Web Vitals 采集日志 ({}) - {}\n{}\n\n",
        "=".repeat(60),
        pipeline,
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)?;
    Ok(())
}

/// 记录程序启动信息
///
/// # 参数
/// - `pipeline`: 测量管线
/// - `from_rank` / `to_rank`: 排名区间
pub fn log_startup(pipeline: Pipeline, from_rank: u64, to_rank: u64) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - {} 管线", pipeline);
    info!("📊 排名区间: {} - {}", from_rank, to_rank);
    info!("{}", "=".repeat(60));
}

/// 记录续跑位置
pub fn log_resume(counters: &ResumeCounters) {
    if counters.success == 0 && counters.visited == 0 {
        info!("📋 全新运行，从第一个域名开始");
        return;
    }
    info!(
        "📋 续跑: 跳过前 {} 个已记录的域名 (已访问 {})",
        counters.success, counters.visited
    );
    if counters.visited > counters.success {
        info!("💡 上次运行在测量途中中断，将为中断的域名补写空记录");
    }
}

/// 将本次运行的统计追加到日志文件
pub fn append_run_summary(log_file_path: &Path, stats: &BatchStats) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)?;
    writeln!(
        file,
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    )?;
    writeln!(file, "{}", stats)?;
    Ok(())
}

/// 打印最终统计信息
///
/// # 参数
/// - `stats`: 批次统计
/// - `log_file_path`: 日志文件路径
pub fn print_final_stats(stats: &BatchStats, log_file_path: &Path) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 测得指标: {}/{}", stats.measured, stats.total);
    info!("❌ 空记录: {} (其中不可达 {})", stats.null_records, stats.unreachable);
    info!("⏭ 跳过: {}, 补写: {}", stats.skipped, stats.backfilled);
    info!("🔄 浏览器重启: {}", stats.restarts);
    info!("{}", "=".repeat(60));
    info!("\n日志已保存至: {}", log_file_path.display());
}
