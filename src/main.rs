use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use cwv_crawler::{logger, App, Config, Pipeline};
use tracing::{error, info};

/// Core Web Vitals 批量采集
///
/// 从排名列表中读取域名，逐个测量 LCP / FID / CLS 并写入 CSV。
/// 中断后重新运行会从断点继续。
#[derive(Parser, Debug)]
#[command(name = "cwv-crawler")]
#[command(version)]
#[command(about = "Core Web Vitals 批量采集", long_about = None)]
struct Cli {
    #[command(subcommand)]
    pipeline: PipelineCommand,

    /// TOML 配置文件
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// 起始排名（含），覆盖配置
    #[arg(long, global = true)]
    from: Option<u64>,

    /// 结束排名（含），覆盖配置
    #[arg(long, global = true)]
    to: Option<u64>,

    /// 显示调试日志
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum PipelineCommand {
    /// 本地无头浏览器 + Lighthouse
    Lighthouse,
    /// Chrome UX Report API
    Crux,
    /// PageSpeed Insights API
    Psi,
}

impl From<PipelineCommand> for Pipeline {
    fn from(command: PipelineCommand) -> Self {
        match command {
            PipelineCommand::Lighthouse => Pipeline::Lighthouse,
            PipelineCommand::Crux => Pipeline::Crux,
            PipelineCommand::Psi => Pipeline::Psi,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 初始化日志，配置加载阶段的输出也要可见
    logger::init(cli.verbose);

    // 加载配置，命令行覆盖之后统一校验一次
    let config =
        Config::load(cli.config.as_deref())?.with_rank_overrides(cli.from, cli.to);
    if let Err(e) = config.validate() {
        error!("❌ 配置无效: {}", e);
        return Err(e.into());
    }

    let app = App::new(config, cli.pipeline.into());
    if let Err(e) = app.run_until_shutdown().await {
        error!("❌ 运行失败: {:#}", e);
        return Err(e);
    }

    info!("程序结束");
    Ok(())
}
