use crate::browser::ChromiumLauncher;
use crate::clients::{CruxClient, PsiClient};
use crate::config::{Config, Pipeline, PipelinePaths};
use crate::infrastructure::BrowserSession;
use crate::orchestrator::{BatchProcessor, BatchStats};
use crate::resolver::{CachedResolver, HttpResolver, Resolver};
use crate::services::{
    CruxReporter, LighthouseAuditor, LighthouseCli, PsiReporter, VitalsMeasurer,
};
use crate::store::{read_ranked, RecordStore};
use crate::utils::logging::{append_run_summary, init_log_file, log_startup, print_final_stats};
use crate::workflow::DomainFlow;
use anyhow::{Context, Result};
use tracing::{info, warn};

/// 应用主结构
pub struct App {
    config: Config,
    pipeline: Pipeline,
}

impl App {
    pub fn new(config: Config, pipeline: Pipeline) -> Self {
        Self { config, pipeline }
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<BatchStats> {
        // 初始化日志文件
        init_log_file(&self.config.output_log_file, self.pipeline)?;
        log_startup(self.pipeline, self.config.from_rank, self.config.to_rank);

        let paths = self.config.pipeline_paths(self.pipeline);
        let mut processor = self.build_processor(&paths)?;

        // 加载排名列表（惰性读取）
        let tranco = self.config.tranco_csv();
        info!("\n📁 读取排名列表: {}", tranco.display());
        let domains = read_ranked(&tranco, self.config.from_rank, self.config.to_rank)?;

        let stats = processor.run(domains).await?;

        // 输出最终统计
        print_final_stats(&stats, &self.config.output_log_file);
        append_run_summary(&self.config.output_log_file, &stats)?;

        Ok(stats)
    }

    /// 运行直到完成、收到 Ctrl-C 或到达全局时限
    ///
    /// 已写入的行都已落盘，中断后下次运行会从断点继续。
    pub async fn run_until_shutdown(&self) -> Result<()> {
        let deadline = self.config.run_deadline();

        tokio::select! {
            result = self.run() => {
                result?;
            }
            _ = tokio::signal::ctrl_c() => {
                warn!("⚠️ 收到中断信号，停止处理");
            }
            _ = tokio::time::sleep(deadline) => {
                warn!("⚠️ 已运行 {} 小时，到达时限，停止处理", self.config.run_deadline_hours);
            }
        }

        Ok(())
    }

    fn build_processor(&self, paths: &PipelinePaths) -> Result<BatchProcessor> {
        let mut store = RecordStore::new(&paths.vitals, &paths.visited);
        if let Some(links_out) = &paths.links_out {
            store = store.with_links(links_out);
        }

        let flow = DomainFlow::new(
            self.build_resolver(paths)?,
            self.build_measurer()?,
            self.config.domain_timeout(),
            self.config.probe_timeout() * 4,
        );

        let session = self.pipeline.needs_browser().then(|| {
            BrowserSession::new(Box::new(ChromiumLauncher::new(
                self.config.chrome_executable.clone(),
            )))
        });

        Ok(BatchProcessor::new(store, flow, session))
    }

    fn build_resolver(&self, paths: &PipelinePaths) -> Result<Box<dyn Resolver>> {
        let probe = HttpResolver::new(
            self.config.probe_timeout(),
            self.config.probe_max_redirects,
        )
        .context("创建探测客户端失败")?;

        match &paths.links_cache {
            Some(cache) => {
                let cached = CachedResolver::from_table(cache, probe)?;
                info!("✓ 已加载 {} 条有效链接缓存", cached.len());
                Ok(Box::new(cached))
            }
            None => Ok(Box::new(probe)),
        }
    }

    fn build_measurer(&self) -> Result<Box<dyn VitalsMeasurer>> {
        if !self.pipeline.needs_browser() && self.config.google_api_key.is_none() {
            warn!("⚠️ 未设置 GOOGLE_CLOUD_API_KEY，所有 {} 结果都将为空", self.pipeline);
        }

        let measurer: Box<dyn VitalsMeasurer> = match self.pipeline {
            Pipeline::Lighthouse => Box::new(LighthouseAuditor::new(
                Box::new(LighthouseCli::new(&self.config.lighthouse_bin)),
                self.config.audit_timeout(),
            )),
            Pipeline::Crux => Box::new(CruxReporter::new(CruxClient::new(
                self.remote_http()?,
                &self.config.crux_endpoint,
                self.config.google_api_key.clone(),
            ))),
            Pipeline::Psi => Box::new(PsiReporter::new(PsiClient::new(
                self.remote_http()?,
                &self.config.psi_endpoint,
                self.config.google_api_key.clone(),
            ))),
        };
        Ok(measurer)
    }

    fn remote_http(&self) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.config.domain_timeout())
            .build()
            .context("创建 API 客户端失败")
    }
}
