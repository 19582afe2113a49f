//! Lighthouse 审计引擎
//!
//! 以子进程方式运行 `lighthouse` CLI，连接到已有浏览器的调试端口，
//! 从 stdout 读取 JSON 报告。

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::models::LighthouseReport;

/// 审计引擎
#[async_trait]
pub trait AuditEngine: Send + Sync {
    /// 对 `url` 运行一次性能审计
    ///
    /// 任何失败都记录日志并返回 `None`。
    async fn run(&self, url: &str, port: u16) -> Option<LighthouseReport>;
}

/// Lighthouse CLI
pub struct LighthouseCli {
    bin: String,
}

impl LighthouseCli {
    pub fn new(bin: impl Into<String>) -> Self {
        Self { bin: bin.into() }
    }

    /// 固定的桌面端审计参数
    pub fn args(url: &str, port: u16) -> Vec<String> {
        vec![
            url.to_string(),
            format!("--port={}", port),
            "--output=json".to_string(),
            "--output-path=stdout".to_string(),
            "--quiet".to_string(),
            "--only-categories=performance".to_string(),
            "--form-factor=desktop".to_string(),
            "--screenEmulation.mobile=false".to_string(),
            "--screenEmulation.width=1350".to_string(),
            "--screenEmulation.height=940".to_string(),
            "--screenEmulation.deviceScaleFactor=1".to_string(),
            "--screenEmulation.disabled=false".to_string(),
            "--throttling.rttMs=40".to_string(),
            "--throttling.throughputKbps=10240".to_string(),
            "--throttling.cpuSlowdownMultiplier=1".to_string(),
            "--throttling.requestLatencyMs=20".to_string(),
            "--throttling.downloadThroughputKbps=10240".to_string(),
            "--throttling.uploadThroughputKbps=10240".to_string(),
        ]
    }
}

#[async_trait]
impl AuditEngine for LighthouseCli {
    async fn run(&self, url: &str, port: u16) -> Option<LighthouseReport> {
        debug!("运行 {} (端口 {}): {}", self.bin, port, url);

        // 超时后 future 被丢弃，子进程随之被杀掉
        let output = Command::new(&self.bin)
            .args(Self::args(url, port))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await;

        let output = match output {
            Ok(output) => output,
            Err(e) => {
                warn!("⚠️ 无法启动 Lighthouse ({}): {}", self.bin, e);
                return None;
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(
                "⚠️ Lighthouse 退出码 {:?}: {}",
                output.status.code(),
                stderr.lines().last().unwrap_or_default()
            );
            return None;
        }

        match serde_json::from_slice::<LighthouseReport>(&output.stdout) {
            Ok(report) => Some(report),
            Err(e) => {
                warn!("⚠️ 无法解析 Lighthouse 报告: {}", e);
                None
            }
        }
    }
}
