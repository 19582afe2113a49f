//! 程序配置
//!
//! 加载顺序：默认值 → TOML 配置文件（可选）→ 环境变量 → 校验。

use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::ConfigError;

/// 测量管线
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pipeline {
    /// 本地无头浏览器 + Lighthouse
    Lighthouse,
    /// Chrome UX Report API
    Crux,
    /// PageSpeed Insights API
    Psi,
}

impl Pipeline {
    /// 是否需要共享浏览器
    pub fn needs_browser(&self) -> bool {
        matches!(self, Pipeline::Lighthouse)
    }
}

impl Display for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Pipeline::Lighthouse => "Lighthouse",
            Pipeline::Crux => "CrUX",
            Pipeline::Psi => "PSI",
        };
        f.write_str(name)
    }
}

/// 某条管线使用的表文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelinePaths {
    /// 结果表
    pub vitals: PathBuf,
    /// 访问日志
    pub visited: PathBuf,
    /// 本管线写入的有效链接表
    pub links_out: Option<PathBuf>,
    /// 本管线读取的有效链接缓存
    pub links_cache: Option<PathBuf>,
}

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 数据目录
    pub data_dir: PathBuf,
    /// 排名列表路径，缺省为 `data_dir/top-1m.csv`
    pub tranco_csv_path: Option<PathBuf>,
    /// 起始排名（含）
    pub from_rank: u64,
    /// 结束排名（含）
    pub to_rank: u64,
    /// 单个域名的测量时限
    pub domain_timeout_secs: u64,
    /// 单次 Lighthouse 审计时限
    pub audit_timeout_secs: u64,
    /// 单次可达性探测时限
    pub probe_timeout_secs: u64,
    /// 可达性探测允许的最大重定向次数
    pub probe_max_redirects: usize,
    /// 整次运行的时限
    pub run_deadline_hours: u64,
    // --- Google API 配置 ---
    pub google_api_key: Option<String>,
    pub crux_endpoint: String,
    pub psi_endpoint: String,
    // --- 浏览器配置 ---
    pub lighthouse_bin: String,
    pub chrome_executable: Option<PathBuf>,
    /// 运行日志文件
    pub output_log_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            tranco_csv_path: None,
            from_rank: 1,
            to_rank: 100_000,
            domain_timeout_secs: 60,
            audit_timeout_secs: 30,
            probe_timeout_secs: 5,
            probe_max_redirects: 5,
            run_deadline_hours: 6,
            google_api_key: None,
            crux_endpoint: "https://chromeuxreport.googleapis.com/v1/records:queryRecord"
                .to_string(),
            psi_endpoint: "https://www.googleapis.com/pagespeedonline/v5/runPagespeed"
                .to_string(),
            lighthouse_bin: "lighthouse".to_string(),
            chrome_executable: None,
            output_log_file: PathBuf::from("output.txt"),
        }
    }
}

impl Config {
    /// 从默认值、可选的配置文件与环境变量加载配置
    ///
    /// 不做校验：命令行覆盖排名区间之后再调用 [`Config::validate`]。
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_with(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// 仅从环境变量加载（其余取默认值）并校验
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self::load(None)?;
        config.validate()?;
        Ok(config)
    }

    /// 用命令行给出的排名区间覆盖配置
    pub fn with_rank_overrides(mut self, from: Option<u64>, to: Option<u64>) -> Self {
        if let Some(from) = from {
            self.from_rank = from;
        }
        if let Some(to) = to {
            self.to_rank = to;
        }
        self
    }

    /// 读取 TOML 配置文件，未出现的字段取默认值
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileReadFailed {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::TomlParseFailed {
            path: path.display().to_string(),
            source: e,
        })?;
        info!("✓ 已加载配置文件 {}", path.display());
        Ok(config)
    }

    /// 用环境变量覆盖配置
    ///
    /// `lookup` 按变量名返回取值，便于测试时替换进程环境。
    pub fn apply_env_with(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(v) = lookup("DATA_DIR") {
            self.data_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("TRANCO_CSV_PATH") {
            self.tranco_csv_path = Some(PathBuf::from(v));
        }
        if let Some(v) = parse_var(&lookup, "FROM_RANK", "u64")? {
            self.from_rank = v;
        }
        if let Some(v) = parse_var(&lookup, "TO_RANK", "u64")? {
            self.to_rank = v;
        }
        if let Some(v) = parse_var(&lookup, "DOMAIN_TIMEOUT_SECS", "u64")? {
            self.domain_timeout_secs = v;
        }
        if let Some(v) = parse_var(&lookup, "AUDIT_TIMEOUT_SECS", "u64")? {
            self.audit_timeout_secs = v;
        }
        if let Some(v) = parse_var(&lookup, "PROBE_TIMEOUT_SECS", "u64")? {
            self.probe_timeout_secs = v;
        }
        if let Some(v) = parse_var(&lookup, "PROBE_MAX_REDIRECTS", "usize")? {
            self.probe_max_redirects = v;
        }
        if let Some(v) = parse_var(&lookup, "RUN_DEADLINE_HOURS", "u64")? {
            self.run_deadline_hours = v;
        }
        if let Some(v) = lookup("GOOGLE_CLOUD_API_KEY").filter(|v| !v.trim().is_empty()) {
            self.google_api_key = Some(v);
        }
        if let Some(v) = lookup("CRUX_ENDPOINT") {
            self.crux_endpoint = v;
        }
        if let Some(v) = lookup("PSI_ENDPOINT") {
            self.psi_endpoint = v;
        }
        if let Some(v) = lookup("LIGHTHOUSE_BIN") {
            self.lighthouse_bin = v;
        }
        if let Some(v) = lookup("CHROME_EXECUTABLE") {
            self.chrome_executable = Some(PathBuf::from(v));
        }
        if let Some(v) = lookup("OUTPUT_LOG_FILE") {
            self.output_log_file = PathBuf::from(v);
        }
        Ok(())
    }

    /// 校验排名区间
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.from_rank == 0 || self.from_rank > self.to_rank {
            return Err(ConfigError::InvalidRankRange {
                from: self.from_rank,
                to: self.to_rank,
            });
        }
        debug!("配置校验通过: 排名 {}-{}", self.from_rank, self.to_rank);
        Ok(())
    }

    pub fn tranco_csv(&self) -> PathBuf {
        self.tranco_csv_path
            .clone()
            .unwrap_or_else(|| self.data_dir.join("top-1m.csv"))
    }

    pub fn domain_timeout(&self) -> Duration {
        Duration::from_secs(self.domain_timeout_secs)
    }

    pub fn audit_timeout(&self) -> Duration {
        Duration::from_secs(self.audit_timeout_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn run_deadline(&self) -> Duration {
        Duration::from_secs(self.run_deadline_hours.saturating_mul(60 * 60))
    }

    /// 各管线的表文件布局
    ///
    /// 浏览器管线复用 CrUX 管线写下的有效链接表。
    pub fn pipeline_paths(&self, pipeline: Pipeline) -> PipelinePaths {
        let util = self.data_dir.join("util");
        let valid_links = util.join("ValidLinks.csv");
        match pipeline {
            Pipeline::Lighthouse => PipelinePaths {
                vitals: self.data_dir.join("CoreWebVitalsReportLighthouse.csv"),
                visited: util.join("CrawlerVisited.csv"),
                links_out: None,
                links_cache: Some(valid_links),
            },
            Pipeline::Crux => PipelinePaths {
                vitals: self.data_dir.join("CoreWebVitalsReportCrUX.csv"),
                visited: util.join("CruxVisited.csv"),
                links_out: Some(valid_links),
                links_cache: None,
            },
            Pipeline::Psi => PipelinePaths {
                vitals: self.data_dir.join("CoreWebVitalsReportPSI.csv"),
                visited: util.join("PsiVisited.csv"),
                links_out: None,
                links_cache: None,
            },
        }
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    expected_type: &str,
) -> Result<Option<T>, ConfigError> {
    let Some(value) = lookup(name) else {
        return Ok(None);
    };
    value
        .trim()
        .parse()
        .map(Some)
        .map_err(|_| ConfigError::EnvVarParseFailed {
            var_name: name.to_string(),
            value,
            expected_type: expected_type.to_string(),
        })
}
