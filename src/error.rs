use std::path::Path;
use std::time::Duration;

use thiserror::Error;

/// 应用程序错误类型
///
/// 只有会中止整个批次的错误才会出现在这里：存储、浏览器启动、配置。
/// 单个域名的测量故障在流程层被折叠为空记录，不会上抛。
#[derive(Debug, Error)]
pub enum AppError {
    /// 存储相关错误（致命）
    #[error("存储错误: {0}")]
    Store(#[from] StoreError),
    /// 浏览器相关错误（仅批次开始时的启动失败会上抛）
    #[error("浏览器错误: {0}")]
    Browser(#[from] BrowserError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 存储相关错误
#[derive(Debug, Error)]
pub enum StoreError {
    /// 文件读写失败
    #[error("文件操作失败 ({path}): {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// CSV 读写失败
    #[error("CSV 操作失败 ({path}): {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
}

/// 浏览器相关错误
#[derive(Debug, Error)]
pub enum BrowserError {
    /// 浏览器配置失败
    #[error("浏览器配置失败: {reason}")]
    ConfigurationFailed { reason: String },
    /// 启动浏览器失败
    #[error("启动浏览器失败: {source}")]
    LaunchFailed {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 当前没有存活的浏览器
    #[error("浏览器未运行")]
    NotRunning,
    /// 无法从调试地址中解析端口
    #[error("无法解析浏览器调试端口: {endpoint}")]
    EndpointUnavailable { endpoint: String },
    /// 创建页面失败
    #[error("创建页面失败: {source}")]
    PageCreationFailed {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 导航失败
    #[error("导航到 {url} 失败: {source}")]
    NavigationFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 读取页面状态失败（CDP 通信故障）
    #[error("读取页面状态失败: {source}")]
    PageInspectionFailed {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 关闭浏览器或页面失败
    #[error("关闭失败: {source}")]
    CloseFailed {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl BrowserError {
    /// 是否意味着共享浏览器可能已不可用
    ///
    /// 导航失败只说明目标站点有问题，浏览器本身仍然健康。
    pub fn is_resource_fault(&self) -> bool {
        !matches!(self, BrowserError::NavigationFailed { .. })
    }
}

/// 单个域名测量错误
#[derive(Debug, Error)]
pub enum MeasureError {
    /// 浏览器故障
    #[error(transparent)]
    Browser(#[from] BrowserError),
    /// 性能审计超时
    #[error("性能审计超时 ({url}, 限时 {}s)", .limit.as_secs())]
    ProfilingTimeout { url: String, limit: Duration },
    /// 审计引擎没有返回报告
    #[error("性能审计未能产出报告: {url}")]
    AuditUnavailable { url: String },
}

impl MeasureError {
    /// 该故障是否需要重启浏览器
    pub fn requires_restart(&self) -> bool {
        match self {
            MeasureError::Browser(e) => e.is_resource_fault(),
            MeasureError::ProfilingTimeout { .. } | MeasureError::AuditUnavailable { .. } => false,
        }
    }
}

/// 远程指标 API 错误
///
/// 只在远程适配器内部使用，适配器会将其折叠为全空结果。
#[derive(Debug, Error)]
pub enum RemoteApiError {
    /// 缺少 API Key
    #[error("缺少 API Key ({endpoint})")]
    MissingApiKey { endpoint: String },
    /// 网络请求失败
    #[error("API请求失败 ({endpoint}): {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// API 返回错误状态（包括配额耗尽）
    #[error("API返回错误响应 ({endpoint}): status={status}")]
    BadStatus { endpoint: String, status: u16 },
    /// 响应结构不符合预期
    #[error("API响应格式错误 ({endpoint}): {reason}")]
    MalformedResponse { endpoint: String, reason: String },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 读取配置文件失败
    #[error("读取配置文件失败 ({path}): {source}")]
    FileReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 排名区间非法
    #[error("排名区间非法: from={from}, to={to} (要求 1 <= from <= to)")]
    InvalidRankRange { from: u64, to: u64 },
}

// ========== 便捷构造函数 ==========

impl StoreError {
    /// 创建文件读写错误
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.display().to_string(),
            source,
        }
    }

    /// 创建 CSV 读写错误
    pub fn csv(path: &Path, source: csv::Error) -> Self {
        StoreError::Csv {
            path: path.display().to_string(),
            source,
        }
    }
}

impl BrowserError {
    /// 创建浏览器启动错误
    pub fn launch_failed(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        BrowserError::LaunchFailed {
            source: Box::new(source),
        }
    }

    /// 创建导航错误
    pub fn navigation_failed(
        url: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        BrowserError::NavigationFailed {
            url: url.into(),
            source: Box::new(source),
        }
    }
}

impl RemoteApiError {
    /// 创建API请求失败错误
    pub fn request_failed(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        RemoteApiError::RequestFailed {
            endpoint: endpoint.into(),
            source,
        }
    }

    /// 创建响应格式错误
    pub fn malformed(endpoint: impl Into<String>, reason: impl Into<String>) -> Self {
        RemoteApiError::MalformedResponse {
            endpoint: endpoint.into(),
            reason: reason.into(),
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
/// 存储层结果类型
pub type StoreResult<T> = Result<T, StoreError>;
/// 浏览器层结果类型
pub type BrowserResult<T> = Result<T, BrowserError>;
/// 测量结果类型
pub type MeasureResult<T> = Result<T, MeasureError>;
