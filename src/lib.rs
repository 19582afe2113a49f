//! # CWV Crawler
//!
//! 批量采集 Core Web Vitals（LCP / FID / CLS）的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（浏览器），只暴露能力
//! - `BrowserSession` - 唯一的浏览器 owner，提供获取 / 重启 / 释放
//!
//! ### ② 业务能力层（Services / Resolver）
//! - `resolver/` - 把裸域名解析为可达 URL
//! - `services/` - 描述"我能测什么"，只处理单个域名
//! - `LighthouseAuditor` - 浏览器 + Lighthouse 测量
//! - `CruxReporter` / `PsiReporter` - 远程 API 测量
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个域名"的完整处理流程
//! - `DomainCtx` - 上下文封装（rank + domain）
//! - `DomainFlow` - 流程编排（探测 → 限时测量）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 批量域名处理器，续跑、落盘、重启决策
//!
//! ## 模块结构

pub mod app;
pub mod browser;
pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod resolver;
pub mod services;
pub mod store;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use app::App;
pub use config::{Config, Pipeline};
pub use error::{AppError, AppResult};
pub use infrastructure::BrowserSession;
pub use models::{OutputRecord, RankedDomain, VitalsResult};
pub use orchestrator::{BatchProcessor, BatchStats};
pub use workflow::{DomainCtx, DomainFlow};
