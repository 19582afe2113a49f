//! 浏览器抽象
//!
//! 流程层与编排层只依赖这里的 trait，真实实现见 [`chromium`]。
//! 测试中可以用假的实现替换整个浏览器。

pub mod chromium;

use async_trait::async_trait;

use crate::error::BrowserResult;

pub use chromium::{ChromiumBrowser, ChromiumLauncher, ChromiumPage};

/// 启动新的浏览器实例
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn launch(&self) -> BrowserResult<Box<dyn BrowserHandle>>;
}

/// 一个存活的浏览器实例
#[async_trait]
pub trait BrowserHandle: Send + Sync {
    /// 远程调试端口（供 Lighthouse 连接）
    fn endpoint_port(&self) -> BrowserResult<u16>;

    /// 打开新页面并导航到 `url`
    async fn open_page(&self, url: &str) -> BrowserResult<Box<dyn PageHandle>>;

    /// 关闭浏览器并回收后台任务
    async fn close(self: Box<Self>) -> BrowserResult<()>;
}

/// 一个打开的页面，用完必须关闭
#[async_trait]
pub trait PageHandle: Send + Sync {
    /// 页面当前地址（导航重定向之后）
    async fn current_url(&self) -> BrowserResult<String>;

    async fn close(self: Box<Self>) -> BrowserResult<()>;
}
