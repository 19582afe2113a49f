//! 浏览器会话 - 基础设施层
//!
//! 持有唯一的浏览器资源，只暴露"获取 / 重启 / 释放"的能力

use tracing::{info, warn};

use crate::browser::{BrowserHandle, BrowserLauncher};
use crate::error::BrowserResult;

/// 浏览器会话
///
/// 职责：
/// - 任意时刻最多持有一个存活的浏览器
/// - 把浏览器以共享引用借给正在进行的测量
/// - 重启严格遵循"先释放、再获取"
/// - 不认识域名与测量流程
pub struct BrowserSession {
    launcher: Box<dyn BrowserLauncher>,
    handle: Option<Box<dyn BrowserHandle>>,
    generation: u64,
}

impl BrowserSession {
    pub fn new(launcher: Box<dyn BrowserLauncher>) -> Self {
        Self {
            launcher,
            handle: None,
            generation: 0,
        }
    }

    /// 启动新的浏览器（已有实例会先被释放）
    pub async fn acquire(&mut self) -> BrowserResult<()> {
        self.release().await;

        let handle = self.launcher.launch().await?;
        self.generation += 1;
        self.handle = Some(handle);
        info!("✓ 浏览器已就绪 (第 {} 代)", self.generation);
        Ok(())
    }

    /// 释放当前浏览器
    ///
    /// 可重复调用；关闭失败只记录日志。
    pub async fn release(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        match handle.close().await {
            Ok(()) => info!("浏览器已关闭 (第 {} 代)", self.generation),
            Err(e) => warn!("⚠️ 关闭浏览器失败 (第 {} 代): {}", self.generation, e),
        }
    }

    /// 重启浏览器
    pub async fn restart(&mut self) -> BrowserResult<()> {
        warn!("🔄 重启浏览器 (当前第 {} 代)", self.generation);
        self.release().await;
        self.acquire().await
    }

    /// 当前浏览器，未运行时为 `None`
    pub fn handle(&self) -> Option<&dyn BrowserHandle> {
        self.handle.as_deref()
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// 已启动过的浏览器数量
    pub fn generation(&self) -> u64 {
        self.generation
    }
}
