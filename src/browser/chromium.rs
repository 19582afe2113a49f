//! 基于 chromiumoxide 的无头 Chromium

use std::path::PathBuf;

use async_trait::async_trait;
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace, warn};

use crate::browser::{BrowserHandle, BrowserLauncher, PageHandle};
use crate::error::{BrowserError, BrowserResult};

/// 固定的启动参数
const LAUNCH_ARGS: [&str; 3] = [
    "--disable-setuid-sandbox",
    "--disable-dev-shm-usage",
    "--remote-debugging-port=0", // 由系统分配端口
];

/// 无头 Chromium 启动器
#[derive(Debug, Clone, Default)]
pub struct ChromiumLauncher {
    chrome_executable: Option<PathBuf>,
}

impl ChromiumLauncher {
    pub fn new(chrome_executable: Option<PathBuf>) -> Self {
        Self { chrome_executable }
    }

    fn build_config(&self) -> BrowserResult<BrowserConfig> {
        let mut builder = BrowserConfig::builder()
            .new_headless_mode()
            .no_sandbox()
            .args(LAUNCH_ARGS)
            .viewport(None::<Viewport>);
        if let Some(path) = &self.chrome_executable {
            builder = builder.chrome_executable(path);
        }

        builder.build().map_err(|e| {
            error!("配置无头浏览器失败: {}", e);
            BrowserError::ConfigurationFailed { reason: e }
        })
    }
}

#[async_trait]
impl BrowserLauncher for ChromiumLauncher {
    async fn launch(&self) -> BrowserResult<Box<dyn BrowserHandle>> {
        info!("🚀 启动无头浏览器...");
        let config = self.build_config()?;

        let (browser, mut handler) = Browser::launch(config).await.map_err(|e| {
            error!("启动无头浏览器失败: {}", e);
            BrowserError::launch_failed(e)
        })?;

        // 在后台处理浏览器事件；单条消息出错不能结束事件循环
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    let message = e.to_string();
                    if is_benign_cdp_error(&message) {
                        trace!("忽略无法识别的 CDP 消息: {}", message);
                    } else {
                        warn!("⚠️ 浏览器事件处理出错: {}", message);
                    }
                }
            }
            debug!("浏览器事件循环结束");
        });

        debug!("无头浏览器调试地址: {}", browser.websocket_address());
        Ok(Box::new(ChromiumBrowser {
            browser,
            handler_task,
        }))
    }
}

/// Chrome 发来 chromiumoxide 不认识的事件时产生的反序列化错误
fn is_benign_cdp_error(message: &str) -> bool {
    message.contains("data did not match any variant of untagged enum Message")
        || message.contains("Failed to deserialize WS response")
}

/// 存活的 Chromium 实例及其 CDP 事件任务
pub struct ChromiumBrowser {
    browser: Browser,
    handler_task: JoinHandle<()>,
}

#[async_trait]
impl BrowserHandle for ChromiumBrowser {
    fn endpoint_port(&self) -> BrowserResult<u16> {
        let endpoint = self.browser.websocket_address();
        url::Url::parse(endpoint)
            .ok()
            .and_then(|u| u.port())
            .ok_or_else(|| BrowserError::EndpointUnavailable {
                endpoint: endpoint.to_string(),
            })
    }

    async fn open_page(&self, url: &str) -> BrowserResult<Box<dyn PageHandle>> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| BrowserError::PageCreationFailed {
                source: Box::new(e),
            })?;

        if let Err(e) = page.goto(url).await {
            if let Err(close_err) = page.clone().close().await {
                warn!("⚠️ 关闭导航失败的页面出错: {}", close_err);
            }
            return Err(BrowserError::navigation_failed(url, e));
        }

        debug!("页面已导航到: {}", url);
        Ok(Box::new(ChromiumPage { page }))
    }

    async fn close(self: Box<Self>) -> BrowserResult<()> {
        let ChromiumBrowser {
            mut browser,
            handler_task,
        } = *self;

        let result = match browser.close().await {
            Ok(_) => {
                if let Err(e) = browser.wait().await {
                    warn!("⚠️ 等待浏览器进程退出失败: {}", e);
                }
                Ok(())
            }
            Err(e) => {
                // 浏览器已无响应，直接杀进程
                if let Some(Err(kill_err)) = browser.kill().await {
                    warn!("⚠️ 强制结束浏览器进程失败: {}", kill_err);
                }
                Err(BrowserError::CloseFailed {
                    source: Box::new(e),
                })
            }
        };

        handler_task.abort();
        result
    }
}

/// chromiumoxide 页面
pub struct ChromiumPage {
    page: Page,
}

#[async_trait]
impl PageHandle for ChromiumPage {
    async fn current_url(&self) -> BrowserResult<String> {
        let url = self
            .page
            .url()
            .await
            .map_err(|e| BrowserError::PageInspectionFailed {
                source: Box::new(e),
            })?;
        url.ok_or_else(|| BrowserError::PageInspectionFailed {
            source: "页面没有地址".into(),
        })
    }

    async fn close(self: Box<Self>) -> BrowserResult<()> {
        self.page
            .close()
            .await
            .map_err(|e| BrowserError::CloseFailed {
                source: Box::new(e),
            })
    }
}
