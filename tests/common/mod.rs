//! 测试用的假浏览器、假探测器与假测量器
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use cwv_crawler::browser::{BrowserHandle, BrowserLauncher, PageHandle};
use cwv_crawler::error::{BrowserError, BrowserResult, MeasureError, MeasureResult, StoreResult};
use cwv_crawler::models::{LighthouseReport, RankedDomain, VitalsResult};
use cwv_crawler::resolver::Resolver;
use cwv_crawler::services::{AuditEngine, MeasureTarget, VitalsMeasurer};

// ========== 浏览器 ==========

/// 所有假浏览器共享的计数
#[derive(Default)]
pub struct BrowserStats {
    pub launch_attempts: AtomicU64,
    pub launched: AtomicU64,
    pub closed: AtomicU64,
    pub pages_opened: AtomicU64,
    pub pages_closed: AtomicU64,
    pub max_live: AtomicU64,
}

impl BrowserStats {
    pub fn live(&self) -> u64 {
        self.launched.load(Ordering::SeqCst) - self.closed.load(Ordering::SeqCst)
    }
}

/// 假启动器
///
/// `succeed_first` 为 `Some(n)` 时只有前 n 次启动成功。
pub struct FakeLauncher {
    pub stats: Arc<BrowserStats>,
    pub succeed_first: Option<u64>,
    pub unreachable_urls: HashSet<String>,
}

impl FakeLauncher {
    pub fn new() -> (Self, Arc<BrowserStats>) {
        let stats = Arc::new(BrowserStats::default());
        (
            Self {
                stats: stats.clone(),
                succeed_first: None,
                unreachable_urls: HashSet::new(),
            },
            stats,
        )
    }

    pub fn succeed_first(mut self, n: u64) -> Self {
        self.succeed_first = Some(n);
        self
    }
}

#[async_trait]
impl BrowserLauncher for FakeLauncher {
    async fn launch(&self) -> BrowserResult<Box<dyn BrowserHandle>> {
        let attempt = self.stats.launch_attempts.fetch_add(1, Ordering::SeqCst) + 1;
        if self.succeed_first.is_some_and(|n| attempt > n) {
            return Err(BrowserError::launch_failed(std::io::Error::new(
                std::io::ErrorKind::Other,
                "chrome exited during startup",
            )));
        }

        let generation = self.stats.launched.fetch_add(1, Ordering::SeqCst) + 1;
        self.stats.max_live.fetch_max(self.stats.live(), Ordering::SeqCst);
        Ok(Box::new(FakeBrowser {
            generation,
            stats: self.stats.clone(),
            unreachable_urls: self.unreachable_urls.clone(),
        }))
    }
}

/// 假浏览器，调试端口为 `9000 + 第几代`
pub struct FakeBrowser {
    pub generation: u64,
    pub stats: Arc<BrowserStats>,
    pub unreachable_urls: HashSet<String>,
}

impl FakeBrowser {
    pub fn standalone() -> (Self, Arc<BrowserStats>) {
        let stats = Arc::new(BrowserStats::default());
        (
            Self {
                generation: 1,
                stats: stats.clone(),
                unreachable_urls: HashSet::new(),
            },
            stats,
        )
    }
}

pub fn port_of_generation(generation: u64) -> u16 {
    9000 + generation as u16
}

#[async_trait]
impl BrowserHandle for FakeBrowser {
    fn endpoint_port(&self) -> BrowserResult<u16> {
        Ok(port_of_generation(self.generation))
    }

    async fn open_page(&self, url: &str) -> BrowserResult<Box<dyn PageHandle>> {
        if self.unreachable_urls.contains(url) {
            return Err(BrowserError::navigation_failed(
                url,
                std::io::Error::new(std::io::ErrorKind::Other, "net::ERR_NAME_NOT_RESOLVED"),
            ));
        }
        self.stats.pages_opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakePage {
            url: url.to_string(),
            stats: self.stats.clone(),
        }))
    }

    async fn close(self: Box<Self>) -> BrowserResult<()> {
        self.stats.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub struct FakePage {
    url: String,
    stats: Arc<BrowserStats>,
}

#[async_trait]
impl PageHandle for FakePage {
    async fn current_url(&self) -> BrowserResult<String> {
        Ok(self.url.clone())
    }

    async fn close(self: Box<Self>) -> BrowserResult<()> {
        self.stats.pages_closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// ========== 探测器 ==========

/// 除 `unreachable` 中的域名外，都解析为 `https://www.{domain}/`
#[derive(Default)]
pub struct StaticResolver {
    pub unreachable: HashSet<String>,
}

impl StaticResolver {
    pub fn with_unreachable(domains: &[&str]) -> Self {
        Self {
            unreachable: domains.iter().map(|d| d.to_string()).collect(),
        }
    }
}

pub fn resolved_url(domain: &str) -> String {
    format!("https://www.{}/", domain)
}

#[async_trait]
impl Resolver for StaticResolver {
    async fn resolve(&self, domain: &str) -> Option<String> {
        (!self.unreachable.contains(domain)).then(|| resolved_url(domain))
    }
}

// ========== 测量器 ==========

/// 某个域名的预设行为
#[derive(Debug, Clone, Copy)]
pub enum Behavior {
    Vitals(VitalsResult),
    /// 永不返回
    Hang,
    ProfilingTimeout,
    AuditUnavailable,
    PageCrash,
}

/// 一次测量调用
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasureCall {
    pub domain: String,
    pub port: Option<u16>,
}

/// 按域名返回预设结果的测量器
///
/// `needs_browser` 时没有浏览器会返回 `NotRunning`。
pub struct ScriptedMeasurer {
    pub behaviors: HashMap<String, Behavior>,
    pub default: Behavior,
    pub needs_browser: bool,
    pub calls: Arc<Mutex<Vec<MeasureCall>>>,
}

pub fn sample_vitals() -> VitalsResult {
    VitalsResult::new(Some(1200.0), Some(16.0), Some(0.05))
}

impl ScriptedMeasurer {
    pub fn new(needs_browser: bool) -> (Self, Arc<Mutex<Vec<MeasureCall>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                behaviors: HashMap::new(),
                default: Behavior::Vitals(sample_vitals()),
                needs_browser,
                calls: calls.clone(),
            },
            calls,
        )
    }

    pub fn on(mut self, domain: &str, behavior: Behavior) -> Self {
        self.behaviors.insert(domain.to_string(), behavior);
        self
    }
}

#[async_trait]
impl VitalsMeasurer for ScriptedMeasurer {
    fn name(&self) -> &'static str {
        "Scripted"
    }

    async fn measure(
        &self,
        browser: Option<&dyn BrowserHandle>,
        target: &MeasureTarget,
    ) -> MeasureResult<VitalsResult> {
        let port = browser.and_then(|b| b.endpoint_port().ok());
        self.calls.lock().unwrap().push(MeasureCall {
            domain: target.domain.clone(),
            port,
        });

        if self.needs_browser && browser.is_none() {
            return Err(BrowserError::NotRunning.into());
        }

        let behavior = self
            .behaviors
            .get(&target.domain)
            .copied()
            .unwrap_or(self.default);
        match behavior {
            Behavior::Vitals(vitals) => Ok(vitals),
            Behavior::Hang => std::future::pending().await,
            Behavior::ProfilingTimeout => Err(MeasureError::ProfilingTimeout {
                url: target.url.clone(),
                limit: Duration::from_secs(30),
            }),
            Behavior::AuditUnavailable => Err(MeasureError::AuditUnavailable {
                url: target.url.clone(),
            }),
            Behavior::PageCrash => Err(BrowserError::PageCreationFailed {
                source: "Target closed".into(),
            }
            .into()),
        }
    }
}

// ========== 审计引擎 ==========

pub enum EngineBehavior {
    Report(LighthouseReport),
    NoReport,
    Hang,
}

/// 记录调用参数的假审计引擎
pub struct FakeEngine {
    pub behavior: EngineBehavior,
    pub calls: Arc<Mutex<Vec<(String, u16)>>>,
}

impl FakeEngine {
    pub fn new(behavior: EngineBehavior) -> (Self, Arc<Mutex<Vec<(String, u16)>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                behavior,
                calls: calls.clone(),
            },
            calls,
        )
    }
}

#[async_trait]
impl AuditEngine for FakeEngine {
    async fn run(&self, url: &str, port: u16) -> Option<LighthouseReport> {
        self.calls.lock().unwrap().push((url.to_string(), port));
        match &self.behavior {
            EngineBehavior::Report(report) => Some(report.clone()),
            EngineBehavior::NoReport => None,
            EngineBehavior::Hang => std::future::pending().await,
        }
    }
}

// ========== 存储 ==========

pub fn ranked(domains: &[&str]) -> Vec<StoreResult<RankedDomain>> {
    domains
        .iter()
        .enumerate()
        .map(|(i, d)| Ok(RankedDomain::new(i as u64 + 1, *d)))
        .collect()
}

pub struct Tables {
    pub dir: tempfile::TempDir,
    pub vitals: PathBuf,
    pub visited: PathBuf,
    pub links: PathBuf,
}

impl Tables {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let vitals = dir.path().join("CoreWebVitalsReportLighthouse.csv");
        let visited = dir.path().join("util").join("CrawlerVisited.csv");
        let links = dir.path().join("util").join("ValidLinks.csv");
        Self {
            dir,
            vitals,
            visited,
            links,
        }
    }
}

pub fn data_rows(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .skip(1)
        .map(str::to_string)
        .collect()
}
