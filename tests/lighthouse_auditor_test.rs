mod common;

use std::collections::HashMap;
use std::sync::atomic::Ordering;
use std::time::Duration;

use common::*;
use cwv_crawler::browser::BrowserHandle;
use cwv_crawler::error::{BrowserError, MeasureError};
use cwv_crawler::models::{AuditEntry, LighthouseReport, VitalsResult};
use cwv_crawler::services::{LighthouseAuditor, MeasureTarget, VitalsMeasurer};

const AUDIT_TIMEOUT: Duration = Duration::from_secs(30);

fn target(domain: &str) -> MeasureTarget {
    MeasureTarget {
        rank: 1,
        domain: domain.to_string(),
        url: resolved_url(domain),
    }
}

fn report(lcp: f64, fid: f64, cls: f64) -> LighthouseReport {
    let audit = |v: f64| AuditEntry {
        numeric_value: Some(v),
    };
    LighthouseReport {
        audits: HashMap::from([
            ("largest-contentful-paint".to_string(), audit(lcp)),
            ("max-potential-fid".to_string(), audit(fid)),
            ("cumulative-layout-shift".to_string(), audit(cls)),
        ]),
    }
}

#[tokio::test]
async fn audits_page_url_on_browser_port() {
    let (browser, stats) = FakeBrowser::standalone();
    let (engine, calls) = FakeEngine::new(EngineBehavior::Report(report(1834.5, 0.0, 0.02)));
    let auditor = LighthouseAuditor::new(Box::new(engine), AUDIT_TIMEOUT);

    let vitals = auditor
        .measure(Some(&browser as &dyn BrowserHandle), &target("google.com"))
        .await
        .unwrap();

    assert_eq!(vitals, VitalsResult::new(Some(1834.5), None, Some(0.02)));
    assert_eq!(
        calls.lock().unwrap().as_slice(),
        &[(resolved_url("google.com"), port_of_generation(1))]
    );
    assert_eq!(stats.pages_opened.load(Ordering::SeqCst), 1);
    assert_eq!(stats.pages_closed.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn hung_profiler_times_out_and_closes_page() {
    let (browser, stats) = FakeBrowser::standalone();
    let (engine, _calls) = FakeEngine::new(EngineBehavior::Hang);
    let auditor = LighthouseAuditor::new(Box::new(engine), AUDIT_TIMEOUT);

    let err = auditor
        .measure(Some(&browser as &dyn BrowserHandle), &target("slow.example"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        MeasureError::ProfilingTimeout { limit, .. } if limit == AUDIT_TIMEOUT
    ));
    assert!(!err.requires_restart());
    assert_eq!(stats.pages_closed.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn missing_report_is_audit_unavailable() {
    let (browser, stats) = FakeBrowser::standalone();
    let (engine, _calls) = FakeEngine::new(EngineBehavior::NoReport);
    let auditor = LighthouseAuditor::new(Box::new(engine), AUDIT_TIMEOUT);

    let err = auditor
        .measure(Some(&browser as &dyn BrowserHandle), &target("blank.example"))
        .await
        .unwrap_err();

    assert!(matches!(err, MeasureError::AuditUnavailable { .. }));
    assert_eq!(stats.pages_closed.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn navigation_failure_does_not_require_restart() {
    let (mut browser, stats) = FakeBrowser::standalone();
    browser
        .unreachable_urls
        .insert(resolved_url("gone.example"));
    let (engine, calls) = FakeEngine::new(EngineBehavior::NoReport);
    let auditor = LighthouseAuditor::new(Box::new(engine), AUDIT_TIMEOUT);

    let err = auditor
        .measure(Some(&browser as &dyn BrowserHandle), &target("gone.example"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        MeasureError::Browser(BrowserError::NavigationFailed { .. })
    ));
    assert!(!err.requires_restart());
    assert!(calls.lock().unwrap().is_empty());
    assert_eq!(stats.pages_opened.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn missing_browser_requires_restart() {
    let (engine, _calls) = FakeEngine::new(EngineBehavior::NoReport);
    let auditor = LighthouseAuditor::new(Box::new(engine), AUDIT_TIMEOUT);

    let err = auditor.measure(None, &target("google.com")).await.unwrap_err();

    assert!(matches!(err, MeasureError::Browser(BrowserError::NotRunning)));
    assert!(err.requires_restart());
}
