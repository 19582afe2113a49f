use cwv_crawler::clients::{CruxClient, PsiClient};
use cwv_crawler::models::VitalsResult;
use cwv_crawler::services::{CruxReporter, MeasureTarget, PsiReporter, VitalsMeasurer};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CRUX_PATH: &str = "/v1/records:queryRecord";
const PSI_PATH: &str = "/pagespeedonline/v5/runPagespeed";

fn target(url: &str) -> MeasureTarget {
    MeasureTarget {
        rank: 1,
        domain: "google.com".to_string(),
        url: url.to_string(),
    }
}

fn crux_reporter(server: &MockServer, key: Option<&str>) -> CruxReporter {
    CruxReporter::new(CruxClient::new(
        reqwest::Client::new(),
        format!("{}{}", server.uri(), CRUX_PATH),
        key.map(str::to_string),
    ))
}

fn psi_reporter(server: &MockServer, key: Option<&str>) -> PsiReporter {
    PsiReporter::new(PsiClient::new(
        reqwest::Client::new(),
        format!("{}{}", server.uri(), PSI_PATH),
        key.map(str::to_string),
    ))
}

#[tokio::test]
async fn crux_maps_p75_values_for_origin() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(CRUX_PATH))
        .and(query_param("key", "test-key"))
        .and(body_partial_json(json!({"origin": "https://www.google.com"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "record": {
                "key": {"origin": "https://www.google.com"},
                "metrics": {
                    "largest_contentful_paint": {"percentiles": {"p75": 1653}},
                    "first_input_delay": {"percentiles": {"p75": 12}},
                    "cumulative_layout_shift": {"percentiles": {"p75": "0.03"}}
                }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let vitals = crux_reporter(&server, Some("test-key"))
        .measure(None, &target("https://www.google.com/?hl=en"))
        .await
        .unwrap();

    assert_eq!(vitals, VitalsResult::new(Some(1653.0), Some(12.0), Some(0.03)));
}

#[tokio::test]
async fn crux_missing_record_is_null() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(CRUX_PATH))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"code": 404, "message": "chrome ux report data not found"}
        })))
        .mount(&server)
        .await;

    let vitals = crux_reporter(&server, Some("test-key"))
        .measure(None, &target("https://www.tiny-site.example/"))
        .await
        .unwrap();

    assert!(vitals.is_null());
}

#[tokio::test]
async fn missing_api_key_never_calls_remote() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let vitals = crux_reporter(&server, None)
        .measure(None, &target("https://www.google.com/"))
        .await
        .unwrap();

    assert!(vitals.is_null());
}

#[tokio::test]
async fn psi_uses_desktop_performance_and_audit_mapping() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PSI_PATH))
        .and(query_param("url", "https://www.google.com/"))
        .and(query_param("key", "test-key"))
        .and(query_param("strategy", "DESKTOP"))
        .and(query_param("category", "PERFORMANCE"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "https://www.google.com/",
            "lighthouseResult": {
                "audits": {
                    "largest-contentful-paint": {"numericValue": 1200},
                    "max-potential-fid": {"numericValue": 0},
                    "cumulative-layout-shift": {"numericValue": 0.05}
                }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let vitals = psi_reporter(&server, Some("test-key"))
        .measure(None, &target("https://www.google.com/"))
        .await
        .unwrap();

    assert_eq!(vitals, VitalsResult::new(Some(1200.0), None, Some(0.05)));
}

#[tokio::test]
async fn psi_quota_and_malformed_responses_are_null() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PSI_PATH))
        .and(query_param("url", "https://www.quota.example/"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(PSI_PATH))
        .and(query_param("url", "https://www.garbled.example/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let reporter = psi_reporter(&server, Some("test-key"));
    for url in ["https://www.quota.example/", "https://www.garbled.example/"] {
        let vitals = reporter.measure(None, &target(url)).await.unwrap();
        assert!(vitals.is_null(), "{} 应为空结果", url);
    }
}
