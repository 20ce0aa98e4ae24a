//! Prometheus 메트릭 설정 및 유틸리티.
//!
//! HTTP 요청 메트릭과 인증/잔고 메트릭을 수집하고 `/metrics` 엔드포인트로 노출합니다.
//! 레코더가 설치되지 않은 환경(테스트 등)에서는 기록이 무시됩니다.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};

/// Prometheus 메트릭 레코더를 설정하고 핸들을 반환합니다.
///
/// # Errors
///
/// 버킷 설정이 잘못되었거나 레코더가 이미 설치되어 있으면 `BuildError`를 반환합니다.
pub fn setup_metrics_recorder() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new()
        // HTTP 요청 지속 시간 히스토그램 버킷 설정
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            &[0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0],
        )?
        .install_recorder()
}

// ============================================================================
// HTTP 메트릭 헬퍼 함수
// ============================================================================

/// HTTP 요청 카운터 증가.
pub fn record_http_request(method: &str, path: &str) {
    counter!("http_requests_total", "method" => method.to_string(), "path" => path.to_string())
        .increment(1);
}

/// HTTP 응답 카운터 증가.
pub fn record_http_response(method: &str, path: &str, status: u16) {
    counter!(
        "http_responses_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// HTTP 요청 지속 시간 기록.
pub fn record_http_duration(method: &str, path: &str, duration_secs: f64) {
    histogram!(
        "http_request_duration_seconds",
        "method" => method.to_string(),
        "path" => path.to_string()
    )
    .record(duration_secs);
}

// ============================================================================
// 게이트웨이 메트릭 헬퍼 함수
// ============================================================================

/// 요청 인증 실패 카운터 증가.
pub fn record_auth_failure(code: &'static str) {
    counter!("gateway_auth_failures_total", "code" => code).increment(1);
}

/// 세션 작업 결과 카운터 증가.
///
/// `operation`: signup, login, refresh, delete, password
pub fn record_session_event(operation: &'static str, outcome: &'static str) {
    counter!(
        "gateway_session_events_total",
        "operation" => operation,
        "outcome" => outcome
    )
    .increment(1);
}

/// 잔고 변경 거부 카운터 증가.
///
/// 사전 검사(`INSUFFICIENT_FUNDS`)와 원장 거부(`NOT_ENOUGH_MONEY`)를 구분합니다.
pub fn record_balance_rejection(code: &'static str) {
    counter!("gateway_balance_rejections_total", "code" => code).increment(1);
}

// ============================================================================
// 경로 정규화 유틸리티
// ============================================================================

/// 경로에서 동적 파라미터를 정규화합니다.
///
/// 예: `/accounts/123e4567-e89b-12d3-a456-426614174000` → `/accounts/:id`
pub fn normalize_path(path: &str) -> String {
    path.split('/')
        .map(|segment| {
            // UUID 패턴 또는 숫자만 있는 경우 :id로 대체
            let is_uuid = segment.len() == 36 && segment.chars().filter(|c| *c == '-').count() == 4;
            let is_numeric = !segment.is_empty() && segment.chars().all(|c| c.is_ascii_digit());

            if is_uuid || is_numeric {
                ":id"
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}
