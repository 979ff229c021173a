use serde::Serialize;
use utoipa::ToSchema;

/// 전체 헬스 상태 응답
#[derive(Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    /// healthy/degraded/unhealthy
    pub status: HealthState,
    #[schema(example = "0.1.0")]
    pub version: &'static str,
    /// 서버 가동 시간 (초)
    #[schema(example = 3600)]
    pub uptime_secs: u64,
    pub checks: HealthChecks,
}

#[derive(Serialize, Debug, PartialEq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    Healthy,
    /// 모델 미로드 또는 응답 지연
    Degraded,
    Unhealthy,
}

#[derive(Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthChecks {
    pub model: ModelCheck,
}

/// 모델 준비 상태
#[derive(Serialize, Debug, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ModelCheck {
    #[schema(example = "google/flan-t5-base")]
    pub name: String,
    /// 모델 핸들이 로드되어 있는지
    pub loaded: bool,
    /// 추론 서버 도달 여부. 로드 전에는 확인하지 않음
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reachable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = 150)]
    pub latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ModelCheck {
    pub fn not_loaded(name: String) -> Self {
        Self {
            name,
            loaded: false,
            reachable: None,
            latency_ms: None,
            error: None,
        }
    }

    pub fn reachable(name: String, latency_ms: u64) -> Self {
        Self {
            name,
            loaded: true,
            reachable: Some(true),
            latency_ms: Some(latency_ms),
            error: None,
        }
    }

    pub fn unreachable(name: String, latency_ms: u64, error: String) -> Self {
        Self {
            name,
            loaded: true,
            reachable: Some(false),
            latency_ms: Some(latency_ms),
            error: Some(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_state_should_serialize_lowercase() {
        assert_eq!(serde_json::to_string(&HealthState::Healthy).unwrap(), "\"healthy\"");
        assert_eq!(serde_json::to_string(&HealthState::Degraded).unwrap(), "\"degraded\"");
        assert_eq!(serde_json::to_string(&HealthState::Unhealthy).unwrap(), "\"unhealthy\"");
    }

    #[test]
    fn not_loaded_check_skips_connectivity_fields() {
        let json = serde_json::to_string(&ModelCheck::not_loaded("flan".to_string())).unwrap();

        assert!(json.contains("\"loaded\":false"));
        assert!(!json.contains("reachable"));
        assert!(!json.contains("latencyMs"));
        assert!(!json.contains("error"));
    }

    #[test]
    fn health_status_should_serialize_with_camel_case() {
        let status = HealthStatus {
            status: HealthState::Healthy,
            version: "0.1.0",
            uptime_secs: 3600,
            checks: HealthChecks {
                model: ModelCheck::reachable("flan".to_string(), 150),
            },
        };

        let json = serde_json::to_string(&status).unwrap();

        assert!(json.contains("\"uptimeSecs\""));
        assert!(json.contains("\"latencyMs\":150"));
        assert!(json.contains("\"reachable\":true"));
    }
}
