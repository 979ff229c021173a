use std::time::{Duration, Instant};

use tokio::time::timeout;

use super::dto::{HealthChecks, HealthState, HealthStatus, ModelCheck};
use crate::domain::model::ModelRegistry;

static START_TIME: std::sync::OnceLock<Instant> = std::sync::OnceLock::new();

const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// 이 이상 걸리면 Degraded
const DEGRADED_THRESHOLD: Duration = Duration::from_secs(2);

/// main에서 서버 시작 시 호출
pub fn init_start_time() {
    START_TIME.get_or_init(Instant::now);
}

pub fn get_uptime_secs() -> u64 {
    START_TIME.get().map(|t| t.elapsed().as_secs()).unwrap_or(0)
}

/// 헬스 체크. 모델을 새로 로드하지는 않는다
pub async fn check_health(models: &ModelRegistry) -> HealthStatus {
    let model = check_model(models).await;
    let status = determine_health_state(&model);

    HealthStatus {
        status,
        version: env!("CARGO_PKG_VERSION"),
        uptime_secs: get_uptime_secs(),
        checks: HealthChecks { model },
    }
}

fn determine_health_state(check: &ModelCheck) -> HealthState {
    match check.reachable {
        None => HealthState::Degraded,
        Some(false) => HealthState::Unhealthy,
        Some(true) => match check.latency_ms {
            Some(latency) if latency >= DEGRADED_THRESHOLD.as_millis() as u64 => {
                HealthState::Degraded
            }
            _ => HealthState::Healthy,
        },
    }
}

async fn check_model(models: &ModelRegistry) -> ModelCheck {
    let name = models.model_name();
    let Some(generator) = models.loaded().await else {
        return ModelCheck::not_loaded(name);
    };

    let start = Instant::now();
    let result = timeout(HEALTH_CHECK_TIMEOUT, generator.check_connectivity()).await;
    let latency_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(Ok(())) => {
            tracing::debug!(latency_ms, "Model health check passed");
            ModelCheck::reachable(name, latency_ms)
        }
        Ok(Err(e)) => {
            tracing::warn!(latency_ms, error = %e, "Model health check failed");
            ModelCheck::unreachable(name, latency_ms, e.to_string())
        }
        Err(_) => {
            tracing::warn!("Model health check timed out");
            ModelCheck::unreachable(name, latency_ms, "Timeout".to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{client::MockTextGenerator, StaticLoader};
    use crate::error::AppError;
    use std::sync::Arc;

    fn registry_with(mock: MockTextGenerator) -> ModelRegistry {
        ModelRegistry::new(StaticLoader::new(Arc::new(mock), "mock-model"))
    }

    #[test]
    fn init_start_time_should_set_once() {
        init_start_time();
        let first = START_TIME.get();
        init_start_time();
        assert_eq!(first, START_TIME.get());
    }

    #[test]
    fn unloaded_model_is_degraded() {
        let check = ModelCheck::not_loaded("m".to_string());
        assert_eq!(determine_health_state(&check), HealthState::Degraded);
    }

    #[test]
    fn slow_model_is_degraded() {
        assert_eq!(
            determine_health_state(&ModelCheck::reachable("m".to_string(), 1999)),
            HealthState::Healthy
        );
        assert_eq!(
            determine_health_state(&ModelCheck::reachable("m".to_string(), 2000)),
            HealthState::Degraded
        );
    }

    #[test]
    fn unreachable_model_is_unhealthy() {
        let check = ModelCheck::unreachable("m".to_string(), 10, "refused".to_string());
        assert_eq!(determine_health_state(&check), HealthState::Unhealthy);
    }

    #[tokio::test]
    async fn health_does_not_trigger_a_load() {
        let registry = registry_with(MockTextGenerator::new());

        let status = check_health(&registry).await;

        assert_eq!(status.status, HealthState::Degraded);
        assert!(!status.checks.model.loaded);
        assert!(!registry.is_loaded().await);
    }

    #[tokio::test]
    async fn loaded_model_connectivity_is_checked() {
        let mut mock = MockTextGenerator::new();
        mock.expect_check_connectivity()
            .times(1)
            .returning(|| Err(AppError::ModelUnavailable("refused".to_string())));
        let registry = registry_with(mock);
        registry.get_or_load().await.unwrap();

        let status = check_health(&registry).await;

        assert_eq!(status.status, HealthState::Unhealthy);
        assert_eq!(status.checks.model.reachable, Some(false));
        assert_eq!(status.checks.model.name, "mock-model");
    }
}
