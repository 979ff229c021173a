use std::env;
use std::time::Duration;

/// 애플리케이션 설정
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_host: String,
    pub server_port: u16,
    pub model: ModelConfig,
    /// 배치 처리 시 티켓마다 넣는 지연. 진행 표시용일 뿐 정확성과는 무관
    pub batch_item_delay: Duration,
    pub metrics_enabled: bool,
}

/// 추론 서버 설정
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub model_id: String,
    pub api_base: String,
    pub api_key: String,
    pub max_new_tokens: u16,
    /// 로드 시 모델 목록 조회로 엔드포인트 도달 가능 여부를 확인
    pub verify_on_load: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_id: "google/flan-t5-base".to_string(),
            api_base: "http://localhost:8000/v1".to_string(),
            api_key: String::new(),
            max_new_tokens: 20,
            verify_on_load: true,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_host: "0.0.0.0".to_string(),
            server_port: 8080,
            model: ModelConfig::default(),
            batch_item_delay: Duration::from_millis(100),
            metrics_enabled: true,
        }
    }
}

impl AppConfig {
    /// 환경 변수에서 설정 로드
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let server_host = env::var("SERVER_HOST").unwrap_or(defaults.server_host);
        let server_port = match env::var("SERVER_PORT") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidPort(raw))?,
            Err(_) => defaults.server_port,
        };

        let api_key = env::var("MODEL_API_KEY").unwrap_or_else(|_| {
            tracing::warn!("MODEL_API_KEY is not set; sending unauthenticated requests");
            String::new()
        });

        let max_new_tokens = match env::var("MODEL_MAX_NEW_TOKENS") {
            Ok(raw) => match raw.parse::<u16>() {
                Ok(value) if value > 0 => value,
                _ => return Err(ConfigError::InvalidMaxNewTokens(raw)),
            },
            Err(_) => defaults.model.max_new_tokens,
        };

        let batch_item_delay = match env::var("BATCH_ITEM_DELAY_MS") {
            Ok(raw) => Duration::from_millis(
                raw.parse()
                    .map_err(|_| ConfigError::InvalidBatchDelay(raw))?,
            ),
            Err(_) => defaults.batch_item_delay,
        };

        Ok(Self {
            server_host,
            server_port,
            model: ModelConfig {
                model_id: env::var("MODEL_ID").unwrap_or(defaults.model.model_id),
                api_base: env::var("MODEL_API_BASE").unwrap_or(defaults.model.api_base),
                api_key,
                max_new_tokens,
                verify_on_load: parse_flag("MODEL_VERIFY_ON_LOAD", defaults.model.verify_on_load)?,
            },
            batch_item_delay,
            metrics_enabled: parse_flag("METRICS_ENABLED", defaults.metrics_enabled)?,
        })
    }
}

fn parse_flag(name: &'static str, default: bool) -> Result<bool, ConfigError> {
    match env::var(name) {
        Ok(raw) => parse_bool(&raw).ok_or(ConfigError::InvalidFlag { name, value: raw }),
        Err(_) => Ok(default),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid port number: {0}")]
    InvalidPort(String),
    #[error("MODEL_MAX_NEW_TOKENS must be a positive integer, got {0}")]
    InvalidMaxNewTokens(String),
    #[error("BATCH_ITEM_DELAY_MS must be milliseconds, got {0}")]
    InvalidBatchDelay(String),
    #[error("{name} must be a boolean, got {value}")]
    InvalidFlag { name: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_generation_settings() {
        let config = AppConfig::default();
        assert_eq!(config.model.model_id, "google/flan-t5-base");
        assert_eq!(config.model.max_new_tokens, 20);
        assert_eq!(config.batch_item_delay, Duration::from_millis(100));
        assert_eq!(config.server_port, 8080);
    }

    #[test]
    fn parse_bool_accepts_common_spellings() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool(" on "), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("no"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }
}
