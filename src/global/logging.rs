//! 로깅 초기화
//!
//! `LOG_FORMAT=json`(기본)이면 구조화된 JSON, `pretty`면 사람이 읽기 좋은 형식으로 stdout에 출력합니다.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "info,ticket_tagger=debug";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    pub fn from_env() -> Self {
        match std::env::var("LOG_FORMAT") {
            Ok(value) if value.eq_ignore_ascii_case("pretty") => Self::Pretty,
            _ => Self::Json,
        }
    }
}

/// `RUST_LOG`가 없으면 `info,ticket_tagger=debug`
///
/// 이미 초기화되어 있으면 조용히 넘어갑니다 (테스트에서 여러 번 호출될 수 있음).
pub fn init_logging(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let result = match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_current_span(true))
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().pretty())
            .try_init(),
    };

    if let Err(err) = result {
        eprintln!("Failed to initialize tracing: {err}");
    }
}
