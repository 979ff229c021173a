use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;
use ticket_tagger::{
    config::AppConfig,
    create_router,
    domain::health::init_start_time,
    global::logging::{init_logging, LogFormat},
    shutdown::shutdown_signal,
    AppState, OpenAiLoader,
};

#[tokio::main]
async fn main() {
    // 1. 환경변수 로드
    dotenvy::dotenv().ok();

    // 2. 로깅 초기화
    init_logging(LogFormat::from_env());

    // 3. 설정 로드
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };

    init_start_time();

    // 4. 상태 구성. 모델은 첫 요청에서 로드
    let mut state = AppState::new(&config, OpenAiLoader::new(config.model.clone()));

    if config.metrics_enabled {
        match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => state = state.with_metrics(handle),
            Err(e) => tracing::warn!(error = %e, "Failed to install metrics recorder"),
        }
    }

    let session = state.session.clone();
    let app = create_router(state);

    // 5. 서버 실행
    let addr: SocketAddr = match format!("{}:{}", config.server_host, config.server_port).parse() {
        Ok(addr) => addr,
        Err(e) => {
            tracing::error!(host = %config.server_host, error = %e, "Invalid server address");
            std::process::exit(1);
        }
    };

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(%addr, error = %e, "Failed to bind");
            std::process::exit(1);
        }
    };

    tracing::info!(
        %addr,
        model = %config.model.model_id,
        api_base = %config.model.api_base,
        "Ticket tagger listening"
    );

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(session))
        .await
    {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}
