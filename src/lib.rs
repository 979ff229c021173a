pub mod config;
pub mod domain;
pub mod error;
pub mod global;
pub mod response;
pub mod shutdown;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::sync::Mutex;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use config::AppConfig;
use domain::model::{ModelRegistry, StaticLoader};
use domain::session::{ProgressTracker, TaggingSession, TicketResult};
use domain::tagging::TaggingService;

pub use domain::model::{ModelLoader, OpenAiLoader, SharedGenerator, TextGenerator};
pub use error::AppError;

#[derive(OpenApi)]
#[openapi(
    paths(
        domain::tagging::handler::tag_ticket,
        domain::tagging::handler::tag_batch,
        domain::tagging::handler::list_tickets,
        domain::tagging::handler::clear_tickets,
        domain::tagging::handler::reset_model,
        domain::tagging::handler::batch_progress,
        domain::tagging::handler::list_tags,
        domain::health::handler::health_check,
    ),
    components(
        schemas(
            domain::tagging::dto::TagTicketRequest,
            domain::tagging::dto::BatchUpload,
            domain::tagging::dto::SessionSummary,
            domain::tagging::dto::BatchResponse,
            domain::tagging::dto::ModelStatus,
            domain::tagging::dto::ProgressResponse,
            domain::tagging::dto::TagInfo,
            domain::tagging::dto::VocabularyResponse,
            domain::tagging::Tag,
            TicketResult,
            domain::health::dto::HealthStatus,
            domain::health::dto::HealthState,
            domain::health::dto::HealthChecks,
            domain::health::dto::ModelCheck,
            response::ErrorResponse,
        )
    ),
    tags(
        (name = "Tickets", description = "티켓 태깅 API"),
        (name = "Model", description = "모델 관리 API"),
        (name = "Health", description = "헬스체크 API")
    )
)]
pub struct ApiDoc;

/// 애플리케이션 공유 상태
///
/// 세션은 단일 사용자 기준 하나이며, 액션 하나가 끝날 때까지 락을 잡습니다.
#[derive(Clone)]
pub struct AppState {
    pub tagging: TaggingService,
    pub models: Arc<ModelRegistry>,
    pub session: Arc<Mutex<TaggingSession>>,
    pub progress: Arc<ProgressTracker>,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(config: &AppConfig, loader: impl ModelLoader + 'static) -> Self {
        Self::with_timing(
            loader,
            config.model.max_new_tokens,
            config.batch_item_delay,
        )
    }

    fn with_timing(
        loader: impl ModelLoader + 'static,
        max_new_tokens: u16,
        batch_item_delay: Duration,
    ) -> Self {
        let models = Arc::new(ModelRegistry::new(loader));
        Self {
            tagging: TaggingService::new(Arc::clone(&models), max_new_tokens, batch_item_delay),
            models,
            session: Arc::new(Mutex::new(TaggingSession::new())),
            progress: Arc::new(ProgressTracker::new()),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

async fn render_metrics(State(state): State<AppState>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (StatusCode::NOT_FOUND, "Metrics disabled".to_string()),
    }
}

pub fn create_router(state: AppState) -> Router {
    let ui = Router::new()
        .route("/", get(domain::ui::handler::index))
        .route("/tickets", post(domain::ui::handler::submit_ticket))
        .route("/tickets/upload", post(domain::ui::handler::upload_tickets))
        .route("/results/clear", post(domain::ui::handler::clear_results))
        .route("/model/reset", post(domain::ui::handler::reset_model));

    let api = Router::new()
        .route("/api/tickets/tag", post(domain::tagging::handler::tag_ticket))
        .route("/api/tickets/batch", post(domain::tagging::handler::tag_batch))
        .route(
            "/api/tickets",
            get(domain::tagging::handler::list_tickets)
                .delete(domain::tagging::handler::clear_tickets),
        )
        .route("/api/model/reset", post(domain::tagging::handler::reset_model))
        .route(
            "/api/batch/progress",
            get(domain::tagging::handler::batch_progress),
        )
        .route("/api/tags", get(domain::tagging::handler::list_tags));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(ui)
        .merge(api)
        .route("/health", get(domain::health::health_check))
        .route("/metrics", get(render_metrics))
        .layer(middleware::from_fn(global::middleware::request_tracing))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// 테스트용 라우터 (배치 지연 없음)
pub fn create_test_router_with_mock<G>(generator: G) -> Router
where
    G: TextGenerator + 'static,
{
    create_test_router_with_loader(StaticLoader::new(Arc::new(generator), "mock-model"))
}

/// 로더를 직접 지정하는 테스트용 라우터
pub fn create_test_router_with_loader(loader: impl ModelLoader + 'static) -> Router {
    let state = AppState::with_timing(loader, 20, Duration::ZERO);
    create_router(state)
}
