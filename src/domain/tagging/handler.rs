use axum::{
    extract::{rejection::JsonRejection, Multipart, State},
    Json,
};
use validator::Validate;

use super::dto::{
    BatchResponse, BatchUpload, ModelStatus, ProgressResponse, SessionSummary, TagTicketRequest,
    VocabularyResponse,
};
use super::upload::{read_file_field, read_ticket_texts};
use crate::domain::session::TicketResult;
use crate::error::AppError;
use crate::response::{BaseResponse, ErrorResponse};
use crate::AppState;

/// 티켓 단건 태깅
///
/// Zero-Shot, Few-Shot 프롬프트로 모델을 각각 호출하고 태그 3개로 보정합니다.
#[utoipa::path(
    post,
    path = "/api/tickets/tag",
    tag = "Tickets",
    request_body = TagTicketRequest,
    responses(
        (status = 200, description = "태깅 성공", body = BaseResponse<TicketResult>),
        (status = 400, description = "잘못된 요청", body = ErrorResponse),
        (status = 502, description = "추론 실패", body = ErrorResponse),
        (status = 503, description = "모델 로드 실패", body = ErrorResponse)
    )
)]
pub async fn tag_ticket(
    State(state): State<AppState>,
    request: Result<Json<TagTicketRequest>, JsonRejection>,
) -> Result<Json<BaseResponse<TicketResult>>, AppError> {
    let Json(request) = request?;
    request.validate()?;

    let text = request.ticket_text.trim();
    tracing::info!(text_length = text.len(), "Tag request received");

    let mut session = state.session.lock().await;
    let result = state.tagging.tag_single(&mut session, text).await?;

    Ok(Json(BaseResponse::success(result)))
}

/// CSV 배치 태깅
///
/// multipart `file` 필드의 CSV에서 `ticket_text` 컬럼을 행 순서대로 처리합니다.
#[utoipa::path(
    post,
    path = "/api/tickets/batch",
    tag = "Tickets",
    request_body(content = BatchUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "배치 성공", body = BaseResponse<BatchResponse>),
        (status = 400, description = "컬럼 누락 또는 CSV 형식 오류", body = ErrorResponse),
        (status = 500, description = "처리 중단 (앞선 결과는 유지)", body = ErrorResponse),
        (status = 503, description = "모델 로드 실패", body = ErrorResponse)
    )
)]
pub async fn tag_batch(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<BaseResponse<BatchResponse>>, AppError> {
    let bytes = read_file_field(multipart).await?;
    let tickets = read_ticket_texts(&bytes)?;

    let mut session = state.session.lock().await;
    let processed = state
        .tagging
        .tag_batch(&mut session, &state.progress, &tickets)
        .await?;

    Ok(Json(BaseResponse::success_with_message(
        BatchResponse { processed },
        format!("Successfully processed {processed} tickets!"),
    )))
}

/// 세션 결과 조회
#[utoipa::path(
    get,
    path = "/api/tickets",
    tag = "Tickets",
    responses((status = 200, body = BaseResponse<SessionSummary>))
)]
pub async fn list_tickets(State(state): State<AppState>) -> Json<BaseResponse<SessionSummary>> {
    let session = state.session.lock().await;
    Json(BaseResponse::success(SessionSummary {
        total_processed: session.total_processed(),
        in_session: session.in_session(),
        results: session.results().to_vec(),
    }))
}

/// 세션 결과 비우기 (누적 카운터는 유지)
#[utoipa::path(
    delete,
    path = "/api/tickets",
    tag = "Tickets",
    responses((status = 200, body = BaseResponse<SessionSummary>))
)]
pub async fn clear_tickets(State(state): State<AppState>) -> Json<BaseResponse<SessionSummary>> {
    let mut session = state.session.lock().await;
    session.clear_results();
    tracing::info!("Results cleared");

    Json(BaseResponse::success(SessionSummary {
        total_processed: session.total_processed(),
        in_session: 0,
        results: Vec::new(),
    }))
}

/// 모델 핸들 무효화. 다음 요청에서 다시 로드
#[utoipa::path(
    post,
    path = "/api/model/reset",
    tag = "Model",
    responses((status = 200, body = BaseResponse<ModelStatus>))
)]
pub async fn reset_model(State(state): State<AppState>) -> Json<BaseResponse<ModelStatus>> {
    state.models.reset().await;
    Json(BaseResponse::success(ModelStatus {
        model: state.models.model_name(),
        loaded: false,
    }))
}

/// 배치 진행 상황
#[utoipa::path(
    get,
    path = "/api/batch/progress",
    tag = "Tickets",
    responses((status = 200, body = BaseResponse<ProgressResponse>))
)]
pub async fn batch_progress(State(state): State<AppState>) -> Json<BaseResponse<ProgressResponse>> {
    let response = match state.progress.current().await {
        Some(progress) => ProgressResponse {
            running: true,
            current: progress.current,
            total: progress.total,
        },
        None => ProgressResponse {
            running: false,
            current: 0,
            total: 0,
        },
    };
    Json(BaseResponse::success(response))
}

/// 태그 어휘와 키워드 매핑
#[utoipa::path(
    get,
    path = "/api/tags",
    tag = "Tickets",
    responses((status = 200, body = BaseResponse<VocabularyResponse>))
)]
pub async fn list_tags() -> Json<BaseResponse<VocabularyResponse>> {
    Json(BaseResponse::success(VocabularyResponse::from_vocabulary()))
}
