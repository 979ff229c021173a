use axum::{
    extract::{Multipart, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;

use super::page::{
    render_busy, render_model_error, render_page, ModelState, PageView, SidebarView,
};
use crate::domain::session::Notice;
use crate::domain::tagging::upload::{read_file_field, read_ticket_texts};
use crate::error::AppError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct TicketForm {
    #[serde(default)]
    pub ticket_text: String,
}

/// 메인 화면
///
/// 모델을 지연 로드하고, 실패하면 사이드바와 오류만 보여줍니다.
/// 배치가 세션을 잡고 있으면 진행 화면을 돌려줍니다.
pub async fn index(State(state): State<AppState>) -> Response {
    let Ok(mut session) = state.session.try_lock() else {
        let progress = state.progress.current().await;
        let model = model_state(&state).await;
        return Html(render_busy(model, progress)).into_response();
    };

    let load_error = state.models.get_or_load().await.err();
    let model_name = state.models.model_name();
    let sidebar = SidebarView {
        model_name: &model_name,
        model: model_state(&state).await,
        total_processed: session.total_processed(),
        in_session: session.in_session(),
    };

    if let Some(e) = load_error {
        let message = match e {
            AppError::ModelLoad(message) => message,
            other => other.to_string(),
        };
        return Html(render_model_error(&sidebar, &message)).into_response();
    }

    let notice = session.take_notice();
    let view = PageView {
        sidebar,
        notice,
        recent: session.recent().collect(),
    };

    Html(render_page(&view)).into_response()
}

async fn model_state(state: &AppState) -> ModelState {
    if state.models.is_loaded().await {
        ModelState::Ready
    } else {
        ModelState::Loading
    }
}

/// 텍스트 입력 폼 처리 후 메인 화면으로 리다이렉트
pub async fn submit_ticket(State(state): State<AppState>, Form(form): Form<TicketForm>) -> Redirect {
    let text = form.ticket_text.trim();
    let mut session = state.session.lock().await;

    if text.is_empty() {
        session.set_notice(Notice::error("Enter ticket text to process"));
        return Redirect::to("/");
    }

    let notice = match state.tagging.tag_single(&mut session, text).await {
        Ok(_) => Notice::success("Ticket processed successfully!"),
        Err(e) => {
            tracing::warn!(error = %e, "Ticket form failed");
            Notice::error(e.to_string())
        }
    };
    session.set_notice(notice);

    Redirect::to("/")
}

/// CSV 업로드 폼 처리 후 메인 화면으로 리다이렉트
pub async fn upload_tickets(State(state): State<AppState>, multipart: Multipart) -> Redirect {
    let parsed = match read_file_field(multipart).await {
        Ok(bytes) => read_ticket_texts(&bytes),
        Err(e) => Err(e),
    };

    let mut session = state.session.lock().await;
    let notice = match parsed {
        Ok(tickets) => match state
            .tagging
            .tag_batch(&mut session, &state.progress, &tickets)
            .await
        {
            Ok(processed) => Notice::success(format!("Successfully processed {processed} tickets!")),
            Err(e) => Notice::error(e.to_string()),
        },
        Err(e) => {
            tracing::warn!(error = %e, "Ticket upload rejected");
            Notice::error(e.to_string())
        }
    };
    session.set_notice(notice);

    Redirect::to("/")
}

pub async fn clear_results(State(state): State<AppState>) -> Redirect {
    state.session.lock().await.clear_results();
    tracing::info!("Results cleared");
    Redirect::to("/")
}

/// 다음 화면 렌더링에서 모델을 다시 로드
pub async fn reset_model(State(state): State<AppState>) -> Redirect {
    state.models.reset().await;
    Redirect::to("/")
}
