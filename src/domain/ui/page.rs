//! HTML 렌더링
//!
//! 템플릿 엔진 없이 `format!`으로 조립합니다. 사용자 입력은 모두 `escape_html`을 거칩니다.

use std::fmt::Write;

use crate::domain::session::{BatchProgress, Notice, NoticeKind, TicketResult, DISPLAY_LIMIT};
use crate::domain::tagging::ALL_TAGS;

const STYLES: &str = include_str!("assets/styles.css");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelState {
    /// 아직 로드 전이거나 로드 실패
    Loading,
    Ready,
}

/// 사이드바 상태와 카운터
pub struct SidebarView<'a> {
    pub model_name: &'a str,
    pub model: ModelState,
    pub total_processed: u64,
    pub in_session: usize,
}

/// 메인 화면에 필요한 값
pub struct PageView<'a> {
    pub sidebar: SidebarView<'a>,
    pub notice: Option<Notice>,
    /// 최근 결과 (최신순, 최대 `DISPLAY_LIMIT`개)
    pub recent: Vec<&'a TicketResult>,
}

pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn document(head_extra: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
{head_extra}<title>AI Support Ticket Tagger</title>
<style>
{STYLES}
</style>
</head>
<body>
{body}
</body>
</html>
"#
    )
}

fn header() -> &'static str {
    r#"<div class="custom-header">
<h1>AI Support Ticket Tagger</h1>
<p>Intelligent classification using advanced natural language processing</p>
</div>"#
}

fn footer() -> &'static str {
    r#"<footer>Powered by Flan-T5 | Built for intelligent ticket classification</footer>"#
}

fn notice_html(notice: &Notice) -> String {
    let class = match notice.kind {
        NoticeKind::Success => "notice notice-success",
        NoticeKind::Error => "notice notice-error",
    };
    format!(
        r#"<div class="{class}">{}</div>"#,
        escape_html(&notice.message)
    )
}

fn status_badge(model: ModelState) -> &'static str {
    match model {
        ModelState::Loading => {
            r#"<span class="status-indicator status-loading">Loading Model</span>"#
        }
        ModelState::Ready => r#"<span class="status-indicator status-ready">Model Ready</span>"#,
    }
}

fn sidebar(view: &SidebarView<'_>) -> String {
    let mut html = String::new();
    let _ = write!(
        html,
        r#"<aside>
<div class="sidebar-content">
<h2>AI Tagger</h2>
<p>Intelligent support ticket classification</p>
</div>
<div class="sidebar-content">
<h3>System Status</h3>
{}
<p class="caption">{}</p>
</div>
<div class="metrics">
<div class="metric-card"><div class="metric-value">{}</div><div class="metric-label">Processed</div></div>
<div class="metric-card"><div class="metric-value">{}</div><div class="metric-label">In Session</div></div>
</div>
<div class="sidebar-content">
<h3>Available Tags</h3>
"#,
        status_badge(view.model),
        escape_html(view.model_name),
        view.total_processed,
        view.in_session,
    );

    for tag in ALL_TAGS {
        let _ = write!(html, r#"<span class="status-indicator tag-chip">{tag}</span>"#);
    }

    html.push_str(
        r#"
</div>
<div class="sidebar-content controls">
<h3>Controls</h3>
<form method="post" action="/results/clear"><button type="submit">Clear Results</button></form>
<form method="post" action="/model/reset"><button type="submit">Reset Model</button></form>
</div>
</aside>"#,
    );
    html
}

fn input_forms() -> &'static str {
    r#"<h2>Upload Support Tickets</h2>
<div class="upload-area">
<form method="post" action="/tickets/upload" enctype="multipart/form-data">
<label for="file">Choose a CSV file with support tickets</label><br>
<input type="file" id="file" name="file" accept=".csv">
<p class="caption">CSV should have a 'ticket_text' column</p>
<button type="submit">Process CSV File</button>
</form>
</div>
<h2>Or Enter a Single Ticket</h2>
<form method="post" action="/tickets">
<label for="ticket_text">Enter ticket text:</label>
<textarea id="ticket_text" name="ticket_text" placeholder="e.g., I can't access my account and need help resetting my password..."></textarea>
<button type="submit">Process Single Ticket</button>
</form>"#
}

fn ticket_card(result: &TicketResult) -> String {
    format!(
        r#"<div class="ticket-card">
<div class="ticket-text">{}</div>
<div class="tag-columns">
<div><span class="tag-label">Zero-shot Tags:</span><div class="tag-result"><code>{}</code></div></div>
<div><span class="tag-label">Few-shot Tags:</span><div class="tag-result"><code>{}</code></div></div>
</div>
<div class="caption">Processed at {}</div>
</div>"#,
        escape_html(&result.text),
        escape_html(&result.zero_shot),
        escape_html(&result.few_shot),
        result.timestamp(),
    )
}

fn results_section(view: &PageView<'_>) -> String {
    let in_session = view.sidebar.in_session;
    if in_session == 0 {
        return r#"<div class="welcome-message">
<h2>Welcome to AI Ticket Tagger!</h2>
<p>Upload a CSV file or enter a single ticket to get started.</p>
<p>The AI will automatically classify your support tickets using both zero-shot and few-shot learning approaches.</p>
</div>"#
            .to_string();
    }

    let mut html = String::from("<h2>Processing Results</h2>\n");
    for result in &view.recent {
        html.push_str(&ticket_card(result));
        html.push('\n');
    }
    if in_session > DISPLAY_LIMIT {
        let _ = write!(
            html,
            r#"<div class="notice notice-info">Showing last {DISPLAY_LIMIT} results. Total processed: {in_session}</div>"#
        );
    }
    html
}

/// 메인 화면
pub fn render_page(view: &PageView<'_>) -> String {
    let notice = view.notice.as_ref().map(notice_html).unwrap_or_default();
    let body = format!(
        r#"{}
<div class="layout">
{}
<main>
{notice}
{}
{}
</main>
</div>
{}"#,
        header(),
        sidebar(&view.sidebar),
        input_forms(),
        results_section(view),
        footer(),
    );
    document("", &body)
}

/// 모델 로드 실패 화면. 사이드바는 그대로 두고 입력 폼과 결과는 그리지 않는다
pub fn render_model_error(sidebar_view: &SidebarView<'_>, message: &str) -> String {
    let body = format!(
        r#"{}
<div class="layout">
{}
<main>
<div class="notice notice-error">Error loading model: {}</div>
</main>
</div>
{}"#,
        header(),
        sidebar(sidebar_view),
        escape_html(message),
        footer(),
    );
    document("", &body)
}

/// 배치가 세션을 잡고 있는 동안의 진행 화면. 1초마다 새로고침
pub fn render_busy(model: ModelState, progress: Option<BatchProgress>) -> String {
    let status = match progress {
        Some(progress) => format!(
            r#"<p>Processing ticket {} of {}...</p>
<progress value="{}" max="{}"></progress>
<p class="caption">{:.0}% complete</p>"#,
            progress.current,
            progress.total,
            progress.current,
            progress.total.max(1),
            progress.fraction() * 100.0,
        ),
        None => "<p>Processing...</p>".to_string(),
    };
    let body = format!(
        r#"{}
<main>
<div class="upload-area">
{}
{status}
</div>
</main>
{}"#,
        header(),
        status_badge(model),
        footer(),
    );
    document(r#"<meta http-equiv="refresh" content="1">"#, &body)
}
