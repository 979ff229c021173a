//! 세션 상태
//!
//! 처리 결과 목록과 카운터를 담는 명시적 컨텍스트 객체입니다.
//! 디스크에 저장하지 않으며 프로세스가 끝나면 사라집니다.

use chrono::{DateTime, Local};
use serde::Serialize;
use tokio::sync::RwLock;
use utoipa::ToSchema;

/// 화면에 보여줄 최근 결과 수
pub const DISPLAY_LIMIT: usize = 10;

/// 티켓 하나의 처리 결과
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TicketResult {
    #[schema(example = "I can't access my account and need help resetting my password")]
    pub text: String,
    #[schema(example = "login, account, reset")]
    pub zero_shot: String,
    #[schema(example = "account, reset, password")]
    pub few_shot: String,
    #[schema(value_type = String, example = "2024-01-08T12:34:56+09:00")]
    pub processed_at: DateTime<Local>,
}

impl TicketResult {
    /// `HH:MM:SS`
    pub fn timestamp(&self) -> String {
        self.processed_at.format("%H:%M:%S").to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// 다음 렌더링 때 한 번 보여주는 알림
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct TaggingSession {
    results: Vec<TicketResult>,
    total_processed: u64,
    notice: Option<Notice>,
}

impl TaggingSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, result: TicketResult) {
        self.results.push(result);
        self.total_processed += 1;
    }

    /// 결과 목록만 비운다. 누적 카운터는 유지
    pub fn clear_results(&mut self) {
        self.results.clear();
    }

    pub fn results(&self) -> &[TicketResult] {
        &self.results
    }

    /// 최근 결과부터 최대 `DISPLAY_LIMIT`개
    pub fn recent(&self) -> impl Iterator<Item = &TicketResult> {
        let start = self.results.len().saturating_sub(DISPLAY_LIMIT);
        self.results[start..].iter().rev()
    }

    pub fn in_session(&self) -> usize {
        self.results.len()
    }

    pub fn total_processed(&self) -> u64 {
        self.total_processed
    }

    pub fn set_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }
}

/// 배치 진행 상황
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BatchProgress {
    /// 현재 처리 중인 티켓 (1부터)
    pub current: usize,
    pub total: usize,
}

impl BatchProgress {
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.current as f64 / self.total as f64
    }
}

/// 세션 락과 분리된 진행 상황 저장소
///
/// 배치가 세션을 잡고 있는 동안에도 진행률을 읽을 수 있습니다.
#[derive(Debug, Default)]
pub struct ProgressTracker {
    inner: RwLock<Option<BatchProgress>>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn update(&self, current: usize, total: usize) {
        *self.inner.write().await = Some(BatchProgress { current, total });
    }

    pub async fn finish(&self) {
        *self.inner.write().await = None;
    }

    pub async fn current(&self) -> Option<BatchProgress> {
        *self.inner.read().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(text: &str) -> TicketResult {
        TicketResult {
            text: text.to_string(),
            zero_shot: "error, technical".to_string(),
            few_shot: "error, technical".to_string(),
            processed_at: Local::now(),
        }
    }

    #[test]
    fn record_appends_and_counts() {
        let mut session = TaggingSession::new();
        session.record(result("a"));
        session.record(result("b"));

        assert_eq!(session.in_session(), 2);
        assert_eq!(session.total_processed(), 2);
        assert_eq!(session.results()[0].text, "a");
    }

    #[test]
    fn clear_keeps_total_processed() {
        let mut session = TaggingSession::new();
        session.record(result("a"));
        session.clear_results();

        assert_eq!(session.in_session(), 0);
        assert_eq!(session.total_processed(), 1);
    }

    #[test]
    fn recent_returns_last_ten_newest_first() {
        let mut session = TaggingSession::new();
        for i in 0..12 {
            session.record(result(&format!("ticket {i}")));
        }

        let recent: Vec<&str> = session.recent().map(|r| r.text.as_str()).collect();
        assert_eq!(recent.len(), DISPLAY_LIMIT);
        assert_eq!(recent[0], "ticket 11");
        assert_eq!(recent[9], "ticket 2");
        assert_eq!(session.in_session(), 12);
    }

    #[test]
    fn notice_is_shown_once() {
        let mut session = TaggingSession::new();
        session.set_notice(Notice::success("done"));

        assert_eq!(session.take_notice(), Some(Notice::success("done")));
        assert_eq!(session.take_notice(), None);
    }

    #[test]
    fn timestamp_is_clock_time() {
        let stamp = result("a").timestamp();
        assert_eq!(stamp.len(), 8);
        assert_eq!(stamp.matches(':').count(), 2);
    }

    #[tokio::test]
    async fn progress_tracker_reports_and_clears() {
        let tracker = ProgressTracker::new();
        assert_eq!(tracker.current().await, None);

        tracker.update(2, 4).await;
        let progress = tracker.current().await.unwrap();
        assert_eq!(progress, BatchProgress { current: 2, total: 4 });
        assert!((progress.fraction() - 0.5).abs() < f64::EPSILON);

        tracker.finish().await;
        assert_eq!(tracker.current().await, None);
    }
}
