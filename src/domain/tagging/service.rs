use std::sync::Arc;
use std::time::Duration;

use chrono::Local;

use super::prompt::{few_shot_prompt, zero_shot_prompt};
use super::validator::{select_tags, TagSelection, TagSource};
use crate::domain::model::{ModelRegistry, TextGenerator};
use crate::domain::session::{ProgressTracker, TaggingSession, TicketResult};
use crate::error::AppError;

/// 티켓 태깅 서비스
///
/// 티켓마다 Zero-Shot, Few-Shot 순서로 모델을 두 번 호출합니다.
/// 병렬 호출, 취소, 타임아웃은 없습니다.
#[derive(Clone)]
pub struct TaggingService {
    models: Arc<ModelRegistry>,
    max_new_tokens: u16,
    batch_item_delay: Duration,
}

impl TaggingService {
    pub fn new(models: Arc<ModelRegistry>, max_new_tokens: u16, batch_item_delay: Duration) -> Self {
        Self {
            models,
            max_new_tokens,
            batch_item_delay,
        }
    }

    /// 티켓 하나를 처리해서 세션에 추가
    pub async fn tag_single(
        &self,
        session: &mut TaggingSession,
        text: &str,
    ) -> Result<TicketResult, AppError> {
        let generator = self.models.get_or_load().await?;
        let result = self.tag_with(generator.as_ref(), text).await?;

        session.record(result.clone());
        metrics::counter!("tickets_processed_total", "source" => "single").increment(1);

        Ok(result)
    }

    /// 행 순서대로 처리하며 티켓마다 즉시 세션에 추가
    ///
    /// 중간에 실패하면 그 전까지 추가된 결과는 세션에 남습니다.
    pub async fn tag_batch(
        &self,
        session: &mut TaggingSession,
        progress: &ProgressTracker,
        tickets: &[String],
    ) -> Result<usize, AppError> {
        let total = tickets.len();
        let generator = self.models.get_or_load().await?;

        tracing::info!(total, "Batch started");

        for (index, text) in tickets.iter().enumerate() {
            progress.update(index + 1, total).await;
            tracing::debug!(current = index + 1, total, "Processing ticket");

            let result = match self.tag_with(generator.as_ref(), text).await {
                Ok(result) => result,
                Err(e) => {
                    progress.finish().await;
                    tracing::error!(processed = index, total, error = %e, "Batch interrupted");
                    return Err(AppError::BatchInterrupted {
                        processed: index,
                        total,
                        message: e.to_string(),
                    });
                }
            };

            session.record(result);
            metrics::counter!("tickets_processed_total", "source" => "batch").increment(1);

            if !self.batch_item_delay.is_zero() {
                tokio::time::sleep(self.batch_item_delay).await;
            }
        }

        progress.finish().await;
        tracing::info!(total, "Batch finished");
        Ok(total)
    }

    async fn tag_with(
        &self,
        generator: &dyn TextGenerator,
        text: &str,
    ) -> Result<TicketResult, AppError> {
        let zero_shot_raw = generator
            .generate(&zero_shot_prompt(text), self.max_new_tokens)
            .await?;
        let few_shot_raw = generator
            .generate(&few_shot_prompt(text), self.max_new_tokens)
            .await?;

        let zero_shot = select_tags(&zero_shot_raw, text);
        let few_shot = select_tags(&few_shot_raw, text);
        record_fallback_metrics(&zero_shot);
        record_fallback_metrics(&few_shot);

        tracing::debug!(
            zero_shot_raw = %zero_shot_raw,
            few_shot_raw = %few_shot_raw,
            zero_shot = %zero_shot,
            few_shot = %few_shot,
            "Ticket tagged"
        );

        Ok(TicketResult {
            text: text.to_string(),
            zero_shot: zero_shot.to_string(),
            few_shot: few_shot.to_string(),
            processed_at: Local::now(),
        })
    }
}

fn record_fallback_metrics(selection: &TagSelection) {
    let keyword = selection.count_from(TagSource::Keyword);
    if keyword > 0 {
        metrics::counter!("tags_fallback_total", "stage" => "keyword").increment(keyword as u64);
    }
    let default = selection.count_from(TagSource::Default);
    if default > 0 {
        metrics::counter!("tags_fallback_total", "stage" => "default").increment(default as u64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{client::MockTextGenerator, StaticLoader};
    use std::sync::Mutex;

    fn service_with(mock: MockTextGenerator) -> TaggingService {
        let registry = ModelRegistry::new(StaticLoader::new(Arc::new(mock), "mock"));
        TaggingService::new(Arc::new(registry), 20, Duration::ZERO)
    }

    #[tokio::test]
    async fn single_ticket_uses_both_prompts_and_records_result() {
        let mut mock = MockTextGenerator::new();
        mock.expect_generate()
            .withf(|prompt, _| prompt.starts_with("Classify this support ticket"))
            .times(1)
            .returning(|_, _| Ok("login, account, reset".to_string()));
        mock.expect_generate()
            .withf(|prompt, _| prompt.starts_with("Classify support tickets"))
            .times(1)
            .returning(|_, _| Ok("Tags: nothing useful".to_string()));

        let service = service_with(mock);
        let mut session = TaggingSession::new();

        let result = service
            .tag_single(&mut session, "I forgot my password")
            .await
            .unwrap();

        assert_eq!(result.zero_shot, "login, account, reset");
        assert_eq!(result.few_shot, "reset, password, error");
        assert_eq!(session.total_processed(), 1);
    }

    #[tokio::test]
    async fn zero_shot_is_called_before_few_shot() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&calls);

        let mut mock = MockTextGenerator::new();
        mock.expect_generate().times(2).returning(move |prompt, max| {
            assert_eq!(max, 20);
            recorded.lock().unwrap().push(prompt.ends_with("Tags:"));
            Ok(String::new())
        });

        let service = service_with(mock);
        let mut session = TaggingSession::new();
        service.tag_single(&mut session, "hello").await.unwrap();

        assert_eq!(*calls.lock().unwrap(), vec![false, true]);
    }

    #[tokio::test]
    async fn batch_appends_every_row_in_order() {
        let mut mock = MockTextGenerator::new();
        mock.expect_generate()
            .times(6)
            .returning(|_, _| Ok("error, server, website".to_string()));

        let service = service_with(mock);
        let mut session = TaggingSession::new();
        let progress = ProgressTracker::new();
        let tickets = vec!["one".to_string(), "two".to_string(), "three".to_string()];

        let processed = service
            .tag_batch(&mut session, &progress, &tickets)
            .await
            .unwrap();

        assert_eq!(processed, 3);
        let texts: Vec<&str> = session.results().iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["one", "two", "three"]);
        assert_eq!(progress.current().await, None);
    }

    #[tokio::test]
    async fn batch_failure_keeps_already_processed_tickets() {
        let mut mock = MockTextGenerator::new();
        mock.expect_generate()
            .withf(|prompt, _| prompt.contains("broken"))
            .returning(|_, _| Err(AppError::ModelInference("bad output".to_string())));
        mock.expect_generate()
            .withf(|prompt, _| !prompt.contains("broken"))
            .returning(|_, _| Ok("payment, error, account".to_string()));

        let service = service_with(mock);
        let mut session = TaggingSession::new();
        let progress = ProgressTracker::new();
        let tickets = vec![
            "first".to_string(),
            "broken".to_string(),
            "never reached".to_string(),
        ];

        let err = service
            .tag_batch(&mut session, &progress, &tickets)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AppError::BatchInterrupted { processed: 1, total: 3, .. }
        ));
        assert_eq!(session.in_session(), 1);
        assert_eq!(session.results()[0].text, "first");
        assert_eq!(progress.current().await, None);
    }
}
