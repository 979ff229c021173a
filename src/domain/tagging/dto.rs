use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use super::vocabulary::{Tag, ALL_TAGS};
use crate::domain::session::TicketResult;

/// 단건 태깅 요청 DTO
#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TagTicketRequest {
    /// 티켓 본문 (앞뒤 공백은 제거 후 사용)
    #[validate(custom = "validate_not_blank")]
    #[schema(example = "I can't access my account and need help resetting my password...")]
    pub ticket_text: String,
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some("Ticket text is required".into());
        return Err(error);
    }
    Ok(())
}

/// 배치 업로드 폼 (OpenAPI 스키마용)
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct BatchUpload {
    /// `ticket_text` 컬럼이 있는 CSV 파일
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

/// 세션 요약 + 전체 결과
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    /// 누적 처리 수 (Clear Results 후에도 유지)
    #[schema(example = 12)]
    pub total_processed: u64,
    /// 현재 세션에 남아 있는 결과 수
    #[schema(example = 12)]
    pub in_session: usize,
    pub results: Vec<TicketResult>,
}

/// 배치 처리 결과
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BatchResponse {
    #[schema(example = 25)]
    pub processed: usize,
}

/// 모델 상태
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ModelStatus {
    #[schema(example = "google/flan-t5-base")]
    pub model: String,
    pub loaded: bool,
}

/// 배치 진행 상황. 배치가 없으면 running = false
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProgressResponse {
    pub running: bool,
    #[schema(example = 3)]
    pub current: usize,
    #[schema(example = 10)]
    pub total: usize,
}

/// 태그와 폴백 키워드
#[derive(Debug, Serialize, ToSchema)]
pub struct TagInfo {
    pub tag: Tag,
    pub keywords: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VocabularyResponse {
    pub tags: Vec<TagInfo>,
}

impl VocabularyResponse {
    pub fn from_vocabulary() -> Self {
        Self {
            tags: ALL_TAGS
                .iter()
                .map(|tag| TagInfo {
                    tag: *tag,
                    keywords: tag.keywords().iter().map(|k| k.to_string()).collect(),
                })
                .collect(),
        }
    }
}
