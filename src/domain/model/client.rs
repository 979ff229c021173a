use std::sync::Arc;

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};

use crate::config::ModelConfig;
use crate::error::AppError;

/// 추론 서버 에러를 세분화된 AppError로 변환
fn classify_openai_error(error: OpenAIError) -> AppError {
    match &error {
        OpenAIError::ApiError(api_err) => {
            let err_type = api_err.r#type.as_deref().unwrap_or("");
            let message = &api_err.message;
            let err_code = api_err
                .code
                .as_ref()
                .map(|code| code.to_string())
                .unwrap_or_default();

            if err_type == "invalid_request_error"
                && (err_code.contains("invalid_api_key") || message.contains("API key"))
            {
                AppError::ModelAuth
            } else if err_type == "rate_limit_error"
                || err_code.contains("rate_limit_exceeded")
                || err_type == "server_error"
            {
                AppError::ModelUnavailable(message.clone())
            } else {
                AppError::ModelInference(message.clone())
            }
        }
        OpenAIError::Reqwest(req_err) => {
            let status = req_err.status().map(|s| s.as_u16());
            if req_err.is_timeout() || req_err.is_connect() {
                AppError::ModelUnavailable(req_err.to_string())
            } else if status == Some(401) {
                AppError::ModelAuth
            } else if status == Some(429) || status.is_some_and(|s| s >= 500) {
                AppError::ModelUnavailable(req_err.to_string())
            } else {
                AppError::ModelInference(req_err.to_string())
            }
        }
        _ => AppError::ModelInference(error.to_string()),
    }
}

/// 텍스트 생성 모델 인터페이스
///
/// 프롬프트와 최대 생성 토큰 수를 받아 생성된 텍스트를 돌려줍니다.
/// 스트리밍이나 구조화 출력은 없고, 결과는 자유 텍스트입니다.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, max_new_tokens: u16) -> Result<String, AppError>;

    /// 엔드포인트 도달 가능 여부 (모델 목록 조회)
    async fn check_connectivity(&self) -> Result<(), AppError>;
}

/// Arc로 래핑된 생성기 (Clone 지원)
pub type SharedGenerator = Arc<dyn TextGenerator>;

/// OpenAI 호환 추론 서버 클라이언트 (vLLM, TGI 등에서 seq2seq 모델 서빙)
#[derive(Clone)]
pub struct OpenAiGenerator {
    client: Client<OpenAIConfig>,
    model_id: String,
}

impl OpenAiGenerator {
    pub fn new(config: &ModelConfig) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_base(config.api_base.clone())
            .with_api_key(config.api_key.clone());
        Self {
            client: Client::with_config(openai_config),
            model_id: config.model_id.clone(),
        }
    }
}

#[async_trait::async_trait]
impl TextGenerator for OpenAiGenerator {
    #[allow(deprecated)]
    async fn generate(&self, prompt: &str, max_new_tokens: u16) -> Result<String, AppError> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(|e| AppError::internal(e.to_string()))?
                .into(),
        ];

        // temperature 0 = greedy decoding (do_sample=False)
        let request = CreateChatCompletionRequestArgs::default()
            .model(self.model_id.as_str())
            .messages(messages)
            .max_tokens(max_new_tokens)
            .temperature(0.0)
            .build()
            .map_err(|e| AppError::internal(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(classify_openai_error)?;

        Ok(response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .unwrap_or_default())
    }

    async fn check_connectivity(&self) -> Result<(), AppError> {
        self.client
            .models()
            .list()
            .await
            .map_err(classify_openai_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_create_generator_for_configured_model() {
        let config = ModelConfig::default();
        let generator = OpenAiGenerator::new(&config);
        assert_eq!(generator.model_id, "google/flan-t5-base");
    }

    #[tokio::test]
    async fn mock_generator_returns_scripted_output() {
        let mut mock = MockTextGenerator::new();
        mock.expect_generate()
            .withf(|prompt, max| prompt.ends_with("Tags:") && *max == 20)
            .returning(|_, _| Ok("login, account, reset".to_string()));

        let output = mock.generate("Ticket: x\nTags:", 20).await.unwrap();
        assert_eq!(output, "login, account, reset");
    }
}
