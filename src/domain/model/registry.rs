//! 모델 핸들 레지스트리
//!
//! 처음 요청될 때 한 번 로드하고 이후 요청에서 재사용합니다.
//! `reset()`으로 명시적으로 무효화하면 다음 요청에서 다시 로드합니다.
//! 로드 실패는 재시도하지 않고 그대로 호출자에게 전달합니다.

use std::sync::Arc;

use tokio::sync::RwLock;

use super::client::{OpenAiGenerator, SharedGenerator, TextGenerator};
use crate::config::ModelConfig;
use crate::error::AppError;

/// 모델 생성 방법
#[async_trait::async_trait]
pub trait ModelLoader: Send + Sync {
    async fn load(&self) -> Result<SharedGenerator, AppError>;

    /// 상태 표시용 모델 이름
    fn describe(&self) -> String;
}

/// OpenAI 호환 엔드포인트 로더
pub struct OpenAiLoader {
    config: ModelConfig,
}

impl OpenAiLoader {
    pub fn new(config: ModelConfig) -> Self {
        Self { config }
    }
}

#[async_trait::async_trait]
impl ModelLoader for OpenAiLoader {
    async fn load(&self) -> Result<SharedGenerator, AppError> {
        let generator = OpenAiGenerator::new(&self.config);

        if self.config.verify_on_load {
            generator
                .check_connectivity()
                .await
                .map_err(|e| AppError::ModelLoad(e.to_string()))?;
        }

        Ok(Arc::new(generator))
    }

    fn describe(&self) -> String {
        self.config.model_id.clone()
    }
}

/// 이미 만들어진 생성기를 그대로 돌려주는 로더 (테스트, 임베딩용)
pub struct StaticLoader {
    generator: SharedGenerator,
    name: String,
}

impl StaticLoader {
    pub fn new(generator: SharedGenerator, name: impl Into<String>) -> Self {
        Self {
            generator,
            name: name.into(),
        }
    }
}

#[async_trait::async_trait]
impl ModelLoader for StaticLoader {
    async fn load(&self) -> Result<SharedGenerator, AppError> {
        Ok(Arc::clone(&self.generator))
    }

    fn describe(&self) -> String {
        self.name.clone()
    }
}

/// 지연 초기화되는 모델 싱글턴
pub struct ModelRegistry {
    loader: Box<dyn ModelLoader>,
    slot: RwLock<Option<SharedGenerator>>,
}

impl ModelRegistry {
    pub fn new(loader: impl ModelLoader + 'static) -> Self {
        Self {
            loader: Box::new(loader),
            slot: RwLock::new(None),
        }
    }

    /// 로드된 모델을 반환하고, 없으면 로드한다
    pub async fn get_or_load(&self) -> Result<SharedGenerator, AppError> {
        if let Some(generator) = self.slot.read().await.as_ref() {
            return Ok(Arc::clone(generator));
        }

        let mut slot = self.slot.write().await;
        // 쓰기 락을 기다리는 동안 다른 요청이 로드했을 수 있음
        if let Some(generator) = slot.as_ref() {
            return Ok(Arc::clone(generator));
        }

        let model = self.loader.describe();
        tracing::info!(model = %model, "Loading model");

        match self.loader.load().await {
            Ok(generator) => {
                metrics::counter!("model_loads_total", "outcome" => "success").increment(1);
                tracing::info!(model = %model, "Model ready");
                *slot = Some(Arc::clone(&generator));
                Ok(generator)
            }
            Err(e) => {
                metrics::counter!("model_loads_total", "outcome" => "failure").increment(1);
                tracing::error!(model = %model, error = %e, "Model load failed");
                Err(match e {
                    AppError::ModelLoad(_) => e,
                    other => AppError::ModelLoad(other.to_string()),
                })
            }
        }
    }

    pub async fn is_loaded(&self) -> bool {
        self.slot.read().await.is_some()
    }

    /// 이미 로드된 모델만 반환 (로드를 시도하지 않음)
    pub async fn loaded(&self) -> Option<SharedGenerator> {
        self.slot.read().await.as_ref().map(Arc::clone)
    }

    /// 캐시된 모델을 버린다. 다음 `get_or_load`에서 다시 로드
    pub async fn reset(&self) {
        let previous = self.slot.write().await.take();
        if previous.is_some() {
            tracing::info!(model = %self.loader.describe(), "Model handle invalidated");
        }
    }

    pub fn model_name(&self) -> String {
        self.loader.describe()
    }
}
