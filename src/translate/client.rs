use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use crate::inference_service::InferenceServiceClient;
use super::interface::Translator;

/// MarianMT translation pipeline served by the inference service
pub struct MarianTranslator {
    inference: Arc<InferenceServiceClient>,
    model: String,
}

impl MarianTranslator {
    pub fn new(inference: Arc<InferenceServiceClient>, model: String) -> Self {
        Self { inference, model }
    }
}

#[async_trait]
impl Translator for MarianTranslator {
    async fn translate(&self, text: &str) -> Result<String, anyhow::Error> {
        let translated = self.inference.translate(&self.model, text).await?;
        debug!("Translation complete: {} chars", translated.chars().count());
        Ok(translated)
    }
}
