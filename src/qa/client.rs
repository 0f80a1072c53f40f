use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use crate::inference_service::InferenceServiceClient;
use super::interface::QuestionAnswerer;

/// RoBERTa SQuAD2 pipeline served by the inference service
pub struct ExtractiveQa {
    inference: Arc<InferenceServiceClient>,
    model: String,
}

impl ExtractiveQa {
    pub fn new(inference: Arc<InferenceServiceClient>, model: String) -> Self {
        Self { inference, model }
    }
}

#[async_trait]
impl QuestionAnswerer for ExtractiveQa {
    async fn answer(
        &self,
        question: &str,
        context: &str,
        max_answer_len: usize,
    ) -> Result<String, anyhow::Error> {
        let output = self
            .inference
            .answer(&self.model, question, context, max_answer_len)
            .await?;
        debug!(
            "QA answer span {}..{} (score {:.3})",
            output.start, output.end, output.score
        );
        Ok(output.answer)
    }
}
