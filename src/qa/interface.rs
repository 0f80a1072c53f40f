use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub context: String,
    pub language: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AskResponse {
    pub question: String,
    pub answer: String,
    pub language: String,
}

/// Extractive question answering: the answer is a span of `context`
#[async_trait]
pub trait QuestionAnswerer: Send + Sync {
    async fn answer(
        &self,
        question: &str,
        context: &str,
        max_answer_len: usize,
    ) -> Result<String, anyhow::Error>;
}
