use serde::{Deserialize, Serialize};
use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Client for a model-serving endpoint speaking the Hugging Face Inference API format
#[derive(Debug, Clone)]
pub struct InferenceServiceClient {
    client: Client,
    base_url: String,
    api_token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TranslationRequest<'a> {
    pub inputs: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct TranslationOutput {
    pub translation_text: String,
}

#[derive(Debug, Serialize)]
pub struct QaInputs<'a> {
    pub question: &'a str,
    pub context: &'a str,
}

#[derive(Debug, Serialize)]
pub struct QaParameters {
    pub max_answer_len: usize,
}

#[derive(Debug, Serialize)]
pub struct QaRequest<'a> {
    pub inputs: QaInputs<'a>,
    pub parameters: QaParameters,
}

#[derive(Debug, Deserialize)]
pub struct QaOutput {
    pub answer: String,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub start: usize,
    #[serde(default)]
    pub end: usize,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

impl InferenceServiceClient {
    pub fn new(base_url: String, api_token: Option<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build inference HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token,
        })
    }

    fn model_url(&self, model: &str) -> String {
        format!("{}/models/{}", self.base_url, model)
    }

    async fn post<B: Serialize + ?Sized>(&self, model: &str, body: &B) -> Result<serde_json::Value> {
        let url = self.model_url(model);
        let mut request = self.client.post(&url).json(body);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("inference request to {} failed", model))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .with_context(|| format!("failed to read response from model {}", model))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|e| e.error)
                .unwrap_or_else(|_| body.trim().to_string());
            return Err(anyhow!("model {} returned {}: {}", model, status, message));
        }
        serde_json::from_str(&body).with_context(|| format!("invalid JSON from model {}", model))
    }

    /// Run a translation pipeline and return the first translation
    pub async fn translate(&self, model: &str, text: &str) -> Result<String> {
        debug!("Translating {} chars with {}", text.chars().count(), model);
        let value = self.post(model, &TranslationRequest { inputs: text }).await?;
        parse_translation(value)
    }

    /// Run an extractive question-answering pipeline
    pub async fn answer(
        &self,
        model: &str,
        question: &str,
        context: &str,
        max_answer_len: usize,
    ) -> Result<QaOutput> {
        let request = QaRequest {
            inputs: QaInputs { question, context },
            parameters: QaParameters { max_answer_len },
        };
        let value = self.post(model, &request).await?;
        parse_qa(value)
    }
}

pub(crate) fn parse_translation(value: serde_json::Value) -> Result<String> {
    let outputs: Vec<TranslationOutput> =
        serde_json::from_value(value).context("unexpected translation response shape")?;
    outputs
        .into_iter()
        .next()
        .map(|o| o.translation_text)
        .ok_or_else(|| anyhow!("translation response was empty"))
}

pub(crate) fn parse_qa(value: serde_json::Value) -> Result<QaOutput> {
    // Some servers wrap a single answer in a list
    let value = match value {
        serde_json::Value::Array(items) => items
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("question answering response was empty"))?,
        other => other,
    };
    serde_json::from_value(value).context("unexpected question answering response shape")
}
