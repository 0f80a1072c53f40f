use async_trait::async_trait;
use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::config::LanguageServiceConfig;
use super::interface::{DetectedLanguage, LanguageDetector};

const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// Azure AI Language client using the Text Analytics `languages` endpoint
pub struct AzureLanguageClient {
    client: Client,
    url: String,
    key: String,
}

#[derive(Debug, Serialize)]
struct DetectionInput<'a> {
    id: &'a str,
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct DetectionRequest<'a> {
    documents: Vec<DetectionInput<'a>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DetectionResponse {
    #[serde(default)]
    documents: Vec<DocumentResult>,
    #[serde(default)]
    errors: Vec<DocumentError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DocumentResult {
    id: String,
    detected_language: PrimaryLanguage,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PrimaryLanguage {
    #[serde(default)]
    name: String,
    iso6391_name: String,
    confidence_score: f64,
}

#[derive(Debug, Deserialize)]
struct DocumentError {
    id: String,
    error: ServiceError,
}

#[derive(Debug, Deserialize)]
struct ServiceError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ServiceError,
}

impl AzureLanguageClient {
    pub fn new(config: &LanguageServiceConfig, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build language service HTTP client")?;
        Ok(Self {
            client,
            url: detection_url(&config.endpoint, &config.api_version),
            key: config.key.clone(),
        })
    }

    fn request(&self, text: &str) -> reqwest::RequestBuilder {
        let body = DetectionRequest {
            documents: vec![DetectionInput { id: "1", text }],
        };
        self.client
            .post(&self.url)
            .header(SUBSCRIPTION_KEY_HEADER, &self.key)
            .json(&body)
    }
}

fn detection_url(endpoint: &str, api_version: &str) -> String {
    format!(
        "{}/text/analytics/{}/languages",
        endpoint.trim_end_matches('/'),
        api_version
    )
}

#[async_trait]
impl LanguageDetector for AzureLanguageClient {
    async fn detect(&self, text: &str) -> Result<DetectedLanguage> {
        if self.key.is_empty() {
            return Err(anyhow!("language service key is not configured"));
        }

        let response = self
            .request(text)
            .send()
            .await
            .context("language detection request failed")?;

        let status = response.status();
        let raw = response
            .text()
            .await
            .context("failed to read language detection response")?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorEnvelope>(&raw)
                .map(|e| format!("{}: {}", e.error.code, e.error.message))
                .unwrap_or_else(|_| raw.trim().to_string());
            return Err(anyhow!("language service returned {}: {}", status, message));
        }

        let detected = parse_detection(&raw)?;
        debug!(
            "Detected language {} ({:.2})",
            detected.language, detected.confidence
        );
        Ok(detected)
    }
}

fn parse_detection(raw: &str) -> Result<DetectedLanguage> {
    let parsed: DetectionResponse =
        serde_json::from_str(raw).context("unexpected language detection response shape")?;

    if let Some(doc) = parsed.documents.into_iter().find(|d| d.id == "1") {
        debug!("Primary language name: {}", doc.detected_language.name);
        return Ok(DetectedLanguage {
            language: doc.detected_language.iso6391_name,
            confidence: doc.detected_language.confidence_score,
        });
    }

    match parsed.errors.into_iter().find(|e| e.id == "1") {
        Some(err) => Err(anyhow!(
            "language detection failed ({}): {}",
            err.error.code,
            err.error.message
        )),
        None => Err(anyhow!("language detection returned no result")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detection_url() {
        assert_eq!(
            detection_url("https://res.cognitiveservices.azure.com/", "v3.1"),
            "https://res.cognitiveservices.azure.com/text/analytics/v3.1/languages"
        );
    }

    #[test]
    fn test_parse_detection_document() {
        let raw = r#"{
            "documents": [{
                "id": "1",
                "detectedLanguage": {"name": "Turkish", "iso6391Name": "tr", "confidenceScore": 0.99},
                "warnings": []
            }],
            "errors": [],
            "modelVersion": "2022-10-01"
        }"#;
        let detected = parse_detection(raw).unwrap();
        assert_eq!(detected.language, "tr");
        assert!((detected.confidence - 0.99).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_detection_document_error() {
        let raw = r#"{
            "documents": [],
            "errors": [{"id": "1", "error": {"code": "InvalidArgument", "message": "Document text is empty."}}],
            "modelVersion": "2022-10-01"
        }"#;
        let err = parse_detection(raw).unwrap_err();
        assert!(err.to_string().contains("Document text is empty."));
    }

    #[test]
    fn test_parse_detection_empty() {
        assert!(parse_detection(r#"{"documents": [], "errors": []}"#).is_err());
        assert!(parse_detection("not json").is_err());
    }

    #[test]
    fn test_request_shape() {
        let config = LanguageServiceConfig {
            endpoint: "https://res.cognitiveservices.azure.com".to_string(),
            key: "secret-key".to_string(),
            api_version: "v3.1".to_string(),
        };
        let client = AzureLanguageClient::new(&config, Duration::from_secs(1)).unwrap();
        let request = client.request("Bună ziua").build().unwrap();

        assert_eq!(request.method(), &reqwest::Method::POST);
        assert_eq!(
            request.url().as_str(),
            "https://res.cognitiveservices.azure.com/text/analytics/v3.1/languages"
        );
        assert_eq!(
            request
                .headers()
                .get(SUBSCRIPTION_KEY_HEADER)
                .unwrap()
                .to_str()
                .unwrap(),
            "secret-key"
        );
        let body: serde_json::Value =
            serde_json::from_slice(request.body().unwrap().as_bytes().unwrap()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "documents": [{ "id": "1", "text": "Bună ziua" }] })
        );
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_request() {
        let config = LanguageServiceConfig::default();
        let client = AzureLanguageClient::new(&config, Duration::from_secs(1)).unwrap();
        let err = client.detect("merhaba").await.unwrap_err();
        assert!(err.to_string().contains("not configured"));
    }
}
