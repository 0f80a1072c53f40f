use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Primary language reported by the detector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedLanguage {
    /// ISO 639-1 tag as returned by the service
    pub language: String,
    pub confidence: f64,
}

/// Language detection interface - implemented by the cloud language service
#[async_trait]
pub trait LanguageDetector: Send + Sync {
    async fn detect(&self, text: &str) -> Result<DetectedLanguage, anyhow::Error>;
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DetectRequest {
    #[serde(default)]
    pub text: String,
}
