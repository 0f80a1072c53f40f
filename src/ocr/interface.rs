use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct OcrResponse {
    pub text: String,
    pub detected_language: String,
}

/// OCR interface - actual recognition is done by an external engine
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Decode `image_bytes` and return the recognised text
    async fn extract_text(&self, image_bytes: &[u8]) -> Result<String, anyhow::Error>;
}
