use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::Config;
use crate::detect::{AzureLanguageClient, LanguageDetector};
use crate::inference_service::InferenceServiceClient;
use crate::ocr::{OcrEngine, TesseractOcr};
use crate::qa::{ExtractiveQa, QuestionAnswerer};
use crate::translate::{MarianTranslator, Translator};

/// Clients built once at startup and shared read-only by every request
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub detector: Arc<dyn LanguageDetector>,
    pub ocr: Arc<dyn OcrEngine>,
    pub translator: Arc<dyn Translator>,
    pub qa: Arc<dyn QuestionAnswerer>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let timeout = Duration::from_secs(config.inference.request_timeout_secs);

        if config.language_service.endpoint.is_empty() || config.language_service.key.is_empty() {
            warn!("Language service endpoint or key not configured; detection requests will fail");
        }
        let detector = Arc::new(AzureLanguageClient::new(&config.language_service, timeout)?);

        let ocr = Arc::new(TesseractOcr::new(&config.ocr));
        info!("OCR engine: {} ({})", config.ocr.tesseract_path, config.ocr.languages);

        let inference = Arc::new(InferenceServiceClient::new(
            config.inference.base_url.clone(),
            config.inference.api_token.clone(),
            timeout,
        )?);
        let translator = Arc::new(MarianTranslator::new(
            inference.clone(),
            config.inference.translation_model.clone(),
        ));
        let qa = Arc::new(ExtractiveQa::new(inference, config.inference.qa_model.clone()));
        info!(
            "Inference service: {} (translation={}, qa={})",
            config.inference.base_url,
            config.inference.translation_model,
            config.inference.qa_model
        );

        Ok(Self::from_parts(config, detector, ocr, translator, qa))
    }

    /// Assemble state from arbitrary capability implementations
    pub fn from_parts(
        config: Config,
        detector: Arc<dyn LanguageDetector>,
        ocr: Arc<dyn OcrEngine>,
        translator: Arc<dyn Translator>,
        qa: Arc<dyn QuestionAnswerer>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            detector,
            ocr,
            translator,
            qa,
        }
    }
}
