use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::JsonRejection,
        Multipart, State,
    },
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::detect::{DetectRequest, DetectedLanguage};
use crate::error::ApiError;
use crate::ocr::OcrResponse;
use crate::qa::{AskRequest, AskResponse};
use crate::state::AppState;
use crate::translate::{TranslateRequest, TranslateResponse};

/// Multipart field carrying the image for OCR
const IMAGE_FIELD: &str = "image";

/// Reported when OCR finds no text to detect a language from
const UNKNOWN_LANGUAGE: &str = "unknown";

fn read_json<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::Validation(rejection.body_text()))
}

fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(err.body_text())
    } else {
        ApiError::Validation(err.body_text())
    }
}

/// POST /api/detect-language
pub async fn detect_language(
    State(state): State<AppState>,
    payload: Result<Json<DetectRequest>, JsonRejection>,
) -> Result<Json<DetectedLanguage>, ApiError> {
    let request = read_json(payload)?;
    if request.text.is_empty() {
        return Err(ApiError::Validation("Text required".to_string()));
    }

    let detected = state.detector.detect(&request.text).await?;
    Ok(Json(detected))
}

/// POST /api/ocr
///
/// Expects a multipart form with an `image` file field.
pub async fn ocr(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<OcrResponse>, ApiError> {
    let mut multipart = multipart.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(rejection.body_text())
        } else {
            ApiError::Validation(rejection.body_text())
        }
    })?;

    let mut image = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(multipart_error)?
    {
        if field.name() == Some(IMAGE_FIELD) {
            let data = field
                .bytes()
                .await
                .map_err(multipart_error)?;
            image = Some(data);
            break;
        }
    }

    let image = match image {
        Some(data) if !data.is_empty() => data,
        _ => return Err(ApiError::Validation("No image provided".to_string())),
    };
    debug!("OCR upload: {} bytes", image.len());

    let text = state.ocr.extract_text(&image).await?;

    let detected_language = if text.trim().is_empty() {
        info!("OCR produced no text; skipping language detection");
        UNKNOWN_LANGUAGE.to_string()
    } else {
        state.detector.detect(&text).await?.language
    };

    Ok(Json(OcrResponse {
        text,
        detected_language,
    }))
}

/// POST /api/translate
///
/// The model pair is fixed; the caller's language tags are echoed back as given.
pub async fn translate(
    State(state): State<AppState>,
    payload: Result<Json<TranslateRequest>, JsonRejection>,
) -> Result<Json<TranslateResponse>, ApiError> {
    let request = read_json(payload)?;
    let defaults = &state.config.inference;
    let source_language = request
        .source_language
        .unwrap_or_else(|| defaults.default_source_language.clone());
    let target_language = request
        .target_language
        .unwrap_or_else(|| defaults.default_target_language.clone());

    if request.text.is_empty() {
        return Err(ApiError::Validation("Text required".to_string()));
    }

    let translated = state.translator.translate(&request.text).await?;

    Ok(Json(TranslateResponse {
        original: request.text,
        translated,
        source_language,
        target_language,
    }))
}

/// POST /api/ask
///
/// QA failures never surface as errors; the configured fallback answer is returned instead.
pub async fn ask(
    State(state): State<AppState>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> Result<Json<AskResponse>, ApiError> {
    let request = read_json(payload)?;
    if request.question.is_empty() || request.context.is_empty() {
        return Err(ApiError::Validation(
            "Question and context required".to_string(),
        ));
    }

    let settings = &state.config.inference;
    let language = request
        .language
        .unwrap_or_else(|| settings.default_ask_language.clone());

    let answer = match state
        .qa
        .answer(&request.question, &request.context, settings.max_answer_len)
        .await
    {
        Ok(answer) => answer,
        Err(e) => {
            warn!("Question answering failed, using fallback: {:#}", e);
            settings.fallback_answer.clone()
        }
    };

    Ok(Json(AskResponse {
        question: request.question,
        answer,
        language,
    }))
}

/// GET /health
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}
