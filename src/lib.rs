//! HTTP gateway exposing language detection, OCR, translation and
//! extractive question answering backed by external services.

pub mod config;
pub mod detect;
pub mod error;
pub mod handlers;
pub mod inference_service;
pub mod ocr;
pub mod qa;
pub mod routes;
pub mod state;
pub mod translate;

pub use config::Config;
pub use error::ApiError;
pub use routes::create_routes;
pub use state::AppState;
