pub mod interface;
pub mod client;

pub use interface::{DetectRequest, DetectedLanguage, LanguageDetector};
pub use client::AzureLanguageClient;
