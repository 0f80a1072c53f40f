use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use anyhow::{Context, Result};
use regex::Regex;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub language_service: LanguageServiceConfig,
    #[serde(default)]
    pub ocr: OcrConfig,
    #[serde(default)]
    pub inference: InferenceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

/// Azure AI Language (Text Analytics) credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageServiceConfig {
    #[serde(default)]
    pub endpoint: String,
    #[serde(default)]
    pub key: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrConfig {
    #[serde(default = "default_tesseract_path")]
    pub tesseract_path: String,
    /// Tesseract language list, e.g. `tur+ron`
    #[serde(default = "default_ocr_languages")]
    pub languages: String,
    #[serde(default)]
    pub tessdata_dir: Option<String>,
}

/// Hosted model pipelines (Hugging Face Inference API compatible)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    #[serde(default = "default_inference_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_token: Option<String>,
    #[serde(default = "default_translation_model")]
    pub translation_model: String,
    #[serde(default = "default_qa_model")]
    pub qa_model: String,
    #[serde(default = "default_max_answer_len")]
    pub max_answer_len: usize,
    #[serde(default = "default_fallback_answer")]
    pub fallback_answer: String,
    #[serde(default = "default_source_language")]
    pub default_source_language: String,
    #[serde(default = "default_target_language")]
    pub default_target_language: String,
    /// Tag echoed by `/api/ask` when the caller sends none
    #[serde(default = "default_ask_language")]
    pub default_ask_language: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_api_version() -> String {
    "v3.1".to_string()
}

fn default_tesseract_path() -> String {
    "tesseract".to_string()
}

fn default_ocr_languages() -> String {
    "tur+ron".to_string()
}

fn default_inference_url() -> String {
    "https://api-inference.huggingface.co".to_string()
}

fn default_translation_model() -> String {
    "Helsinki-NLP/opus-mt-tr-ro".to_string()
}

fn default_qa_model() -> String {
    "deepset/roberta-base-squad2".to_string()
}

fn default_max_answer_len() -> usize {
    100
}

fn default_fallback_answer() -> String {
    "Bu sorunun cevabı kontekste göre bulunamadı.".to_string()
}

fn default_source_language() -> String {
    "tr".to_string()
}

fn default_target_language() -> String {
    "ro".to_string()
}

fn default_ask_language() -> String {
    "tr".to_string()
}

fn default_request_timeout_secs() -> u64 {
    60
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl Default for LanguageServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            key: String::new(),
            api_version: default_api_version(),
        }
    }
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            tesseract_path: default_tesseract_path(),
            languages: default_ocr_languages(),
            tessdata_dir: None,
        }
    }
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            base_url: default_inference_url(),
            api_token: None,
            translation_model: default_translation_model(),
            qa_model: default_qa_model(),
            max_answer_len: default_max_answer_len(),
            fallback_answer: default_fallback_answer(),
            default_source_language: default_source_language(),
            default_target_language: default_target_language(),
            default_ask_language: default_ask_language(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Config {
    /// Load a YAML or JSON config file, picked by extension.
    ///
    /// `${VAR}` placeholders are replaced with environment values before parsing.
    pub fn load(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            anyhow::bail!("Configuration file not found: {}", path);
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path))?;
        let content = substitute_env_vars(&content, |name| std::env::var(name).ok());

        let path_lower = path.to_lowercase();
        let config = if path_lower.ends_with(".json") {
            serde_json::from_str(&content)?
        } else {
            serde_yaml::from_str(&content)?
        };
        Ok(config)
    }

    /// Find the config file to use.
    ///
    /// An explicit path must load. Fallback paths are skipped only when the
    /// file does not exist; a fallback that exists but fails to parse is an error.
    /// Returns `None` when nothing was found.
    pub fn discover(explicit: Option<&str>, fallbacks: &[&str]) -> Result<Option<(Self, String)>> {
        if let Some(path) = explicit {
            let config = Self::load(path)
                .with_context(|| format!("failed to load config from {}", path))?;
            return Ok(Some((config, path.to_string())));
        }

        for path in fallbacks {
            if !Path::new(path).exists() {
                tracing::debug!("No config at {}", path);
                continue;
            }
            let config = Self::load(path)
                .with_context(|| format!("failed to load config from {}", path))?;
            return Ok(Some((config, path.to_string())));
        }
        Ok(None)
    }

    /// Apply the process environment on top of file values
    pub fn with_env_overrides(self) -> Self {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    pub(crate) fn apply_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("AZURE_LANGUAGE_ENDPOINT") {
            self.language_service.endpoint = v;
        }
        if let Some(v) = get("AZURE_LANGUAGE_KEY") {
            self.language_service.key = v;
        }
        if let Some(v) = get("INFERENCE_API_URL") {
            self.inference.base_url = v;
        }
        if let Some(v) = get("HF_API_TOKEN") {
            self.inference.api_token = Some(v);
        }
        if let Some(v) = get("OCR_LANGUAGE") {
            self.ocr.languages = v;
        }
        if let Some(v) = get("TESSERACT_PATH") {
            self.ocr.tesseract_path = v;
        }
        if let Some(v) = get("TESSDATA_DIR") {
            self.ocr.tessdata_dir = Some(v);
        }
        if let Some(v) = get("HOST") {
            self.server.host = v;
        }
        if let Some(port) = get("PORT").and_then(|v| v.parse().ok()) {
            self.server.port = port;
        }
        self
    }
}

/// Replace `${VAR_NAME}` with the looked-up value; unknown names are left as-is.
pub(crate) fn substitute_env_vars<F>(content: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let pattern = Regex::new(r"\$\{(\w+)\}").expect("static regex");
    pattern
        .replace_all(content, |caps: &regex::Captures| {
            lookup(&caps[1]).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.ocr.languages, "tur+ron");
        assert_eq!(config.inference.max_answer_len, 100);
        assert_eq!(config.inference.default_source_language, "tr");
        assert_eq!(config.inference.default_target_language, "ro");
    }

    #[test]
    fn test_substitute_env_vars() {
        let vars = env(&[("AZURE_LANGUAGE_KEY", "secret")]);
        let out = substitute_env_vars("key: ${AZURE_LANGUAGE_KEY}\nother: ${MISSING}", |n| {
            vars.get(n).cloned()
        });
        assert_eq!(out, "key: secret\nother: ${MISSING}");
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = "server:\n  port: 8080\nocr:\n  languages: ron\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.ocr.languages, "ron");
        assert_eq!(config.ocr.tesseract_path, "tesseract");
        assert_eq!(config.inference.qa_model, "deepset/roberta-base-squad2");
    }

    #[test]
    fn test_env_overrides() {
        let vars = env(&[
            ("AZURE_LANGUAGE_ENDPOINT", "https://example.cognitiveservices.azure.com"),
            ("AZURE_LANGUAGE_KEY", "k"),
            ("PORT", "9000"),
            ("HF_API_TOKEN", ""),
        ]);
        let config = Config::default().apply_overrides(|n| vars.get(n).cloned());
        assert_eq!(
            config.language_service.endpoint,
            "https://example.cognitiveservices.azure.com"
        );
        assert_eq!(config.language_service.key, "k");
        assert_eq!(config.server.port, 9000);
        // blank values do not override
        assert!(config.inference.api_token.is_none());
    }

    #[test]
    fn test_invalid_port_override_ignored() {
        let vars = env(&[("PORT", "not-a-port")]);
        let config = Config::default().apply_overrides(|n| vars.get(n).cloned());
        assert_eq!(config.server.port, 5000);
    }

    #[test]
    fn test_load_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conf.json");
        fs::write(&path, r#"{"inference": {"max_answer_len": 42}}"#).unwrap();
        let config = Config::load(path.to_str().unwrap()).unwrap();
        assert_eq!(config.inference.max_answer_len, 42);
    }

    #[test]
    fn test_discover_skips_missing_fallbacks() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("conf.yaml");
        let present = dir.path().join("conf.json");
        fs::write(&present, r#"{"server": {"port": 6000}}"#).unwrap();

        let (config, path) = Config::discover(
            None,
            &[missing.to_str().unwrap(), present.to_str().unwrap()],
        )
        .unwrap()
        .unwrap();
        assert_eq!(config.server.port, 6000);
        assert_eq!(path, present.to_str().unwrap());
    }

    #[test]
    fn test_discover_nothing_found() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("conf.yaml");
        assert!(Config::discover(None, &[missing.to_str().unwrap()])
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_discover_malformed_fallback_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("conf.yaml");
        let valid = dir.path().join("conf.json");
        fs::write(&broken, "language_service:\n  key: [1, 2]\n").unwrap();
        fs::write(&valid, "{}").unwrap();

        let err = Config::discover(
            None,
            &[broken.to_str().unwrap(), valid.to_str().unwrap()],
        )
        .unwrap_err();
        assert!(format!("{:#}", err).contains("failed to load config from"));
    }

    #[test]
    fn test_discover_explicit_path_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("custom.yaml");
        assert!(Config::discover(Some(missing.to_str().unwrap()), &[]).is_err());
    }

    #[test]
    fn test_ask_language_independent_of_translation_source() {
        let yaml = "inference:\n  default_source_language: en\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.inference.default_source_language, "en");
        assert_eq!(config.inference.default_ask_language, "tr");
    }

    #[test]
    fn test_load_missing_file() {
        assert!(Config::load("/nonexistent/conf.yaml").is_err());
    }
}
