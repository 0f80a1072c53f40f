use async_trait::async_trait;
use anyhow::{anyhow, Context, Result};
use image::GenericImageView;
use std::io::Write;
use tempfile::NamedTempFile;
use tokio::process::Command;
use tracing::debug;

use crate::config::OcrConfig;
use super::interface::OcrEngine;

/// Runs the `tesseract` CLI over a decoded copy of the uploaded image
pub struct TesseractOcr {
    binary: String,
    languages: String,
    tessdata_dir: Option<String>,
}

impl TesseractOcr {
    pub fn new(config: &OcrConfig) -> Self {
        Self {
            binary: config.tesseract_path.clone(),
            languages: config.languages.clone(),
            tessdata_dir: config.tessdata_dir.clone(),
        }
    }

    fn command(&self, input: &std::path::Path) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.arg(input).arg("stdout").arg("-l").arg(&self.languages);
        if let Some(dir) = &self.tessdata_dir {
            cmd.arg("--tessdata-dir").arg(dir);
        }
        cmd.kill_on_drop(true);
        cmd
    }
}

/// Decode arbitrary image bytes and re-encode them as PNG in a temp file
pub(crate) fn decode_to_png(image_bytes: &[u8]) -> Result<NamedTempFile> {
    let image =
        image::load_from_memory(image_bytes).context("failed to decode image for OCR")?;
    let (width, height) = image.dimensions();
    debug!("Decoded OCR image {}x{}", width, height);

    let mut tmp = tempfile::Builder::new()
        .suffix(".png")
        .tempfile()
        .context("failed to create temp file for OCR")?;
    image
        .write_to(&mut tmp, image::ImageFormat::Png)
        .context("failed to write temp image for OCR")?;
    tmp.flush().context("failed to flush temp image for OCR")?;
    Ok(tmp)
}

/// Tesseract terminates each page with a form feed
pub(crate) fn clean_output(stdout: &[u8]) -> String {
    String::from_utf8_lossy(stdout)
        .trim_end_matches(|c: char| c == '\u{c}' || c.is_whitespace())
        .to_string()
}

#[async_trait]
impl OcrEngine for TesseractOcr {
    async fn extract_text(&self, image_bytes: &[u8]) -> Result<String> {
        let bytes = image_bytes.to_vec();
        let tmp = tokio::task::spawn_blocking(move || decode_to_png(&bytes))
            .await
            .context("image decoding task failed")??;

        let output = self
            .command(tmp.path())
            .output()
            .await
            .with_context(|| format!("failed to run {} (is it installed?)", self.binary))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!("tesseract failed: {}", stderr.trim()));
        }

        let text = clean_output(&output.stdout);
        debug!(
            "OCR ({}) extracted {} chars",
            self.languages,
            text.chars().count()
        );
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};
    use std::io::Cursor;

    fn tiny_jpeg() -> Vec<u8> {
        let img: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::from_pixel(4, 4, Rgb([255, 255, 255]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Jpeg).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_decode_to_png() {
        let tmp = decode_to_png(&tiny_jpeg()).unwrap();
        let written = std::fs::read(tmp.path()).unwrap();
        assert!(written.starts_with(&[0x89, b'P', b'N', b'G']));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = decode_to_png(b"definitely not an image").unwrap_err();
        assert!(err.to_string().contains("failed to decode image"));
    }

    #[test]
    fn test_clean_output_strips_page_break() {
        assert_eq!(clean_output(b"Merhaba d\xc3\xbcnya\n\x0c"), "Merhaba dünya");
        assert_eq!(clean_output(b"\n\x0c"), "");
    }

    #[test]
    fn test_command_args() {
        let ocr = TesseractOcr::new(&OcrConfig {
            tesseract_path: "tesseract".into(),
            languages: "tur+ron".into(),
            tessdata_dir: Some("/usr/share/tessdata".into()),
        });
        let cmd = ocr.command(std::path::Path::new("/tmp/x.png"));
        let args: Vec<_> = cmd
            .as_std()
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            args,
            vec!["/tmp/x.png", "stdout", "-l", "tur+ron", "--tessdata-dir", "/usr/share/tessdata"]
        );
    }

    #[tokio::test]
    async fn test_missing_binary_is_error() {
        let ocr = TesseractOcr::new(&OcrConfig {
            tesseract_path: "/nonexistent/tesseract".into(),
            languages: "tur+ron".into(),
            tessdata_dir: None,
        });
        assert!(ocr.extract_text(&tiny_jpeg()).await.is_err());
    }
}
