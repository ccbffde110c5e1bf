//! Input ingestion: normalise an upload, local path, or URL to an
//! [`UploadedImage`].
//!
//! Whatever the source, the result is the same in-memory value: the raw
//! bytes exactly as supplied plus the declared media type. The bytes are
//! never transcoded here; the decode below is a header check, not a
//! re-encode, so what the model receives is byte-for-byte what the user
//! uploaded. We do decode the image once to record its dimensions and to
//! reject corrupt payloads with a meaningful error instead of letting the
//! provider fail with an opaque one.

use crate::error::ExtractorError;
use image::GenericImageView;
use std::path::Path;
use tracing::{debug, info};

/// Accepted invoice image formats.
///
/// A closed set: the upload surface is restricted to jpg/jpeg/png, and the
/// declared type travels to the provider unchanged, so everything else is
/// rejected at the door.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Jpeg,
    Png,
}

impl MediaType {
    /// The MIME string sent to the provider, e.g. `image/png`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }

    /// Parse a declared MIME type (from a multipart part or HTTP header).
    pub fn from_declared(mime: &str) -> Option<Self> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            _ => None,
        }
    }

    /// Parse a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            _ => None,
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An ingested invoice image: raw bytes plus declared media type.
///
/// Transient by design — held for the duration of one extraction, never
/// persisted. `width`/`height` come from the decode check and feed the
/// preview caption.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    /// Original file name, for display and error messages.
    pub file_name: String,
    /// Declared media type, passed through to the provider unchanged.
    pub media_type: MediaType,
    /// Raw image bytes exactly as uploaded.
    pub bytes: Vec<u8>,
    /// Pixel width, recorded at ingest.
    pub width: u32,
    /// Pixel height, recorded at ingest.
    pub height: u32,
}

impl UploadedImage {
    /// Ingest an uploaded file: declared media type (falling back to the
    /// file extension), a decode check, and the bytes as-is.
    ///
    /// # Errors
    /// * [`ExtractorError::MissingFile`] — empty payload
    /// * [`ExtractorError::UnsupportedMediaType`] — not jpg/jpeg/png
    /// * [`ExtractorError::InvalidImage`] — bytes do not decode
    pub fn from_upload(
        file_name: impl Into<String>,
        declared_type: Option<&str>,
        bytes: Vec<u8>,
    ) -> Result<Self, ExtractorError> {
        let file_name = file_name.into();

        if bytes.is_empty() {
            return Err(ExtractorError::MissingFile);
        }

        let media_type = declared_type
            .and_then(MediaType::from_declared)
            .or_else(|| extension_of(&file_name).and_then(|e| MediaType::from_extension(&e)))
            .ok_or_else(|| ExtractorError::UnsupportedMediaType {
                file_name: file_name.clone(),
                media_type: declared_type.unwrap_or("unknown").to_string(),
            })?;

        let (width, height) = decode_dimensions(&file_name, &bytes)?;

        debug!(
            "Ingested '{}': {} bytes, {}, {}x{}",
            file_name,
            bytes.len(),
            media_type,
            width,
            height
        );

        Ok(Self {
            file_name,
            media_type,
            bytes,
            width,
            height,
        })
    }

    /// Ingest an invoice image from a local file path.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ExtractorError> {
        let path = path.as_ref();

        let bytes = std::fs::read(path).map_err(|_| ExtractorError::FileNotFound {
            path: path.to_path_buf(),
        })?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Self::from_upload(file_name, None, bytes)
    }

    /// Download an invoice image over HTTP(S) and ingest it.
    ///
    /// The declared type comes from the `Content-Type` response header,
    /// falling back to the URL's file extension.
    pub async fn from_url(url: &str, timeout_secs: u64) -> Result<Self, ExtractorError> {
        info!("Downloading invoice image from: {}", url);

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ExtractorError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let response = client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                ExtractorError::DownloadTimeout {
                    url: url.to_string(),
                    secs: timeout_secs,
                }
            } else {
                ExtractorError::DownloadFailed {
                    url: url.to_string(),
                    reason: e.to_string(),
                }
            }
        })?;

        if !response.status().is_success() {
            return Err(ExtractorError::DownloadFailed {
                url: url.to_string(),
                reason: format!("HTTP {}", response.status()),
            });
        }

        let declared = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(';').next().unwrap_or(v).trim().to_string());

        let file_name = filename_from_url(url);

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ExtractorError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        Self::from_upload(file_name, declared.as_deref(), bytes.to_vec())
    }

    /// Payload size in bytes.
    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }
}

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Resolve a user-supplied string to an ingested image.
///
/// URLs are downloaded; anything else is treated as a local path.
pub async fn resolve_source(input: &str, timeout_secs: u64) -> Result<UploadedImage, ExtractorError> {
    if is_url(input) {
        UploadedImage::from_url(input, timeout_secs).await
    } else {
        UploadedImage::from_path(input)
    }
}

/// Decode the payload once to validate it and read its dimensions.
fn decode_dimensions(file_name: &str, bytes: &[u8]) -> Result<(u32, u32), ExtractorError> {
    let img = image::load_from_memory(bytes).map_err(|e| ExtractorError::InvalidImage {
        file_name: file_name.to_string(),
        detail: e.to_string(),
    })?;
    Ok(img.dimensions())
}

fn extension_of(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
}

/// Extract a reasonable filename from the URL path.
fn filename_from_url(url: &str) -> String {
    if let Ok(parsed) = reqwest::Url::parse(url) {
        if let Some(mut segments) = parsed.path_segments() {
            if let Some(last) = segments.next_back() {
                if !last.is_empty() {
                    return last.to_string();
                }
            }
        }
    }
    "invoice".to_string()
}
