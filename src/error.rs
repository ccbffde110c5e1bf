//! Error types for the invoice-lens library.
//!
//! One enum covers the whole pipeline. Two variants carry the behaviour the
//! presentation layer is built around:
//!
//! * [`ExtractorError::MissingFile`] — extraction was requested with no
//!   image present. The model is never invoked in this case.
//!
//! * [`ExtractorError::Extraction`] — the single wrapper for everything the
//!   external call can do wrong (network failure, auth rejection mid-call,
//!   malformed response). The provider's own message is carried through and
//!   shown to the user verbatim; callers get no finer distinction and no
//!   automatic retry.
//!
//! The remaining variants cover ingestion and configuration, where a
//! specific message (wrong file type, unreadable path, dead URL) is worth
//! more than a generic one.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the invoice-lens library.
#[derive(Debug, Error)]
pub enum ExtractorError {
    // ── Ingestion errors ──────────────────────────────────────────────────
    /// Extraction was attempted without an uploaded image.
    #[error("No invoice image was provided.\nChoose a JPG or PNG file before requesting extraction.")]
    MissingFile,

    /// The upload is not one of the accepted image types.
    #[error("Unsupported file type for '{file_name}': {media_type}\nAccepted types: image/jpeg, image/png.")]
    UnsupportedMediaType {
        file_name: String,
        media_type: String,
    },

    /// The payload claimed to be an image but does not decode as one.
    #[error("'{file_name}' is not a readable image: {detail}")]
    InvalidImage { file_name: String, detail: String },

    /// Input file was not found at the given path.
    #[error("Invoice image not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// HTTP URL was syntactically valid but the download failed.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'")]
    DownloadTimeout { url: String, secs: u64 },

    // ── Model errors ──────────────────────────────────────────────────────
    /// The configured provider is not initialised (missing API key etc.).
    ///
    /// This is how an absent credential surfaces: on the first extraction
    /// attempt, not at process start.
    #[error("Vision provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    /// The external call failed. Covers network, authentication, and
    /// malformed-response failures alike; `message` is shown to the user
    /// unchanged.
    #[error("Extraction failed: {message}")]
    Extraction { message: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
