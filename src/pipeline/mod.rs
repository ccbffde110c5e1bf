//! Pipeline stages for invoice extraction.
//!
//! Each submodule implements exactly one transformation step, independently
//! testable and swappable without touching its neighbours.
//!
//! ## Data Flow
//!
//! ```text
//! ingest ──▶ encode ──▶ model
//! (upload/   (base64)   (one VLM call)
//!  path/URL)
//! ```
//!
//! 1. [`ingest`] — normalise an upload, path, or URL into an `UploadedImage`
//! 2. [`encode`] — base64-wrap the raw bytes for the multimodal request body
//! 3. [`model`]  — the only stage with network I/O; exactly one provider
//!    call per extraction, behind the `VisionModel` seam

pub mod encode;
pub mod ingest;
pub mod model;
