//! # invoice-lens
//!
//! Extract information from invoice images using Vision Language Models.
//!
//! ## Why this crate?
//!
//! Template-based invoice OCR breaks the moment a supplier changes their
//! layout, and classic OCR output still needs a parsing layer per language
//! and per format. Instead this crate hands the invoice image to a VLM
//! together with the user's own instructions and returns the model's text
//! answer — multi-language invoices, handwritten totals, and odd layouts
//! included, with zero templates to maintain.
//!
//! ## Pipeline Overview
//!
//! ```text
//! invoice image (jpg/png)
//!  │
//!  ├─ 1. Ingest   upload, local file, or URL → UploadedImage
//!  ├─ 2. Compose  [instruction, image, custom prompt] → ExtractionRequest
//!  ├─ 3. Encode   raw bytes → base64 image part
//!  ├─ 4. Model    ONE call to gemini-2.5-flash / gpt-4.1 / claude / …
//!  └─ 5. Present  text response shown verbatim (web page or JSON)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use invoice_lens::{extract_from, ExtractorConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Provider auto-detected from GEMINI_API_KEY / OPENAI_API_KEY / …
//!     let config = ExtractorConfig::default();
//!     let output = extract_from(
//!         "invoice.png",
//!         "Extract total amount and date",
//!         invoice_lens::prompts::DEFAULT_PROMPT,
//!         &config,
//!     )
//!     .await?;
//!     println!("{}", output.text);
//!     eprintln!(
//!         "tokens: {} in / {} out",
//!         output.stats.input_tokens, output.stats.output_tokens
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `web`   | on      | Enables the `invoice-lens` server binary and the axum UI (clap + anyhow + tracing-subscriber) |
//!
//! Disable `web` when using only the library:
//! ```toml
//! invoice-lens = { version = "0.3", default-features = false }
//! ```
//!
//! ## Behavioural contract
//!
//! * The model is called **exactly once** per extraction — no retry, no
//!   backoff, no streaming.
//! * The response text is displayed **unmodified**.
//! * Every failure of the external call surfaces as one generic error
//!   carrying the provider's message.
//! * A missing API key is reported on the first extraction attempt, not at
//!   startup.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod extract;
pub mod output;
pub mod pipeline;
pub mod prompts;
pub mod request;
#[cfg(feature = "web")]
pub mod web;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ExtractorConfig, ExtractorConfigBuilder, DEFAULT_MODEL};
pub use error::ExtractorError;
pub use extract::{extract, extract_from, extract_sync};
pub use output::{ExtractionOutput, ExtractionStats};
pub use pipeline::ingest::{MediaType, UploadedImage};
pub use pipeline::model::{ModelOptions, ModelReply, ProviderModel, VisionModel};
pub use request::ExtractionRequest;
