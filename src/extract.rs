//! Extraction entry points.
//!
//! [`extract`] is the primary API: one composed request in, one text
//! response out. Everything interactive (the web form) and everything
//! programmatic (path/URL helpers, the sync wrapper) funnels through it, so
//! the "exactly one provider call per trigger" behaviour lives in a single
//! place.

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::output::{ExtractionOutput, ExtractionStats};
use crate::pipeline::ingest;
use crate::pipeline::model::{ModelOptions, ProviderModel, VisionModel};
use crate::request::ExtractionRequest;
use edgequake_llm::ProviderFactory;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Submit one extraction request and return the model's text response.
///
/// # Arguments
/// * `request` — the composed instruction/image/prompt triple
/// * `config`  — extractor configuration
///
/// # Errors
/// * [`ExtractorError::ProviderNotConfigured`] — no usable credential; this
///   is the first moment a missing API key becomes visible
/// * [`ExtractorError::Extraction`] — the single wrapper for every failure
///   of the call itself
///
/// The provider is invoked exactly once; there is no retry and no
/// streaming. With `api_timeout_secs` unset (the default) the call blocks
/// until the provider responds.
pub async fn extract(
    request: &ExtractionRequest,
    config: &ExtractorConfig,
) -> Result<ExtractionOutput, ExtractorError> {
    let start = Instant::now();
    info!(
        "Extracting from '{}' ({} bytes)",
        request.image.file_name,
        request.image.byte_len()
    );

    let model = resolve_vision_model(config)?;
    let options = ModelOptions::from_config(config);

    let reply = match config.api_timeout_secs {
        Some(secs) => tokio::time::timeout(
            std::time::Duration::from_secs(secs),
            model.generate(request, &options),
        )
        .await
        .map_err(|_| ExtractorError::Extraction {
            message: format!("API call timed out after {secs}s"),
        })??,
        None => model.generate(request, &options).await?,
    };

    let stats = ExtractionStats {
        input_tokens: reply.input_tokens,
        output_tokens: reply.output_tokens,
        duration_ms: start.elapsed().as_millis() as u64,
    };

    info!(
        "Extraction complete: {} chars, {} tokens in / {} tokens out, {}ms",
        reply.text.len(),
        stats.input_tokens,
        stats.output_tokens,
        stats.duration_ms
    );

    Ok(ExtractionOutput {
        text: reply.text,
        stats,
    })
}

/// Ingest an image from a local path or HTTP(S) URL and extract from it.
///
/// This is the convenience entry for library callers; the web form goes
/// through [`extract`] directly with the bytes it already holds.
pub async fn extract_from(
    input: impl AsRef<str>,
    instruction: impl Into<String>,
    prompt: impl Into<String>,
    config: &ExtractorConfig,
) -> Result<ExtractionOutput, ExtractorError> {
    let image = ingest::resolve_source(input.as_ref(), config.download_timeout_secs).await?;
    let request = ExtractionRequest::new(instruction, image, prompt);
    extract(&request, config).await
}

/// Synchronous wrapper around [`extract`].
///
/// Creates a temporary tokio runtime internally.
pub fn extract_sync(
    request: &ExtractionRequest,
    config: &ExtractorConfig,
) -> Result<ExtractionOutput, ExtractorError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| ExtractorError::Extraction {
            message: format!("Failed to create tokio runtime: {e}"),
        })?
        .block_on(extract(request, config))
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Resolve the vision model, from most-specific to least-specific.
///
/// 1. **Pre-built model** (`config.vision_model`) — the caller constructed
///    it entirely; used as-is. This is how tests inject doubles.
///
/// 2. **Named provider** (`config.provider_name`) — the factory reads the
///    corresponding API key from the environment.
///
/// 3. **Environment pair** (`EDGEQUAKE_LLM_PROVIDER` + `EDGEQUAKE_MODEL`)
///    — provider and model chosen at the execution-environment level.
///
/// 4. **Gemini key present** (`GEMINI_API_KEY` / `GOOGLE_API_KEY`) — the
///    original deployment target; preferred over full auto-detection so a
///    Gemini credential wins even when other keys are also set.
///
/// 5. **Full auto-detection** (`ProviderFactory::from_env`) — first
///    available provider from any known API key variable.
fn resolve_vision_model(
    config: &ExtractorConfig,
) -> Result<Arc<dyn VisionModel>, ExtractorError> {
    // 1) User-provided model takes priority
    if let Some(ref model) = config.vision_model {
        return Ok(Arc::clone(model));
    }

    // 2) Provider name + model
    if let Some(ref name) = config.provider_name {
        return Ok(Arc::new(ProviderModel::from_factory(
            name,
            config.model_id(),
        )?));
    }

    // 3) Explicit provider/model pair from the environment
    if let (Ok(prov), Ok(model)) = (
        std::env::var("EDGEQUAKE_LLM_PROVIDER"),
        std::env::var("EDGEQUAKE_MODEL"),
    ) {
        if !prov.is_empty() && !model.is_empty() {
            return Ok(Arc::new(ProviderModel::from_factory(&prov, &model)?));
        }
    }

    // 4) Prefer Gemini when its key is present
    let gemini_key = std::env::var("GEMINI_API_KEY")
        .or_else(|_| std::env::var("GOOGLE_API_KEY"))
        .unwrap_or_default();
    if !gemini_key.is_empty() {
        return Ok(Arc::new(ProviderModel::from_factory(
            "gemini",
            config.model_id(),
        )?));
    }

    // 5) Full auto-detection
    let (provider, _embedding) =
        ProviderFactory::from_env().map_err(|e| ExtractorError::ProviderNotConfigured {
            provider: "auto".to_string(),
            hint: format!(
                "No vision provider could be auto-detected from the environment.\n\
                Set GEMINI_API_KEY (or OPENAI_API_KEY, ANTHROPIC_API_KEY), or \
                configure a provider explicitly.\nError: {}",
                e
            ),
        })?;

    Ok(Arc::new(ProviderModel::new(provider)))
}
