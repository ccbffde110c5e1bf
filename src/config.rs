//! Configuration for invoice extraction.
//!
//! All behaviour is controlled through [`ExtractorConfig`], built via its
//! [`ExtractorConfigBuilder`]. Keeping every knob in one struct makes it
//! trivial to share the config across handlers, serialise the plain fields
//! for logging, and inject a deterministic model double in tests.
//!
//! # Design choice: builder over constructor
//! Callers set only what they care about and rely on documented defaults
//! for the rest; new fields don't break existing call sites.

use crate::error::ExtractorError;
use crate::pipeline::model::VisionModel;
use std::fmt;
use std::sync::Arc;

/// Default model when none is configured: the original deployment target.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Configuration for one extractor instance.
///
/// Built via [`ExtractorConfig::builder()`] or [`ExtractorConfig::default()`].
///
/// # Example
/// ```rust
/// use invoice_lens::ExtractorConfig;
///
/// let config = ExtractorConfig::builder()
///     .model("gemini-2.5-flash")
///     .max_tokens(2048)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ExtractorConfig {
    /// Model identifier, e.g. "gemini-2.5-flash", "gpt-4.1-mini".
    /// If None, uses [`DEFAULT_MODEL`].
    pub model: Option<String>,

    /// Provider name (e.g. "gemini", "openai", "anthropic", "ollama").
    /// If None along with `vision_model`, the provider is resolved from the
    /// environment on the first extraction attempt.
    pub provider_name: Option<String>,

    /// Pre-constructed vision model. Takes precedence over `provider_name`.
    ///
    /// This is the test seam: inject a double returning fixture text and no
    /// credential or network access is needed anywhere in the pipeline.
    pub vision_model: Option<Arc<dyn VisionModel>>,

    /// Sampling temperature. Default: 0.1.
    ///
    /// Extraction wants the model faithful to what is printed on the
    /// invoice, not creative, so the default sits close to zero.
    pub temperature: f32,

    /// Maximum tokens the model may generate. Default: 2048.
    ///
    /// Dense invoices (long line-item tables) stay well under this; setting
    /// it too low silently truncates the response mid-sentence.
    pub max_tokens: usize,

    /// Per-call timeout in seconds. Default: None.
    ///
    /// `None` preserves the upstream behaviour: a slow provider stalls that
    /// one interaction indefinitely. Set `Some(n)` to fail the call after
    /// `n` seconds instead; the timeout reports as an ordinary extraction
    /// error.
    pub api_timeout_secs: Option<u64>,

    /// Download timeout for URL inputs in seconds. Default: 120.
    pub download_timeout_secs: u64,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            model: None,
            provider_name: None,
            vision_model: None,
            temperature: 0.1,
            max_tokens: 2048,
            api_timeout_secs: None,
            download_timeout_secs: 120,
        }
    }
}

impl fmt::Debug for ExtractorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractorConfig")
            .field("model", &self.model)
            .field("provider_name", &self.provider_name)
            .field(
                "vision_model",
                &self.vision_model.as_ref().map(|_| "<dyn VisionModel>"),
            )
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("download_timeout_secs", &self.download_timeout_secs)
            .finish()
    }
}

impl ExtractorConfig {
    /// Create a new builder for `ExtractorConfig`.
    pub fn builder() -> ExtractorConfigBuilder {
        ExtractorConfigBuilder {
            config: Self::default(),
        }
    }

    /// The model identifier to request, falling back to [`DEFAULT_MODEL`].
    pub fn model_id(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }
}

/// Builder for [`ExtractorConfig`].
#[derive(Debug)]
pub struct ExtractorConfigBuilder {
    config: ExtractorConfig,
}

impl ExtractorConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = Some(model.into());
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = Some(name.into());
        self
    }

    pub fn vision_model(mut self, model: Arc<dyn VisionModel>) -> Self {
        self.config.vision_model = Some(model);
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = Some(secs);
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ExtractorConfig, ExtractorError> {
        let c = &self.config;
        if c.max_tokens == 0 {
            return Err(ExtractorError::InvalidConfig(
                "max_tokens must be ≥ 1".into(),
            ));
        }
        if c.api_timeout_secs == Some(0) {
            return Err(ExtractorError::InvalidConfig(
                "api_timeout_secs must be ≥ 1 when set".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_model_id() {
        let config = ExtractorConfig::default();
        assert_eq!(config.model_id(), DEFAULT_MODEL);
    }

    #[test]
    fn builder_overrides_model() {
        let config = ExtractorConfig::builder()
            .model("gpt-4.1-mini")
            .build()
            .unwrap();
        assert_eq!(config.model_id(), "gpt-4.1-mini");
    }

    #[test]
    fn temperature_is_clamped() {
        let config = ExtractorConfig::builder().temperature(9.0).build().unwrap();
        assert_eq!(config.temperature, 2.0);
    }

    #[test]
    fn zero_max_tokens_rejected() {
        let err = ExtractorConfig::builder().max_tokens(0).build();
        assert!(matches!(err, Err(ExtractorError::InvalidConfig(_))));
    }

    #[test]
    fn timeout_unset_by_default() {
        assert_eq!(ExtractorConfig::default().api_timeout_secs, None);
    }
}
