//! Model interaction: build the vision message and call the provider.
//!
//! The provider sits behind the narrow [`VisionModel`] trait so the rest of
//! the crate — and every test — only knows "request in, text out". The
//! production implementation wraps an `edgequake-llm` provider; tests swap
//! in doubles that return fixtures.
//!
//! ## Exactly one call
//!
//! There is deliberately no retry loop here. Each trigger performs one
//! provider round trip; a failure is reported to the user as-is rather than
//! silently re-submitted. Re-trying is the user's decision, made from the
//! result page.

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::pipeline::encode;
use crate::request::ExtractionRequest;
use async_trait::async_trait;
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider, ProviderFactory};
use std::sync::Arc;
use tracing::debug;

/// Per-call sampling options, derived from the config.
#[derive(Debug, Clone)]
pub struct ModelOptions {
    pub temperature: f32,
    pub max_tokens: usize,
}

impl ModelOptions {
    pub fn from_config(config: &ExtractorConfig) -> Self {
        Self {
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }
}

/// The model's reply to one extraction request.
#[derive(Debug, Clone)]
pub struct ModelReply {
    /// Response text, unmodified.
    pub text: String,
    /// Prompt tokens, as reported by the provider (0 if unreported).
    pub input_tokens: u64,
    /// Completion tokens, as reported by the provider (0 if unreported).
    pub output_tokens: u64,
}

/// The narrow seam between the pipeline and the hosted model.
///
/// One method: submit the composed request, get text or an error. Keeping
/// the surface this small is what makes the extraction flow testable with a
/// deterministic double.
#[async_trait]
pub trait VisionModel: Send + Sync {
    async fn generate(
        &self,
        request: &ExtractionRequest,
        options: &ModelOptions,
    ) -> Result<ModelReply, ExtractorError>;
}

/// Production [`VisionModel`] backed by an `edgequake-llm` provider.
pub struct ProviderModel {
    provider: Arc<dyn LLMProvider>,
}

impl ProviderModel {
    /// Wrap an already-constructed provider.
    pub fn new(provider: Arc<dyn LLMProvider>) -> Self {
        Self { provider }
    }

    /// Construct a named provider with the given model id.
    ///
    /// The factory reads the matching API key from the environment
    /// (`GEMINI_API_KEY`, `OPENAI_API_KEY`, …); a missing key surfaces
    /// here, on first use, as [`ExtractorError::ProviderNotConfigured`].
    pub fn from_factory(provider_name: &str, model_id: &str) -> Result<Self, ExtractorError> {
        let provider =
            ProviderFactory::create_llm_provider(provider_name, model_id).map_err(|e| {
                ExtractorError::ProviderNotConfigured {
                    provider: provider_name.to_string(),
                    hint: format!("{e}"),
                }
            })?;
        Ok(Self::new(provider))
    }
}

#[async_trait]
impl VisionModel for ProviderModel {
    /// Submit the request as one chat completion.
    ///
    /// ## Message Layout
    ///
    /// The original submission order is `[instruction, image, prompt]` in a
    /// single parts list. Chat-shaped provider APIs want roles, so the
    /// mapping is:
    /// 1. **System message** — the custom prompt (task framing)
    /// 2. **User message** — the instruction text with the invoice image
    ///    attached as a base64 part
    ///
    /// Both strings go through unchanged, empty or not.
    async fn generate(
        &self,
        request: &ExtractionRequest,
        options: &ModelOptions,
    ) -> Result<ModelReply, ExtractorError> {
        let image_data = encode::encode_image(&request.image);

        let messages = vec![
            ChatMessage::system(request.prompt.as_str()),
            ChatMessage::user_with_images(request.instruction.as_str(), vec![image_data]),
        ];

        let completion_options = CompletionOptions {
            temperature: Some(options.temperature),
            max_tokens: Some(options.max_tokens),
            ..Default::default()
        };

        // One round trip. Network, auth, and malformed-response failures
        // all collapse into the same user-visible error.
        let response = self
            .provider
            .chat(&messages, Some(&completion_options))
            .await
            .map_err(|e| ExtractorError::Extraction {
                message: format!("{e}"),
            })?;

        debug!(
            "Model reply: {} chars, {} tokens in / {} tokens out",
            response.content.len(),
            response.prompt_tokens,
            response.completion_tokens
        );

        Ok(ModelReply {
            text: response.content,
            input_tokens: response.prompt_tokens as u64,
            output_tokens: response.completion_tokens as u64,
        })
    }
}
