//! Prompts for invoice extraction.
//!
//! Centralising every prompt here serves two purposes:
//!
//! 1. **Single source of truth** — the default the web form is pre-filled
//!    with and the default the library falls back to are the same constant.
//!
//! 2. **Testability** — unit tests can inspect prompts directly without a
//!    live model, so a wording regression is caught at compile-test time.
//!
//! Both strings are user-overridable per request; the constants apply only
//! when the caller passes nothing of their own.

/// Default custom prompt, pre-filled into the prompt textarea.
///
/// Matches the extraction task as deployed: detail-complete, English output
/// regardless of the invoice's language.
pub const DEFAULT_PROMPT: &str = "Extract all important details from the invoice in English.";

/// Placeholder shown in the instruction input.
///
/// Purely presentational; an empty instruction is valid and passes through
/// unchanged.
pub const INSTRUCTION_HINT: &str = "e.g. 'Extract total amount and date'";
