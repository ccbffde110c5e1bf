//! Server binary for invoice-lens.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ExtractorConfig` and serves the extraction page.

use anyhow::{Context, Result};
use clap::Parser;
use invoice_lens::{web, ExtractorConfig};
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Serve on the default address (http://127.0.0.1:8501)
  GEMINI_API_KEY=... invoice-lens

  # Different bind address and model
  invoice-lens --host 0.0.0.0 --port 9000 --model gemini-2.5-pro

  # Use another provider
  OPENAI_API_KEY=... invoice-lens --provider openai --model gpt-4.1-mini

SUPPORTED PROVIDERS & MODELS:
  Provider     Model                       Vision
  ─────────    ──────────────────────────  ──────
  gemini       gemini-2.5-flash (default)  ✓
  gemini       gemini-2.5-pro              ✓
  openai       gpt-4.1-mini / gpt-4.1      ✓
  anthropic    claude-sonnet-4-20250514    ✓
  ollama       llava, llama3.2-vision      ✓

ENVIRONMENT VARIABLES:
  GEMINI_API_KEY          Google Gemini API key (GOOGLE_API_KEY also works)
  OPENAI_API_KEY          OpenAI API key
  ANTHROPIC_API_KEY       Anthropic API key
  EDGEQUAKE_LLM_PROVIDER  Override provider (gemini, openai, anthropic, ollama)
  EDGEQUAKE_MODEL         Override model ID

A missing API key does not stop the server from starting; it surfaces as an
error panel on the first extraction attempt.
"#;

/// Serve the invoice-extraction page.
#[derive(Parser, Debug)]
#[command(
    name = "invoice-lens",
    version,
    about = "Extract information from invoice images using Vision LLMs",
    long_about = "Serve a single-page form that sends an uploaded invoice image and free-text \
instructions to a Vision Language Model (Gemini by default; OpenAI, Anthropic, and \
OpenAI-compatible endpoints work too) and shows the model's answer.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Address to bind.
    #[arg(long, env = "INVOICE_LENS_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port to bind.
    #[arg(short, long, env = "INVOICE_LENS_PORT", default_value_t = 8501)]
    port: u16,

    /// Model ID (e.g. gemini-2.5-flash, gpt-4.1-mini).
    #[arg(long, env = "EDGEQUAKE_MODEL")]
    model: Option<String>,

    /// Provider: gemini, openai, anthropic, ollama. Auto-detected from API
    /// key env vars if not set.
    #[arg(long, env = "EDGEQUAKE_PROVIDER")]
    provider: Option<String>,

    /// Max model output tokens per extraction.
    #[arg(long, env = "INVOICE_LENS_MAX_TOKENS", default_value_t = 2048)]
    max_tokens: usize,

    /// Per-call timeout in seconds. Unset = wait as long as the provider
    /// takes.
    #[arg(long, env = "INVOICE_LENS_API_TIMEOUT")]
    api_timeout: Option<u64>,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "INVOICE_LENS_VERBOSE")]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    let mut builder = ExtractorConfig::builder().max_tokens(cli.max_tokens);
    if let Some(ref model) = cli.model {
        builder = builder.model(model);
    }
    if let Some(ref provider) = cli.provider {
        builder = builder.provider_name(provider);
    }
    if let Some(secs) = cli.api_timeout {
        builder = builder.api_timeout_secs(secs);
    }
    let config = builder.build().context("Invalid configuration")?;

    let app = web::router(config);

    let addr = format!("{}:{}", cli.host, cli.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
