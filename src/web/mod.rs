//! The web presentation layer: one page, one form, one extraction per
//! submit.
//!
//! ## Interaction states
//!
//! * **Idle** — `GET /` renders the empty form. The file input is
//!   `required`, so the trigger is a no-op until an image is chosen.
//! * **Ready** — a file is selected; the browser shows the local preview
//!   and the trigger becomes usable. No server round trip.
//! * **Extracting** — the form POSTs to `/extract`; the trigger is
//!   disabled client-side and the handler blocks on the one provider call.
//! * **Done** — the response re-renders the form with the same inputs, the
//!   uploaded image, and a success or error panel. Submitting again goes
//!   straight back to Extracting; Idle only returns with a fresh page load.
//!
//! Every error is caught here and rendered into the page (or the JSON
//! `detail` field on the API route); nothing propagates far enough to take
//! the server down.

pub mod render;

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::extract::extract;
use crate::output::ExtractionOutput;
use crate::pipeline::encode;
use crate::pipeline::ingest::UploadedImage;
use crate::prompts::DEFAULT_PROMPT;
use crate::request::ExtractionRequest;
use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use render::{Outcome, PageView, Preview};
use serde_json::json;
use tracing::warn;

/// Upload cap. Phone photos of invoices run a few MB; 20 MiB is generous
/// without letting a stray upload exhaust memory.
const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub config: ExtractorConfig,
}

/// Build the application router.
pub fn router(config: ExtractorConfig) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/extract", post(extract_form))
        .route("/api/extract", post(extract_api))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(AppState { config })
}

async fn index() -> Html<String> {
    Html(render::page(&PageView::idle()))
}

async fn health() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

// ── Form surface ─────────────────────────────────────────────────────────

async fn extract_form(State(state): State<AppState>, multipart: Multipart) -> Html<String> {
    let form = match read_form(multipart).await {
        Ok(form) => form,
        Err(message) => {
            warn!("Rejected form submission: {message}");
            return Html(render::page(&PageView::done(
                String::new(),
                DEFAULT_PROMPT.to_string(),
                None,
                Outcome::Error { message },
            )));
        }
    };

    Html(render::page(&submit(&state.config, form).await))
}

/// Run one submission through ingest → compose → extract and map the result
/// onto the Done page. All failures end here as an error panel.
async fn submit(config: &ExtractorConfig, form: SubmittedForm) -> PageView {
    let Some(upload) = form.upload else {
        return PageView::done(
            form.instruction,
            form.prompt,
            None,
            Outcome::Error {
                message: ExtractorError::MissingFile.to_string(),
            },
        );
    };

    let image = match UploadedImage::from_upload(
        upload.file_name,
        upload.content_type.as_deref(),
        upload.bytes,
    ) {
        Ok(image) => image,
        Err(e) => {
            warn!("Upload rejected: {e}");
            return PageView::done(
                form.instruction,
                form.prompt,
                None,
                Outcome::Error {
                    message: e.to_string(),
                },
            );
        }
    };

    let preview = Preview {
        data_uri: encode::data_uri(&image),
        caption: format!("{} ({}x{})", image.file_name, image.width, image.height),
    };

    let request = ExtractionRequest::new(form.instruction.clone(), image, form.prompt.clone());

    match extract(&request, config).await {
        Ok(output) => PageView::done(
            form.instruction,
            form.prompt,
            Some(preview),
            Outcome::Success(output),
        ),
        Err(e) => {
            warn!("Extraction failed: {e}");
            PageView::done(
                form.instruction,
                form.prompt,
                Some(preview),
                Outcome::Error {
                    message: e.to_string(),
                },
            )
        }
    }
}

// ── JSON surface ─────────────────────────────────────────────────────────

async fn extract_api(State(state): State<AppState>, multipart: Multipart) -> Response {
    let form = match read_form(multipart).await {
        Ok(form) => form,
        Err(message) => {
            return (StatusCode::BAD_REQUEST, Json(json!({"detail": message}))).into_response();
        }
    };

    match api_extract(&state.config, form).await {
        Ok(output) => (StatusCode::OK, Json(output)).into_response(),
        Err(e) => {
            warn!("API extraction failed: {e}");
            (status_for(&e), Json(json!({"detail": e.to_string()}))).into_response()
        }
    }
}

async fn api_extract(
    config: &ExtractorConfig,
    form: SubmittedForm,
) -> Result<ExtractionOutput, ExtractorError> {
    let upload = form.upload.ok_or(ExtractorError::MissingFile)?;
    let image = UploadedImage::from_upload(
        upload.file_name,
        upload.content_type.as_deref(),
        upload.bytes,
    )?;
    let request = ExtractionRequest::new(form.instruction, image, form.prompt);
    extract(&request, config).await
}

fn status_for(e: &ExtractorError) -> StatusCode {
    match e {
        ExtractorError::MissingFile
        | ExtractorError::UnsupportedMediaType { .. }
        | ExtractorError::InvalidImage { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        ExtractorError::ProviderNotConfigured { .. } => StatusCode::SERVICE_UNAVAILABLE,
        ExtractorError::Extraction { .. } => StatusCode::BAD_GATEWAY,
        _ => StatusCode::BAD_REQUEST,
    }
}

// ── Multipart parsing ────────────────────────────────────────────────────

struct SubmittedForm {
    instruction: String,
    prompt: String,
    upload: Option<Upload>,
}

struct Upload {
    file_name: String,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

/// Read the three form fields. Missing text fields default (instruction to
/// empty, prompt to the standard prompt); present-but-empty values pass
/// through unchanged. A malformed body is reported as a display message.
async fn read_form(mut multipart: Multipart) -> Result<SubmittedForm, String> {
    let mut instruction: Option<String> = None;
    let mut prompt: Option<String> = None;
    let mut upload: Option<Upload> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("Malformed upload: {e}"))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "instruction" => {
                instruction = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| format!("Malformed upload: {e}"))?,
                );
            }
            "prompt" => {
                prompt = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| format!("Malformed upload: {e}"))?,
                );
            }
            "invoice" => {
                let file_name = field.file_name().unwrap_or("invoice").to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| format!("Malformed upload: {e}"))?
                    .to_vec();
                // An empty part is what browsers send for "no file chosen";
                // treat it the same as an absent field.
                if !bytes.is_empty() {
                    upload = Some(Upload {
                        file_name,
                        content_type,
                        bytes,
                    });
                }
            }
            _ => {}
        }
    }

    Ok(SubmittedForm {
        instruction: instruction.unwrap_or_default(),
        prompt: prompt.unwrap_or_else(|| DEFAULT_PROMPT.to_string()),
        upload,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(
            status_for(&ExtractorError::MissingFile),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_for(&ExtractorError::Extraction {
                message: "x".into()
            }),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_for(&ExtractorError::ProviderNotConfigured {
                provider: "gemini".into(),
                hint: String::new()
            }),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
