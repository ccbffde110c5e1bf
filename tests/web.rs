//! Handler-level tests for the web presentation layer.
//!
//! The vision model is replaced with a counting stub, so these run offline
//! and deterministically: they drive the router with real multipart bodies
//! and assert on the rendered page and the JSON API, including the
//! "exactly one provider call per trigger" behaviour.

#![cfg(feature = "web")]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use invoice_lens::web::router;
use invoice_lens::{
    ExtractionRequest, ExtractorConfig, ExtractorError, ModelOptions, ModelReply, VisionModel,
};
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

// ── Test doubles and fixtures ────────────────────────────────────────────

/// Counting stub: fixed reply or fixed failure, no network.
struct StubModel {
    reply: Result<String, String>,
    calls: AtomicUsize,
}

impl StubModel {
    fn returning(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(message.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VisionModel for StubModel {
    async fn generate(
        &self,
        _request: &ExtractionRequest,
        _options: &ModelOptions,
    ) -> Result<ModelReply, ExtractorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            Ok(text) => Ok(ModelReply {
                text: text.clone(),
                input_tokens: 1234,
                output_tokens: 56,
            }),
            Err(message) => Err(ExtractorError::Extraction {
                message: message.clone(),
            }),
        }
    }
}

fn app(stub: Arc<StubModel>) -> axum::Router {
    let config = ExtractorConfig::builder()
        .vision_model(stub)
        .build()
        .expect("valid config");
    router(config)
}

/// A tiny but genuine PNG, produced in memory.
fn png_bytes() -> Vec<u8> {
    let img = image::DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
        8,
        8,
        image::Rgba([200, 200, 200, 255]),
    ));
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .expect("encode fixture png");
    buf
}

const BOUNDARY: &str = "invoice-lens-test-boundary";

/// Hand-build a multipart/form-data body.
fn multipart_body(
    instruction: Option<&str>,
    prompt: Option<&str>,
    file: Option<(&str, &str, &[u8])>,
) -> Vec<u8> {
    let mut body = Vec::new();

    if let Some(value) = instruction {
        body.extend(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"instruction\"\r\n\r\n{value}\r\n"
            )
            .into_bytes(),
        );
    }
    if let Some(value) = prompt {
        body.extend(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"prompt\"\r\n\r\n{value}\r\n"
            )
            .into_bytes(),
        );
    }
    if let Some((file_name, content_type, bytes)) = file {
        body.extend(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"invoice\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .into_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend(b"\r\n");
    }

    body.extend(format!("--{BOUNDARY}--\r\n").into_bytes());
    body
}

fn multipart_request(uri: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .expect("request")
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

// ── Page surface ─────────────────────────────────────────────────────────

#[tokio::test]
async fn index_renders_idle_form() {
    let response = app(StubModel::returning("unused"))
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("Extract all important details from the invoice in English."));
    assert!(html.contains("Upload an invoice image to get started."));
    assert!(!html.contains("panel success"));
}

#[tokio::test]
async fn health_reports_ok() {
    let response = app(StubModel::returning("unused"))
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_string(response).await.contains("ok"));
}

#[tokio::test]
async fn upload_png_default_prompt_shows_result_verbatim() {
    // The reference scenario: invoice.png, empty instruction, default
    // prompt, fixed model reply.
    let stub = StubModel::returning("Total: $42.00, Date: 2024-01-01");
    let png = png_bytes();
    let body = multipart_body(
        Some(""),
        Some("Extract all important details from the invoice in English."),
        Some(("invoice.png", "image/png", &png)),
    );

    let response = app(stub.clone())
        .oneshot(multipart_request("/extract", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("panel success"));
    assert!(html.contains("Total: $42.00, Date: 2024-01-01"));
    assert!(!html.contains("panel error"));
    assert_eq!(stub.call_count(), 1);
}

#[tokio::test]
async fn model_failure_renders_error_text_and_no_result() {
    let stub = StubModel::failing("upstream exploded");
    let png = png_bytes();
    let body = multipart_body(None, None, Some(("invoice.png", "image/png", &png)));

    let response = app(stub.clone())
        .oneshot(multipart_request("/extract", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("panel error"));
    assert!(html.contains("upstream exploded"));
    assert!(!html.contains("panel success"));
    assert_eq!(stub.call_count(), 1, "one call, no retry");
}

#[tokio::test]
async fn missing_file_never_reaches_the_model() {
    let stub = StubModel::returning("should never be seen");
    let body = multipart_body(Some("total"), Some("prompt"), None);

    let response = app(stub.clone())
        .oneshot(multipart_request("/extract", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("No invoice image was provided."));
    assert!(!html.contains("should never be seen"));
    assert_eq!(stub.call_count(), 0);
}

#[tokio::test]
async fn unsupported_file_type_is_rejected_before_the_model() {
    let stub = StubModel::returning("unused");
    let body = multipart_body(None, None, Some(("scan.webp", "image/webp", b"RIFFxxxx")));

    let response = app(stub.clone())
        .oneshot(multipart_request("/extract", body))
        .await
        .unwrap();

    let html = body_string(response).await;
    assert!(html.contains("Unsupported file type"));
    assert_eq!(stub.call_count(), 0);
}

#[tokio::test]
async fn resubmitting_from_done_triggers_one_more_call() {
    let stub = StubModel::returning("ok");
    let png = png_bytes();
    let app = app(stub.clone());

    for expected in 1..=2 {
        let body = multipart_body(None, None, Some(("invoice.png", "image/png", &png)));
        let response = app
            .clone()
            .oneshot(multipart_request("/extract", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(stub.call_count(), expected);
    }
}

// ── JSON surface ─────────────────────────────────────────────────────────

#[tokio::test]
async fn api_success_returns_text_and_stats() {
    let stub = StubModel::returning("Rechnungsbetrag: 99,00 EUR");
    let png = png_bytes();
    let body = multipart_body(
        Some("extract the total"),
        None,
        Some(("rechnung.png", "image/png", &png)),
    );

    let response = app(stub.clone())
        .oneshot(multipart_request("/api/extract", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json: serde_json::Value =
        serde_json::from_str(&body_string(response).await).expect("valid json");
    assert_eq!(json["text"], "Rechnungsbetrag: 99,00 EUR");
    assert_eq!(json["stats"]["input_tokens"], 1234);
    assert_eq!(stub.call_count(), 1);
}

#[tokio::test]
async fn api_missing_file_is_unprocessable() {
    let stub = StubModel::returning("unused");
    let body = multipart_body(Some("x"), Some("y"), None);

    let response = app(stub.clone())
        .oneshot(multipart_request("/api/extract", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json: serde_json::Value =
        serde_json::from_str(&body_string(response).await).expect("valid json");
    assert!(json["detail"]
        .as_str()
        .unwrap()
        .contains("No invoice image was provided."));
    assert_eq!(stub.call_count(), 0);
}

#[tokio::test]
async fn api_model_failure_is_bad_gateway_with_detail() {
    let stub = StubModel::failing("quota exceeded");
    let png = png_bytes();
    let body = multipart_body(None, None, Some(("invoice.png", "image/png", &png)));

    let response = app(stub.clone())
        .oneshot(multipart_request("/api/extract", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json: serde_json::Value =
        serde_json::from_str(&body_string(response).await).expect("valid json");
    assert!(json["detail"].as_str().unwrap().contains("quota exceeded"));
}
