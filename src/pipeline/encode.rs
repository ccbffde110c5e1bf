//! Image encoding: [`UploadedImage`] → base64 [`ImageData`].
//!
//! VLM APIs (Gemini, OpenAI, Anthropic) accept images as base64 payloads
//! with a MIME label in the JSON request body. The upload is already a
//! compressed JPEG or PNG, so no transcoding happens here — the provider
//! sees exactly the bytes the user selected, labelled with the declared
//! media type.

use crate::pipeline::ingest::UploadedImage;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use edgequake_llm::ImageData;
use tracing::debug;

/// Encode an ingested invoice image for the provider API.
///
/// `detail: "high"` instructs GPT-4-class models to use the full image tile
/// budget; providers without the knob ignore it. Invoices are dense with
/// fine print, so the low-detail overview tile is never what we want.
pub fn encode_image(image: &UploadedImage) -> ImageData {
    let b64 = STANDARD.encode(&image.bytes);
    debug!(
        "Encoded '{}' → {} bytes base64 ({})",
        image.file_name,
        b64.len(),
        image.media_type
    );

    ImageData::new(b64, image.media_type.as_str()).with_detail("high")
}

/// Render the image as a `data:` URI for inline display.
pub fn data_uri(image: &UploadedImage) -> String {
    format!(
        "data:{};base64,{}",
        image.media_type.as_str(),
        STANDARD.encode(&image.bytes)
    )
}
