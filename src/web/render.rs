//! Server-side rendering for the single extraction page.
//!
//! One template, one view-model. The page cycles through the interaction
//! states without any client-side framework: Idle is the empty form, Ready
//! is the form with a file chosen (preview drawn by a few lines of inline
//! JS), Extracting is the submitted form with the trigger disabled, and
//! Done is this same page re-rendered with an outcome panel. Model text and
//! error messages land in the page verbatim, HTML-escaped and nothing else.

use crate::output::ExtractionOutput;
use crate::prompts::{DEFAULT_PROMPT, INSTRUCTION_HINT};

/// Everything the page needs to render one state.
#[derive(Debug, Clone)]
pub struct PageView {
    /// Instruction input content, re-filled on the Done page.
    pub instruction: String,
    /// Prompt textarea content, re-filled on the Done page.
    pub prompt: String,
    /// Uploaded image as a `data:` URI plus caption, when one was ingested.
    pub preview: Option<Preview>,
    /// Success or error panel; `None` on the initial page.
    pub outcome: Option<Outcome>,
}

/// Inline preview of the uploaded invoice.
#[derive(Debug, Clone)]
pub struct Preview {
    pub data_uri: String,
    pub caption: String,
}

/// Result panel content for the Done state.
#[derive(Debug, Clone)]
pub enum Outcome {
    Success(ExtractionOutput),
    Error { message: String },
}

impl PageView {
    /// The Idle state: empty instruction, default prompt, no file.
    pub fn idle() -> Self {
        Self {
            instruction: String::new(),
            prompt: DEFAULT_PROMPT.to_string(),
            preview: None,
            outcome: None,
        }
    }

    pub fn done(
        instruction: String,
        prompt: String,
        preview: Option<Preview>,
        outcome: Outcome,
    ) -> Self {
        Self {
            instruction,
            prompt,
            preview,
            outcome: Some(outcome),
        }
    }
}

/// Escape text for safe interpolation into HTML content or attributes.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Render the full page for the given view.
pub fn page(view: &PageView) -> String {
    let preview_html = match &view.preview {
        Some(p) => format!(
            r#"<figure class="preview"><img id="preview" src="{}" alt="Uploaded invoice"><figcaption>{}</figcaption></figure>"#,
            p.data_uri,
            escape_html(&p.caption)
        ),
        None => {
            r#"<figure class="preview hidden"><img id="preview" alt="Uploaded invoice"><figcaption id="preview-caption"></figcaption></figure>"#
                .to_string()
        }
    };

    let outcome_html = match &view.outcome {
        Some(Outcome::Success(output)) => format!(
            r#"<section class="panel success">
  <p class="status">&#10003; Extraction complete</p>
  <h2>Extracted information</h2>
  <pre class="result">{}</pre>
  <p class="stats">{} tokens in / {} tokens out &middot; {} ms</p>
</section>"#,
            escape_html(&output.text),
            output.stats.input_tokens,
            output.stats.output_tokens,
            output.stats.duration_ms
        ),
        Some(Outcome::Error { message }) => format!(
            r#"<section class="panel error">
  <p class="status">&#9888; Extraction failed</p>
  <pre class="message">{}</pre>
</section>"#,
            escape_html(message)
        ),
        None => r#"<p class="hint">Upload an invoice image to get started.</p>"#.to_string(),
    };

    format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Invoice Lens</title>
<style>
  body {{ font-family: system-ui, sans-serif; max-width: 44rem; margin: 2rem auto; padding: 0 1rem; color: #1c1c1c; }}
  h1 {{ font-size: 1.5rem; }}
  .tagline {{ color: #666; margin-top: -0.5rem; }}
  form {{ display: grid; gap: 0.75rem; margin: 1.5rem 0; }}
  label {{ font-weight: 600; font-size: 0.9rem; }}
  input[type=text], textarea {{ width: 100%; padding: 0.5rem; border: 1px solid #bbb; border-radius: 4px; font: inherit; }}
  textarea {{ min-height: 4.5rem; }}
  button {{ justify-self: start; padding: 0.5rem 1.25rem; border: 0; border-radius: 4px; background: #2457d6; color: #fff; font: inherit; cursor: pointer; }}
  button:disabled {{ background: #9ab; cursor: wait; }}
  .preview img {{ max-width: 100%; border: 1px solid #ddd; border-radius: 4px; }}
  .preview figcaption {{ color: #666; font-size: 0.85rem; }}
  .hidden {{ display: none; }}
  .panel {{ border-radius: 6px; padding: 1rem; margin-top: 1rem; }}
  .panel.success {{ background: #eef7ee; border: 1px solid #9c9; }}
  .panel.error {{ background: #fbeeee; border: 1px solid #d99; }}
  .panel .status {{ font-weight: 700; margin-top: 0; }}
  .panel pre {{ white-space: pre-wrap; word-break: break-word; font: inherit; }}
  .stats {{ color: #666; font-size: 0.85rem; }}
  .hint {{ color: #446; background: #eef2fb; border: 1px solid #ccd8f0; border-radius: 6px; padding: 0.75rem 1rem; }}
  #working {{ color: #666; }}
</style>
</head>
<body>
<h1>Invoice Lens</h1>
<p class="tagline">Extract information from invoices with a vision language model</p>

<form id="extract-form" action="/extract" method="post" enctype="multipart/form-data">
  <label for="instruction">Your input</label>
  <input type="text" id="instruction" name="instruction" value="{instruction}" placeholder="{hint}">

  <label for="prompt">Custom prompt</label>
  <textarea id="prompt" name="prompt">{prompt}</textarea>

  <label for="invoice">Invoice image (jpg, jpeg, png)</label>
  <input type="file" id="invoice" name="invoice" accept=".jpg,.jpeg,.png,image/jpeg,image/png" required>

  {preview}

  <button id="trigger" type="submit">Extract information</button>
  <p id="working" class="hidden">Analyzing invoice&hellip;</p>
</form>

{outcome}

<script>
  var fileInput = document.getElementById("invoice");
  var form = document.getElementById("extract-form");
  fileInput.addEventListener("change", function () {{
    var file = fileInput.files[0];
    if (!file) return;
    var img = document.getElementById("preview");
    img.src = URL.createObjectURL(file);
    img.closest("figure").classList.remove("hidden");
    var caption = document.getElementById("preview-caption");
    if (caption) caption.textContent = file.name;
  }});
  form.addEventListener("submit", function () {{
    document.getElementById("trigger").disabled = true;
    document.getElementById("working").classList.remove("hidden");
  }});
</script>
</body>
</html>
"#,
        instruction = escape_html(&view.instruction),
        hint = escape_html(INSTRUCTION_HINT),
        prompt = escape_html(&view.prompt),
        preview = preview_html,
        outcome = outcome_html,
    )
}
