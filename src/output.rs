//! Output types for invoice extraction.

use serde::{Deserialize, Serialize};

/// Result of one successful extraction.
///
/// `text` is the model's response exactly as returned — no trimming, no
/// markdown cleanup, no reformatting. Displayed once and not stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionOutput {
    /// The model's text response, unmodified.
    pub text: String,
    /// Token and timing accounting for this call.
    pub stats: ExtractionStats,
}

/// Accounting for a single extraction call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Prompt tokens consumed, as reported by the provider.
    pub input_tokens: u64,
    /// Completion tokens generated, as reported by the provider.
    pub output_tokens: u64,
    /// Wall-clock duration of the call, including provider resolution.
    pub duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_serialises_round_trip() {
        let out = ExtractionOutput {
            text: "Total: $42.00".into(),
            stats: ExtractionStats {
                input_tokens: 1200,
                output_tokens: 80,
                duration_ms: 900,
            },
        };
        let json = serde_json::to_string(&out).expect("serialise");
        let back: ExtractionOutput = serde_json::from_str(&json).expect("deserialise");
        assert_eq!(back.text, out.text);
        assert_eq!(back.stats.input_tokens, 1200);
    }
}
