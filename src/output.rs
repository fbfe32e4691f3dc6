//! Output types: rendered pages and conversion statistics.

use serde::{Deserialize, Serialize};

/// One rendered page: its 1-based page number and the encoded image as a
/// data URI (`data:image/<fmt>;base64,<payload>`).
///
/// Pages exist only for the lifetime of one conversion; nothing is cached
/// or persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderedPage {
    pub page: usize,
    pub data: String,
}

/// Result of a full conversion: every page of the document, ascending from
/// page 1, plus timing statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertOutput {
    pub pages: Vec<RenderedPage>,
    pub stats: ConvertStats,
}

/// Timing breakdown for one conversion. Library/CLI-only; the HTTP response
/// carries just the image list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConvertStats {
    pub page_count: usize,
    pub render_duration_ms: u64,
    pub encode_duration_ms: u64,
    pub total_duration_ms: u64,
}

/// Wire shape of a successful HTTP response: `{"images": [...]}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertResponse {
    pub images: Vec<RenderedPage>,
}

impl From<ConvertOutput> for ConvertResponse {
    fn from(output: ConvertOutput) -> Self {
        Self {
            images: output.pages,
        }
    }
}
