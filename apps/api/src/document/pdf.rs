use bytes::Bytes;
use tracing::warn;

use super::{ExtractedDocument, EXTRACTION_ERROR_SENTINEL};

/// Local PDF text extraction. Never fails: an unreadable PDF yields
/// sentinel text so the caller takes the fallback route.
pub async fn extract_pdf_text(data: Bytes) -> ExtractedDocument {
    let result =
        tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&data)).await;

    match result {
        Ok(Ok(text)) => ExtractedDocument::from_text(text),
        Ok(Err(e)) => {
            warn!("Local PDF extraction failed: {e}");
            ExtractedDocument::from_text(format!("{EXTRACTION_ERROR_SENTINEL} {e}"))
        }
        Err(e) => {
            warn!("Local PDF extraction task aborted: {e}");
            ExtractedDocument::from_text(format!("{EXTRACTION_ERROR_SENTINEL} {e}"))
        }
    }
}
