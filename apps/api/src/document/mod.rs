//! Resume document retrieval and text extraction.
//!
//! PDFs go to Document Intelligence when it is configured, otherwise to the
//! local pdf-extract fallback. `text/*` bodies are decoded as UTF-8.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, info};

use crate::models::profile::CandidateProfile;

pub mod doc_intel;
pub mod pdf;

pub use doc_intel::DocIntelClient;

/// Prefix of the text produced when local PDF extraction fails. Text
/// carrying it is never sent to the LLM.
pub const EXTRACTION_ERROR_SENTINEL: &str = "[PDF extraction failed]";

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Failed to fetch resume document: {0}")]
    Fetch(String),

    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("Document analysis did not finish after {attempts} polling attempts")]
    ExtractionTimeout { attempts: u32 },

    #[error("Document intelligence error: {0}")]
    Provider(String),
}

/// Extracted resume text, plus the structured profile when the extraction
/// provider produced one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedDocument {
    pub text: String,
    pub profile: Option<CandidateProfile>,
}

impl ExtractedDocument {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            profile: None,
        }
    }
}

#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn fetch_text(&self, url: &str) -> Result<ExtractedDocument, DocumentError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MediaKind {
    Pdf,
    Text,
}

/// Decides how to read a body from its Content-Type, falling back to the
/// URL extension when the header is absent.
fn classify_media(content_type: Option<&str>, url: &str) -> Result<MediaKind, DocumentError> {
    let Some(content_type) = content_type else {
        let path = url.split(['?', '#']).next().unwrap_or(url).to_lowercase();
        if path.ends_with(".pdf") {
            return Ok(MediaKind::Pdf);
        }
        if path.ends_with(".txt") {
            return Ok(MediaKind::Text);
        }
        return Err(DocumentError::UnsupportedMediaType("unknown".to_string()));
    };

    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase();
    if mime == "application/pdf" {
        Ok(MediaKind::Pdf)
    } else if mime.starts_with("text/") {
        Ok(MediaKind::Text)
    } else {
        Err(DocumentError::UnsupportedMediaType(mime))
    }
}

/// Fetches resumes over HTTP(S).
pub struct HttpDocumentSource {
    client: Client,
    doc_intel: Option<DocIntelClient>,
}

impl HttpDocumentSource {
    pub fn new(doc_intel: Option<DocIntelClient>) -> Result<Self, DocumentError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| DocumentError::Fetch(e.to_string()))?;
        Ok(Self { client, doc_intel })
    }
}

#[async_trait]
impl DocumentSource for HttpDocumentSource {
    #[tracing::instrument(skip(self))]
    async fn fetch_text(&self, url: &str) -> Result<ExtractedDocument, DocumentError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DocumentError::Fetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DocumentError::Fetch(format!("{status} from {url}")));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let kind = classify_media(content_type.as_deref(), url)?;

        let body = response
            .bytes()
            .await
            .map_err(|e| DocumentError::Fetch(e.to_string()))?;
        debug!("Fetched {} bytes ({kind:?})", body.len());

        match kind {
            MediaKind::Text => Ok(ExtractedDocument::from_text(
                String::from_utf8_lossy(&body).into_owned(),
            )),
            MediaKind::Pdf => match &self.doc_intel {
                Some(doc_intel) => doc_intel.analyze(&body).await,
                None => {
                    info!("Document intelligence not configured, extracting PDF locally");
                    Ok(pdf::extract_pdf_text(body).await)
                }
            },
        }
    }
}
