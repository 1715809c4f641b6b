use std::collections::HashMap;
use std::time::Duration;

use base64::{engine::general_purpose, Engine as _};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use super::{DocumentError, ExtractedDocument};
use crate::analysis::validation::{
    clean_profile, RawContact, RawEducation, RawExperience, RawProfile, RawSkills,
};
use crate::models::profile::CandidateProfile;

pub const API_VERSION: &str = "2023-07-31";
pub const DEFAULT_MODEL: &str = "prebuilt-document";

/// How often and how long to wait for an analyze operation.
#[derive(Debug, Clone, Copy)]
pub struct PollSettings {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            interval: Duration::from_secs(1),
        }
    }
}

/// Client for the Document Intelligence asynchronous analyze API:
/// submit, then poll the `Operation-Location` until the run settles.
#[derive(Clone)]
pub struct DocIntelClient {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    poll: PollSettings,
}

impl DocIntelClient {
    pub fn new(endpoint: &str, api_key: &str, model: &str) -> Result<Self, DocumentError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| DocumentError::Provider(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            poll: PollSettings::default(),
        })
    }

    pub fn with_poll(mut self, poll: PollSettings) -> Self {
        self.poll = poll;
        self
    }

    #[tracing::instrument(skip(self, data), fields(model = %self.model, bytes = data.len()))]
    pub async fn analyze(&self, data: &[u8]) -> Result<ExtractedDocument, DocumentError> {
        let operation_url = self.submit(data).await?;
        let result = self.poll_until_complete(&operation_url).await?;
        let document = document_from_result(result);
        info!(
            "Document analysis succeeded: {} chars, structured profile: {}",
            document.text.len(),
            document.profile.is_some()
        );
        Ok(document)
    }

    async fn submit(&self, data: &[u8]) -> Result<String, DocumentError> {
        let b64 = general_purpose::STANDARD.encode(data);
        let body = serde_json::json!({ "base64Source": b64 });

        let url = format!(
            "{}/formrecognizer/documentModels/{}:analyze?api-version={}",
            self.endpoint, self.model, API_VERSION
        );

        let response = self
            .client
            .post(&url)
            .header("Ocp-Apim-Subscription-Key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| DocumentError::Provider(format!("submit failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(DocumentError::Provider(format!(
                "submit returned {status}: {text}"
            )));
        }

        response
            .headers()
            .get("Operation-Location")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| {
                DocumentError::Provider("response missing Operation-Location header".to_string())
            })
    }

    async fn poll_until_complete(&self, operation_url: &str) -> Result<AnalyzeResult, DocumentError> {
        for attempt in 1..=self.poll.max_attempts {
            tokio::time::sleep(self.poll.interval).await;

            let response = self
                .client
                .get(operation_url)
                .header("Ocp-Apim-Subscription-Key", &self.api_key)
                .send()
                .await
                .map_err(|e| DocumentError::Provider(format!("poll request failed: {e}")))?;

            if !response.status().is_success() {
                let status = response.status();
                let text = response.text().await.unwrap_or_default();
                return Err(DocumentError::Provider(format!(
                    "poll returned {status}: {text}"
                )));
            }

            let result: AnalyzeResponse = response
                .json()
                .await
                .map_err(|e| DocumentError::Provider(format!("response parse failed: {e}")))?;

            match result.status.as_str() {
                "succeeded" => return Ok(result.analyze_result.unwrap_or_default()),
                "failed" => {
                    return Err(DocumentError::Provider("analysis failed".to_string()));
                }
                status => debug!("Poll attempt {attempt}: status {status}"),
            }
        }

        Err(DocumentError::ExtractionTimeout {
            attempts: self.poll.max_attempts,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeResponse {
    pub status: String,
    #[serde(rename = "analyzeResult")]
    pub analyze_result: Option<AnalyzeResult>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeResult {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub documents: Vec<AnalyzedDocument>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AnalyzedDocument {
    #[serde(default)]
    pub fields: HashMap<String, DocumentField>,
}

/// One typed field of an analyzed document. Only the value kinds a resume
/// profile needs are read.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentField {
    pub value_string: Option<String>,
    pub value_phone_number: Option<String>,
    pub value_date: Option<String>,
    pub content: Option<String>,
    pub value_array: Option<Vec<DocumentField>>,
    pub value_object: Option<HashMap<String, DocumentField>>,
}

impl DocumentField {
    fn text(&self) -> Option<String> {
        [
            &self.value_string,
            &self.value_phone_number,
            &self.value_date,
            &self.content,
        ]
        .into_iter()
        .flatten()
        .map(|s| s.trim())
        .find(|s| !s.is_empty())
        .map(str::to_string)
    }

    fn items(&self) -> &[DocumentField] {
        self.value_array.as_deref().unwrap_or_default()
    }
}

type Fields = HashMap<String, DocumentField>;

fn text_of(fields: &Fields, names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| fields.get(*name))
        .find_map(DocumentField::text)
}

fn objects<'a>(fields: &'a Fields, names: &[&str]) -> Vec<&'a Fields> {
    names
        .iter()
        .find_map(|name| fields.get(*name))
        .map(|field| {
            field
                .items()
                .iter()
                .filter_map(|item| item.value_object.as_ref())
                .collect()
        })
        .unwrap_or_default()
}

/// Maps the first analyzed document's fields onto a candidate profile.
/// Returns `None` when nothing usable was recognized.
fn profile_from_fields(fields: &Fields) -> Option<CandidateProfile> {
    if fields.is_empty() {
        return None;
    }

    let contact = RawContact {
        name: text_of(fields, &["Name", "FullName", "CandidateName"]),
        email: text_of(fields, &["Email", "EmailAddress"]),
        phone: text_of(fields, &["Phone", "PhoneNumber"]),
        location: text_of(fields, &["Location", "Address"]),
    };

    let education = objects(fields, &["Education", "Educations"])
        .into_iter()
        .map(|entry| RawEducation {
            institution: text_of(entry, &["Institution", "School", "University"]),
            degree: text_of(entry, &["Degree"]),
            field: text_of(entry, &["Field", "FieldOfStudy", "Major"]),
            year: text_of(entry, &["Year", "GraduationYear", "GraduationDate", "EndDate"]),
            gpa: text_of(entry, &["GPA", "Gpa"]),
        })
        .collect();

    let experience = objects(fields, &["Experience", "WorkExperience", "Jobs"])
        .into_iter()
        .map(|entry| RawExperience {
            company: text_of(entry, &["Company", "Employer", "Organization"]),
            title: text_of(entry, &["Title", "JobTitle", "Position"]),
            start_date: text_of(entry, &["StartDate"]),
            end_date: text_of(entry, &["EndDate"]),
            description: text_of(entry, &["Description", "Summary"]),
        })
        .collect();

    let skills = fields
        .get("Skills")
        .map(|field| field.items().iter().filter_map(DocumentField::text).collect())
        .unwrap_or_default();

    let profile = clean_profile(RawProfile {
        contact_info: Some(contact),
        education: Some(education),
        experience: Some(experience),
        skills: Some(RawSkills::Flat(skills)),
    });

    (profile != CandidateProfile::default()).then_some(profile)
}

pub fn document_from_result(result: AnalyzeResult) -> ExtractedDocument {
    let profile = result
        .documents
        .first()
        .and_then(|doc| profile_from_fields(&doc.fields));
    ExtractedDocument {
        text: result.content,
        profile,
    }
}
