//! Request orchestration: cache check, text extraction, profile building,
//! analysis and persistence, strictly in that order.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::analysis::extraction::extract_profile;
use crate::analysis::fallback::{fallback_analysis, is_text_usable, missing_parameters_analysis};
use crate::analysis::scoring::analyze_profile;
use crate::analysis::store::AnalysisStore;
use crate::analysis::validation::{is_sufficiently_complete, validate_profile};
use crate::document::{DocumentSource, ExtractedDocument};
use crate::errors::AppError;
use crate::llm_client::{ChatCompletion, RetryPolicy};
use crate::models::analysis::{DebugInfo, ProfileSource, ResumeAnalysis};
use crate::models::profile::CandidateProfile;
use crate::parsing::parse_resume;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub resume_url: Option<String>,
    pub resume_content: Option<String>,
    pub job_description: Option<String>,
    pub job_id: Option<i64>,
    pub applicant_id: Option<i64>,
    #[serde(default)]
    pub force_update: bool,
}

enum ResumeInput<'a> {
    Url(&'a str),
    Content(&'a str),
}

impl AnalyzeRequest {
    /// The resume input and the job description, or the reason the request
    /// cannot be analyzed.
    fn inputs(&self) -> Result<(ResumeInput<'_>, &str), &'static str> {
        let job_description = self
            .job_description
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or("jobDescription is required")?;

        let url = self
            .resume_url
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());
        let content = self.resume_content.as_deref().filter(|s| !s.is_empty());

        let input = match (url, content) {
            (Some(url), None) => ResumeInput::Url(url),
            (None, Some(content)) => ResumeInput::Content(content),
            (Some(_), Some(_)) => return Err("Provide either resumeUrl or resumeContent, not both"),
            (None, None) => return Err("resumeUrl or resumeContent is required"),
        };
        Ok((input, job_description))
    }
}

/// Response body: the flat analysis plus optional siblings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    #[serde(flatten)]
    pub analysis: ResumeAnalysis,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted_data: Option<CandidateProfile>,
    pub cached: bool,
}

impl AnalysisResponse {
    fn fresh(analysis: ResumeAnalysis, extracted_data: Option<CandidateProfile>) -> Self {
        Self {
            analysis,
            extracted_data,
            cached: false,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PipelineSettings {
    pub min_text_length: usize,
    pub llm_extraction_enabled: bool,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            min_text_length: 50,
            llm_extraction_enabled: true,
        }
    }
}

pub struct AnalysisPipeline {
    store: Arc<dyn AnalysisStore>,
    documents: Arc<dyn DocumentSource>,
    llm: Arc<dyn ChatCompletion>,
    retry: RetryPolicy,
    settings: PipelineSettings,
}

struct BuiltProfile {
    profile: CandidateProfile,
    source: ProfileSource,
    validation_errors: Vec<String>,
}

impl AnalysisPipeline {
    pub fn new(
        store: Arc<dyn AnalysisStore>,
        documents: Arc<dyn DocumentSource>,
        llm: Arc<dyn ChatCompletion>,
        retry: RetryPolicy,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            store,
            documents,
            llm,
            retry,
            settings,
        }
    }

    #[tracing::instrument(
        skip_all,
        fields(applicant_id = ?request.applicant_id, job_id = ?request.job_id)
    )]
    pub async fn run(&self, request: AnalyzeRequest) -> Result<AnalysisResponse, AppError> {
        let (input, job_description) = match request.inputs() {
            Ok(inputs) => inputs,
            Err(reason) => {
                warn!("Cannot analyze request: {reason}");
                return Ok(AnalysisResponse::fresh(
                    missing_parameters_analysis(reason),
                    None,
                ));
            }
        };

        if let Some(applicant_id) = request.applicant_id {
            if !request.force_update {
                if let Some(analysis) = self.cached(applicant_id).await {
                    return Ok(AnalysisResponse {
                        analysis,
                        extracted_data: None,
                        cached: true,
                    });
                }
            }
        }

        let document = match input {
            ResumeInput::Url(url) => self.documents.fetch_text(url).await?,
            ResumeInput::Content(content) => ExtractedDocument::from_text(content),
        };
        let text_length = document.text.chars().count();
        info!(
            "Resume text extracted: {text_length} chars, provider profile: {}",
            document.profile.is_some()
        );

        let has_provider_profile = document
            .profile
            .as_ref()
            .is_some_and(|p| *p != CandidateProfile::default());
        if !is_text_usable(
            &document.text,
            has_provider_profile,
            self.settings.min_text_length,
        ) {
            warn!("Resume text unusable ({text_length} chars), using fallback analysis");
            let analysis = fallback_analysis(&document.text, "Resume text missing or too short");
            self.persist_fallback(&request, &analysis).await;
            return Ok(AnalysisResponse::fresh(analysis, None));
        }

        let built = self.build_profile(document).await?;

        let mut analysis = analyze_profile(
            self.llm.as_ref(),
            &self.retry,
            &built.profile,
            job_description,
        )
        .await
        .map_err(|e| AppError::Llm(format!("Resume analysis failed: {e}")))?;

        analysis.debug_info = Some(DebugInfo {
            text_length,
            profile_source: Some(built.source),
            validation_errors: built.validation_errors,
            reason: None,
        });

        if let Some(applicant_id) = request.applicant_id {
            self.store
                .put(applicant_id, request.job_id, &analysis, request.force_update)
                .await?;
            info!("Stored analysis for application {applicant_id}");
        }

        Ok(AnalysisResponse::fresh(analysis, Some(built.profile)))
    }

    /// A stored non-fallback analysis. Fallback rows and read failures are
    /// treated as misses.
    async fn cached(&self, applicant_id: i64) -> Option<ResumeAnalysis> {
        match self.store.get(applicant_id).await {
            Ok(Some(analysis)) if !analysis.fallback => {
                info!("Cache hit for application {applicant_id}");
                Some(analysis)
            }
            Ok(Some(_)) => {
                info!("Cached analysis for application {applicant_id} is a fallback, recomputing");
                None
            }
            Ok(None) => {
                debug!("Cache miss for application {applicant_id}");
                None
            }
            Err(e) => {
                warn!("Cache read failed for application {applicant_id}: {e}");
                None
            }
        }
    }

    /// Fallback results are stored best-effort; a failed write is logged only.
    async fn persist_fallback(&self, request: &AnalyzeRequest, analysis: &ResumeAnalysis) {
        let Some(applicant_id) = request.applicant_id else {
            return;
        };
        if let Err(e) = self
            .store
            .put(applicant_id, request.job_id, analysis, request.force_update)
            .await
        {
            warn!("Failed to store fallback analysis for application {applicant_id}: {e}");
        }
    }

    /// Picks the profile route: a complete provider profile as is, the
    /// baseline when LLM extraction is off, otherwise LLM extraction with
    /// gaps filled from the baseline. The baseline is the heuristic parse,
    /// overlaid by an incomplete provider profile when there is one.
    async fn build_profile(&self, document: ExtractedDocument) -> Result<BuiltProfile, AppError> {
        let heuristic = parse_resume(&document.text);

        let baseline = match document.profile {
            Some(provider) if is_sufficiently_complete(&provider) => {
                info!("Using provider profile, skipping LLM extraction");
                return Ok(BuiltProfile {
                    profile: provider,
                    source: ProfileSource::Provider,
                    validation_errors: Vec::new(),
                });
            }
            Some(mut provider) => {
                debug!("Provider profile incomplete, keeping it as the baseline");
                provider.merge_missing(&heuristic);
                provider
            }
            None => heuristic,
        };

        if !self.settings.llm_extraction_enabled {
            let report = validate_profile(&baseline);
            info!(
                "LLM extraction disabled, using heuristic profile ({} validation errors)",
                report.errors.len()
            );
            return Ok(BuiltProfile {
                profile: baseline,
                source: ProfileSource::Heuristic,
                validation_errors: report.errors,
            });
        }

        let mut profile = extract_profile(self.llm.as_ref(), &self.retry, &document.text)
            .await
            .map_err(|e| AppError::Llm(format!("Resume extraction failed: {e}")))?;
        profile.merge_missing(&baseline);

        let report = validate_profile(&profile);
        if !report.is_valid {
            warn!(
                "Extracted profile has {} validation errors: {:?}",
                report.errors.len(),
                report.errors
            );
        }

        Ok(BuiltProfile {
            profile,
            source: ProfileSource::Llm,
            validation_errors: report.errors,
        })
    }
}
