//! In-memory fakes for the pipeline's seams.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::analysis::store::AnalysisStore;
use crate::document::{DocumentError, DocumentSource, ExtractedDocument};
use crate::llm_client::{ChatCompletion, CompletionOptions, LlmError};
use crate::models::analysis::ResumeAnalysis;

/// Replays canned completions in order and records every prompt.
pub struct ScriptedLlm {
    responses: Mutex<VecDeque<Result<String, LlmError>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedLlm {
    pub fn new(responses: Vec<Result<String, LlmError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatCompletion for ScriptedLlm {
    async fn complete(
        &self,
        _system: &str,
        prompt: &str,
        _options: CompletionOptions,
    ) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(LlmError::EmptyContent))
    }
}

/// Hash-map store that logs each write as `delete:<id>`, `insert:<id>` or
/// `upsert:<id>`.
#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<HashMap<i64, (Option<i64>, ResumeAnalysis)>>,
    operations: Mutex<Vec<String>>,
    fail_reads: bool,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn failing_reads() -> Self {
        Self {
            fail_reads: true,
            ..Default::default()
        }
    }

    pub fn failing_writes() -> Self {
        Self {
            fail_writes: true,
            ..Default::default()
        }
    }

    pub fn seed(&self, application_id: i64, analysis: ResumeAnalysis) {
        self.rows
            .lock()
            .unwrap()
            .insert(application_id, (None, analysis));
    }

    pub fn row(&self, application_id: i64) -> Option<(Option<i64>, ResumeAnalysis)> {
        self.rows.lock().unwrap().get(&application_id).cloned()
    }

    pub fn operations(&self) -> Vec<String> {
        self.operations.lock().unwrap().clone()
    }
}

#[async_trait]
impl AnalysisStore for MemoryStore {
    async fn get(&self, application_id: i64) -> Result<Option<ResumeAnalysis>, sqlx::Error> {
        if self.fail_reads {
            return Err(sqlx::Error::Protocol("read failed".to_string()));
        }
        Ok(self.row(application_id).map(|(_, analysis)| analysis))
    }

    async fn put(
        &self,
        application_id: i64,
        job_id: Option<i64>,
        analysis: &ResumeAnalysis,
        force_update: bool,
    ) -> Result<(), sqlx::Error> {
        if self.fail_writes {
            return Err(sqlx::Error::Protocol("write failed".to_string()));
        }
        let mut stored = analysis.clone();
        stored.debug_info = None;

        let mut rows = self.rows.lock().unwrap();
        let mut ops = self.operations.lock().unwrap();
        if force_update {
            rows.remove(&application_id);
            ops.push(format!("delete:{application_id}"));
            ops.push(format!("insert:{application_id}"));
        } else {
            ops.push(format!("upsert:{application_id}"));
        }
        rows.insert(application_id, (job_id, stored));
        Ok(())
    }
}

/// Serves one fixed document for every URL.
pub struct CannedDocuments {
    document: ExtractedDocument,
}

impl CannedDocuments {
    pub fn new(document: ExtractedDocument) -> Self {
        Self { document }
    }
}

#[async_trait]
impl DocumentSource for CannedDocuments {
    async fn fetch_text(&self, _url: &str) -> Result<ExtractedDocument, DocumentError> {
        Ok(self.document.clone())
    }
}

/// Fails every fetch with the given media type.
pub struct UnsupportedDocuments(pub &'static str);

#[async_trait]
impl DocumentSource for UnsupportedDocuments {
    async fn fetch_text(&self, _url: &str) -> Result<ExtractedDocument, DocumentError> {
        Err(DocumentError::UnsupportedMediaType(self.0.to_string()))
    }
}
