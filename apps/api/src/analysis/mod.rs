pub mod extraction;
pub mod fallback;
pub mod handlers;
pub mod pipeline;
pub mod prompts;
pub mod scoring;
pub mod store;
#[cfg(test)]
pub mod testing;
pub mod validation;

pub use pipeline::{AnalysisPipeline, PipelineSettings};
pub use store::PgAnalysisStore;
