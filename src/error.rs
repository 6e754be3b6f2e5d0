use thiserror::Error;

/// Run-level failures of the extraction pipeline. Lines that carry no record
/// are not errors and never surface here.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The page text could not be obtained.
    #[error("could not read document: {0:#}")]
    Source(anyhow::Error),

    /// No `<11 digits><NAME>` header on the first page.
    #[error("student identity header not found on the first page")]
    IdentityNotFound,

    /// Identity found, but no line matched the record shape.
    #[error("no academic records found for student {identifier}")]
    NoRecordsExtracted { identifier: String },
}
