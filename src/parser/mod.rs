pub mod identity;
pub mod records;
pub mod roster;
pub mod text;

use tracing::{debug, info};

use crate::error::PipelineError;
use crate::model::{AcademicRecord, Transcript};
use crate::source::PageSource;

/// Two-pass pipeline: identity header on page 1 → records on every page,
/// joined with the identity.
pub fn run<S: PageSource + ?Sized>(source: &S) -> Result<Transcript, PipelineError> {
    let pages = source.pages().map_err(PipelineError::Source)?;
    process_pages(&pages)
}

pub fn process_pages<P: AsRef<str>>(pages: &[P]) -> Result<Transcript, PipelineError> {
    let first_page = pages.first().map(|p| p.as_ref()).unwrap_or_default();
    let identity = identity::parse(first_page.lines()).ok_or(PipelineError::IdentityNotFound)?;
    debug!(identifier = %identity.identifier, name = %identity.name, "identity header found");

    let records: Vec<AcademicRecord> = records::extract(text::document_lines(pages))
        .map(|raw| AcademicRecord::join(&identity, raw))
        .collect();

    if records.is_empty() {
        return Err(PipelineError::NoRecordsExtracted {
            identifier: identity.identifier,
        });
    }

    info!(
        identifier = %identity.identifier,
        pages = pages.len(),
        records = records.len(),
        "transcript extracted"
    );
    Ok(Transcript { identity, records })
}

// ── Tests ──
