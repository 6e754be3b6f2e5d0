use std::path::PathBuf;

use anyhow::{bail, Result};
use rayon::prelude::*;

use crate::error::PipelineError;
use crate::model::{AcademicRecord, Transcript};
use crate::parser;
use crate::source::TextDocument;

/// Outcome of one `extract` run over several documents.
pub struct Batch {
    /// One transcript per student, in input order.
    pub transcripts: Vec<Transcript>,
    pub failures: Vec<(PathBuf, PipelineError)>,
}

impl Batch {
    /// Rows handed to every sink, so CSV and database hold the same records.
    pub fn records(&self) -> Vec<AcademicRecord> {
        self.transcripts
            .iter()
            .flat_map(|t| t.records.iter().cloned())
            .collect()
    }
}

/// Run the pipeline over every document in parallel. `on_done` is called once
/// per document. Failed documents are collected and skipped; it is an error
/// only if none succeeded.
pub fn extract_all<F>(inputs: &[PathBuf], on_done: F) -> Result<Batch>
where
    F: Fn() + Sync,
{
    let results: Vec<(&PathBuf, Result<Transcript, PipelineError>)> = inputs
        .par_iter()
        .map(|path| {
            let res = parser::run(&TextDocument::new(path));
            on_done();
            (path, res)
        })
        .collect();

    let mut transcripts: Vec<Transcript> = Vec::with_capacity(results.len());
    let mut failures = Vec::new();
    for (path, res) in results {
        match res {
            // a later document for the same student replaces the earlier one,
            // matching the per-student replace in the database
            Ok(t) => match transcripts
                .iter()
                .position(|prev| prev.identity.identifier == t.identity.identifier)
            {
                Some(i) => transcripts[i] = t,
                None => transcripts.push(t),
            },
            Err(e) => failures.push((path.clone(), e)),
        }
    }

    if transcripts.is_empty() {
        bail!(
            "no document produced academic records ({} failed)",
            failures.len()
        );
    }
    Ok(Batch {
        transcripts,
        failures,
    })
}
