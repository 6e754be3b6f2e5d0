use std::fs::{self, File};
use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::model::{AcademicRecord, RosterEntry, Status};

pub const RECORD_HEADER: [&str; 6] = [
    "Matricula",
    "Nome",
    "Ano/Semestre",
    "Disciplina",
    "Situação",
    "Nota",
];

pub const ROSTER_HEADER: [&str; 3] = ["aluno", "matricula", "media"];

#[derive(Serialize)]
struct RecordRow<'a> {
    identifier: &'a str,
    name: &'a str,
    term: &'a str,
    course: &'a str,
    status: Status,
    grade: Option<f64>,
}

impl<'a> From<&'a AcademicRecord> for RecordRow<'a> {
    fn from(r: &'a AcademicRecord) -> Self {
        RecordRow {
            identifier: &r.identifier,
            name: &r.name,
            term: &r.term,
            course: &r.course,
            status: r.status,
            grade: r.grade,
        }
    }
}

/// Header row first, then one row per record; an absent grade is an empty field.
pub fn write_records<W: io::Write>(out: W, records: &[AcademicRecord]) -> Result<usize> {
    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(out);
    wtr.write_record(RECORD_HEADER)?;
    for r in records {
        wtr.serialize(RecordRow::from(r))?;
    }
    wtr.flush()?;
    Ok(records.len())
}

pub fn write_roster<W: io::Write>(out: W, entries: &[RosterEntry]) -> Result<usize> {
    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(out);
    wtr.write_record(ROSTER_HEADER)?;
    for e in entries {
        wtr.serialize(e)?;
    }
    wtr.flush()?;
    Ok(entries.len())
}

pub fn save_records(path: &Path, records: &[AcademicRecord]) -> Result<usize> {
    write_records(create(path)?, records)
}

pub fn save_roster(path: &Path, entries: &[RosterEntry]) -> Result<usize> {
    write_roster(create(path)?, entries)
}

fn create(path: &Path) -> Result<File> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("Failed to create {:?}", dir))?;
    }
    File::create(path).with_context(|| format!("Failed to create {:?}", path))
}
