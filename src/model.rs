use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

/// Academic outcome of one course enrollment. The serialized form is the
/// literal word printed on transcripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Status {
    #[serde(rename = "APROVADO")]
    Approved,
    #[serde(rename = "REPROVADO")]
    Failed,
    #[serde(rename = "TRANCADO")]
    Withdrawn,
    #[serde(rename = "MATRICULADO")]
    Enrolled,
    #[serde(rename = "PENDENTE")]
    Pending,
}

impl Status {
    pub const ALL: [Status; 5] = [
        Status::Approved,
        Status::Failed,
        Status::Withdrawn,
        Status::Enrolled,
        Status::Pending,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Approved => "APROVADO",
            Status::Failed => "REPROVADO",
            Status::Withdrawn => "TRANCADO",
            Status::Enrolled => "MATRICULADO",
            Status::Pending => "PENDENTE",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown status literal: {0:?}")]
pub struct UnknownStatus(pub String);

impl FromStr for Status {
    type Err = UnknownStatus;

    /// Exact, case-sensitive match against the transcript literals.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentIdentity {
    pub identifier: String,
    pub name: String,
}

/// One transcript row before the student identity is joined in.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub term: String,
    pub course: String,
    pub status: Status,
    pub grade: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AcademicRecord {
    pub identifier: String,
    pub name: String,
    pub term: String,
    pub course: String,
    pub status: Status,
    pub grade: Option<f64>,
}

impl AcademicRecord {
    pub fn join(identity: &StudentIdentity, raw: RawRecord) -> Self {
        AcademicRecord {
            identifier: identity.identifier.clone(),
            name: identity.name.clone(),
            term: raw.term,
            course: raw.course,
            status: raw.status,
            grade: raw.grade,
        }
    }
}

/// Successful result of one pipeline run over a document.
#[derive(Debug, Clone, PartialEq)]
pub struct Transcript {
    pub identity: StudentIdentity,
    pub records: Vec<AcademicRecord>,
}

/// Summary line from class roster documents (`Aluno: … Matrícula: … Média: …`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterEntry {
    #[serde(rename = "aluno")]
    pub student: String,
    #[serde(rename = "matricula")]
    pub identifier: String,
    #[serde(rename = "media")]
    pub average: String,
}
