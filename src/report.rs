use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::model::{AcademicRecord, Status};

pub struct Report {
    pub most_failed: Vec<(String, usize)>,
    pub most_withdrawn: Vec<(String, usize)>,
    pub mean_grades: Vec<(String, f64)>,
}

impl Report {
    pub fn build(records: &[AcademicRecord], top_n: usize) -> Self {
        Report {
            most_failed: most_failed(records, top_n),
            most_withdrawn: most_withdrawn(records, top_n),
            mean_grades: mean_grades(records),
        }
    }
}

pub fn most_failed(records: &[AcademicRecord], top_n: usize) -> Vec<(String, usize)> {
    count_by_course(records, Status::Failed, top_n)
}

pub fn most_withdrawn(records: &[AcademicRecord], top_n: usize) -> Vec<(String, usize)> {
    count_by_course(records, Status::Withdrawn, top_n)
}

/// Count per course for one status, highest first (ties by course name).
fn count_by_course(records: &[AcademicRecord], status: Status, top_n: usize) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for r in records.iter().filter(|r| r.status == status) {
        *counts.entry(r.course.as_str()).or_default() += 1;
    }
    let mut ranked: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(course, n)| (course.to_string(), n))
        .collect();
    // stable sort keeps the BTreeMap's name order among equal counts
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(top_n);
    ranked
}

/// Mean grade per course over graded records only; courses without any grade
/// are left out. Sorted by course name.
pub fn mean_grades(records: &[AcademicRecord]) -> Vec<(String, f64)> {
    let mut sums: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for r in records {
        if let Some(g) = r.grade {
            let e = sums.entry(r.course.as_str()).or_insert((0.0, 0));
            e.0 += g;
            e.1 += 1;
        }
    }
    sums.into_iter()
        .map(|(course, (sum, n))| (course.to_string(), sum / n as f64))
        .collect()
}

pub fn render(report: &Report) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Disciplinas com mais reprovações:");
    render_counts(&mut out, &report.most_failed);

    let _ = writeln!(out, "\nDisciplinas com mais trancamentos:");
    render_counts(&mut out, &report.most_withdrawn);

    let _ = writeln!(out, "\nNota média por disciplina:");
    if report.mean_grades.is_empty() {
        let _ = writeln!(out, "  (nenhuma)");
    }
    for (course, mean) in &report.mean_grades {
        let _ = writeln!(out, "  {:<40} {:>6.2}", course, mean);
    }
    out
}

fn render_counts(out: &mut String, rows: &[(String, usize)]) {
    if rows.is_empty() {
        let _ = writeln!(out, "  (nenhuma)");
    }
    for (course, n) in rows {
        let _ = writeln!(out, "  {:<40} {:>4}", course, n);
    }
}
