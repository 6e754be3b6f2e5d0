use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::text::{title_case, LETTERS};
use crate::model::{RawRecord, Status};

// term, course (lazy, so it stops before the class-section digits), class
// section, status literal, optional grade.
static RECORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    let statuses = Status::ALL.map(Status::as_str).join("|");
    Regex::new(&format!(
        r"(?P<term>[0-9]{{4}}\.[0-9])\s+(?P<course>[{LETTERS} ]+?)\s+[0-9]+\s+(?P<status>{statuses})\b(?:\s+(?P<grade>[-+]?[0-9]+(?:[.,][0-9]+)?))?"
    ))
    .unwrap()
});

/// Lazily extract raw records from document lines, at most one per line.
/// Lines that do not carry a record are skipped.
pub fn extract<'a, I>(lines: I) -> impl Iterator<Item = RawRecord> + 'a
where
    I: IntoIterator<Item = &'a str>,
    I::IntoIter: 'a,
{
    lines.into_iter().filter_map(parse_line)
}

pub fn parse_line(line: &str) -> Option<RawRecord> {
    let caps = RECORD_RE.captures(line)?;

    let course = caps["course"].trim();
    if course.is_empty() {
        debug!(line, "record line without course name, skipped");
        return None;
    }

    let status: Status = caps["status"].parse().ok()?;

    let grade = match caps.name("grade") {
        Some(m) => match parse_grade(m.as_str()) {
            Some(g) => Some(g),
            None => {
                debug!(line, grade = m.as_str(), "unparseable grade, line skipped");
                return None;
            }
        },
        None => None,
    };

    Some(RawRecord {
        term: caps["term"].to_string(),
        course: title_case(course),
        status,
        grade,
    })
}

/// Decimal point or decimal comma ("8.5", "8,5").
fn parse_grade(token: &str) -> Option<f64> {
    token
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|g| g.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approved_with_grade() {
        let r = parse_line("2022.1 CALCULO I 01 APROVADO 8.5").unwrap();
        assert_eq!(r.term, "2022.1");
        assert_eq!(r.course, "Calculo I");
        assert_eq!(r.status, Status::Approved);
        assert_eq!(r.grade, Some(8.5));
    }

    #[test]
    fn withdrawn_without_grade() {
        let r = parse_line("2022.1 CALCULO I 01 TRANCADO").unwrap();
        assert_eq!(r.status, Status::Withdrawn);
        assert_eq!(r.grade, None);
    }

    #[test]
    fn dash_placeholder_is_absent_grade() {
        let r = parse_line("2022.2 FISICA GERAL 03 TRANCADO -").unwrap();
        assert_eq!(r.course, "Fisica Geral");
        assert_eq!(r.grade, None);
    }

    #[test]
    fn irrelevant_text() {
        assert!(parse_line("texto irrelevante sem padrão").is_none());
        assert!(parse_line("").is_none());
    }

    #[test]
    fn unknown_status_rejected() {
        assert!(parse_line("2022.1 CALCULO I 01 CANCELADO 8.5").is_none());
        assert!(parse_line("2022.1 CALCULO I 01 aprovado 8.5").is_none());
        assert!(parse_line("2022.1 CALCULO I 01 APROVADOS 8.5").is_none());
    }

    #[test]
    fn class_section_required() {
        assert!(parse_line("2022.1 CALCULO I APROVADO 8.5").is_none());
    }

    #[test]
    fn course_stops_before_section_digits() {
        let r = parse_line("2021.2 ESTRUTURA DE DADOS II 12 REPROVADO 3.0").unwrap();
        assert_eq!(r.course, "Estrutura De Dados Ii");
        assert_eq!(r.status, Status::Failed);
        assert_eq!(r.grade, Some(3.0));
    }

    #[test]
    fn accented_course() {
        let r = parse_line("2023.1 INTRODUÇÃO À PROGRAMAÇÃO 02 APROVADO 10").unwrap();
        assert_eq!(r.course, "Introdução À Programação");
        assert_eq!(r.grade, Some(10.0));
    }

    #[test]
    fn substring_match_and_decimal_comma() {
        let r = parse_line("| 2020.2   ÁLGEBRA LINEAR   07   APROVADO   7,25 | 60h").unwrap();
        assert_eq!(r.term, "2020.2");
        assert_eq!(r.course, "Álgebra Linear");
        assert_eq!(r.grade, Some(7.25));
    }

    #[test]
    fn grade_stops_at_trailing_punctuation() {
        let r = parse_line("2022.1 CALCULO I 01 APROVADO 8,5, 60h").unwrap();
        assert_eq!(r.grade, Some(8.5));
        let r = parse_line("2022.1 CALCULO I 01 APROVADO 10.").unwrap();
        assert_eq!(r.grade, Some(10.0));
        let r = parse_line("2022.1 CALCULO I 01 APROVADO 7;").unwrap();
        assert_eq!(r.grade, Some(7.0));
    }

    #[test]
    fn out_of_range_grade_rejects_line() {
        let line = format!("2022.1 CALCULO I 01 APROVADO {}", "9".repeat(400));
        assert!(parse_line(&line).is_none());
    }

    #[test]
    fn enrolled_and_pending() {
        let r = parse_line("2024.1 COMPILADORES 01 MATRICULADO").unwrap();
        assert_eq!(r.status, Status::Enrolled);
        let r = parse_line("2024.1 REDES 04 PENDENTE").unwrap();
        assert_eq!(r.status, Status::Pending);
    }

    #[test]
    fn one_record_per_line() {
        let line = "2022.1 CALCULO I 01 APROVADO 8.5 2022.2 CALCULO II 01 APROVADO 9.0";
        let out: Vec<_> = extract([line]).collect();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].course, "Calculo I");
    }

    #[test]
    fn extract_keeps_line_order() {
        let lines = [
            "HISTORICO ESCOLAR",
            "2022.1 CALCULO I 01 APROVADO 8.5",
            "Pagina 1 de 2",
            "2022.1 CALCULO I 01 TRANCADO",
        ];
        let out: Vec<_> = extract(lines).collect();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].status, Status::Approved);
        assert_eq!(out[1].status, Status::Withdrawn);
    }
}
