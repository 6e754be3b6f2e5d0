use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;

use crate::model::{AcademicRecord, Status, Transcript};

pub fn connect(path: &Path) -> Result<Connection> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("Failed to create {:?}", dir))?;
    }
    let conn = Connection::open(path).with_context(|| format!("Failed to open {:?}", path))?;
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS historico (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            matricula     TEXT NOT NULL,
            nome          TEXT NOT NULL,
            ano_semestre  TEXT NOT NULL,
            disciplina    TEXT NOT NULL,
            situacao      TEXT NOT NULL
                          CHECK(situacao IN ('APROVADO','REPROVADO','TRANCADO','MATRICULADO','PENDENTE')),
            nota          REAL,
            created_at    TEXT NOT NULL DEFAULT (datetime('now'))
        );
        CREATE INDEX IF NOT EXISTS idx_historico_matricula ON historico(matricula);
        CREATE INDEX IF NOT EXISTS idx_historico_disciplina ON historico(disciplina);
        ",
    )?;
    Ok(())
}

// ── Writing ──

/// Store one student's transcript. Rows already stored for the same student
/// are replaced, so importing a document twice leaves one copy.
pub fn save_transcript(conn: &Connection, transcript: &Transcript) -> Result<usize> {
    let tx = conn.unchecked_transaction()?;
    let mut count = 0;
    {
        tx.execute(
            "DELETE FROM historico WHERE matricula = ?1",
            [&transcript.identity.identifier],
        )?;
        let mut stmt = tx.prepare(
            "INSERT INTO historico (matricula, nome, ano_semestre, disciplina, situacao, nota)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )?;
        for r in &transcript.records {
            count += stmt.execute(rusqlite::params![
                r.identifier,
                r.name,
                r.term,
                r.course,
                r.status.as_str(),
                r.grade,
            ])?;
        }
    }
    tx.commit()?;
    Ok(count)
}

// ── Reading ──

pub fn fetch_records(
    conn: &Connection,
    matricula: Option<&str>,
    limit: Option<usize>,
) -> Result<Vec<AcademicRecord>> {
    let mut sql = String::from(
        "SELECT matricula, nome, ano_semestre, disciplina, situacao, nota FROM historico",
    );
    if matricula.is_some() {
        sql.push_str(" WHERE matricula = ?1");
    }
    sql.push_str(" ORDER BY id");
    if let Some(n) = limit {
        sql.push_str(&format!(" LIMIT {}", n));
    }

    let mut stmt = conn.prepare(&sql)?;
    let map_row = |row: &rusqlite::Row<'_>| -> rusqlite::Result<AcademicRecord> {
        let situacao: String = row.get(4)?;
        let status = situacao.parse::<Status>().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
        })?;
        Ok(AcademicRecord {
            identifier: row.get(0)?,
            name: row.get(1)?,
            term: row.get(2)?,
            course: row.get(3)?,
            status,
            grade: row.get(5)?,
        })
    };
    let rows = match matricula {
        Some(m) => stmt.query_map([m], map_row)?.collect::<Result<Vec<_>, _>>()?,
        None => stmt.query_map([], map_row)?.collect::<Result<Vec<_>, _>>()?,
    };
    Ok(rows)
}

// ── Stats ──

pub struct Stats {
    pub rows: usize,
    pub students: usize,
    pub courses: usize,
    pub graded: usize,
}

pub fn get_stats(conn: &Connection) -> Result<Stats> {
    let rows: usize = conn.query_row("SELECT COUNT(*) FROM historico", [], |r| r.get(0))?;
    let students: usize = conn.query_row(
        "SELECT COUNT(DISTINCT matricula) FROM historico",
        [],
        |r| r.get(0),
    )?;
    let courses: usize = conn.query_row(
        "SELECT COUNT(DISTINCT disciplina) FROM historico",
        [],
        |r| r.get(0),
    )?;
    let graded: usize = conn.query_row(
        "SELECT COUNT(*) FROM historico WHERE nota IS NOT NULL",
        [],
        |r| r.get(0),
    )?;
    Ok(Stats {
        rows,
        students,
        courses,
        graded,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StudentIdentity;

    fn memory() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        conn
    }

    fn transcript(identifier: &str, rows: &[(&str, Status, Option<f64>)]) -> Transcript {
        let identity = StudentIdentity {
            identifier: identifier.into(),
            name: "Joao Da Silva".into(),
        };
        let records = rows
            .iter()
            .map(|(course, status, grade)| AcademicRecord {
                identifier: identity.identifier.clone(),
                name: identity.name.clone(),
                term: "2022.1".into(),
                course: course.to_string(),
                status: *status,
                grade: *grade,
            })
            .collect();
        Transcript { identity, records }
    }

    #[test]
    fn save_and_fetch() {
        let conn = memory();
        let t = transcript(
            "20220063005",
            &[("Calculo I", Status::Approved, Some(8.5)), ("Fisica", Status::Withdrawn, None)],
        );
        assert_eq!(save_transcript(&conn, &t).unwrap(), 2);
        let rows = fetch_records(&conn, None, None).unwrap();
        assert_eq!(rows, t.records);
    }

    #[test]
    fn reimport_replaces_rows() {
        let conn = memory();
        let t = transcript("20220063005", &[("Calculo I", Status::Approved, Some(8.5))]);
        save_transcript(&conn, &t).unwrap();
        save_transcript(&conn, &t).unwrap();
        assert_eq!(get_stats(&conn).unwrap().rows, 1);
    }

    #[test]
    fn filter_and_limit() {
        let conn = memory();
        save_transcript(
            &conn,
            &transcript(
                "20220063005",
                &[("A", Status::Approved, Some(7.0)), ("B", Status::Failed, Some(2.0))],
            ),
        )
        .unwrap();
        save_transcript(&conn, &transcript("20230000001", &[("C", Status::Pending, None)])).unwrap();

        let only = fetch_records(&conn, Some("20230000001"), None).unwrap();
        assert_eq!(only.len(), 1);
        assert_eq!(only[0].course, "C");
        assert_eq!(fetch_records(&conn, None, Some(2)).unwrap().len(), 2);

        let s = get_stats(&conn).unwrap();
        assert_eq!(s.rows, 3);
        assert_eq!(s.students, 2);
        assert_eq!(s.courses, 3);
        assert_eq!(s.graded, 2);
    }

    #[test]
    fn unknown_status_rejected_by_schema() {
        let conn = memory();
        let res = conn.execute(
            "INSERT INTO historico (matricula, nome, ano_semestre, disciplina, situacao)
             VALUES ('1', 'x', '2022.1', 'y', 'CANCELADO')",
            [],
        );
        assert!(res.is_err());
    }
}
