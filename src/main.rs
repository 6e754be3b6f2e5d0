mod batch;
mod db;
mod error;
mod export;
mod model;
mod parser;
mod report;
mod settings;
mod source;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use settings::Settings;
use source::{PageSource, TextDocument};

#[derive(Parser)]
#[command(name = "historico", about = "Academic transcript extractor")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract transcript records from text dumps (pages separated by form feed)
    Extract {
        /// Transcript text files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        /// CSV output path (default: settings csv_path)
        #[arg(long)]
        csv: Option<PathBuf>,
        /// SQLite database path (default: settings db_path)
        #[arg(long)]
        db: Option<PathBuf>,
        /// Skip the database
        #[arg(long)]
        no_db: bool,
        /// Also print every record as a JSON line
        #[arg(long)]
        json: bool,
        /// Courses per ranking in the report
        #[arg(short = 'n', long)]
        top: Option<usize>,
    },
    /// Rankings and mean grades over the stored records
    Report {
        #[arg(long)]
        db: Option<PathBuf>,
        #[arg(short = 'n', long)]
        top: Option<usize>,
    },
    /// Stored records table
    Records {
        #[arg(long)]
        db: Option<PathBuf>,
        /// Only this student
        #[arg(short, long)]
        matricula: Option<String>,
        /// Max rows to display
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
    },
    /// Extract `Aluno: … Matrícula: … Média: …` roster lines
    Roster {
        input: PathBuf,
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Show database statistics
    Stats {
        #[arg(long)]
        db: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load().context("Failed to load settings")?;
    info!(?settings, "settings loaded");

    let result = match cli.command {
        Commands::Extract {
            inputs,
            csv,
            db,
            no_db,
            json,
            top,
        } => {
            let batch = extract_documents(&inputs)?;
            let records = batch.records();

            let csv_path = csv.unwrap_or_else(|| settings.csv_path.clone());
            let n = export::save_records(&csv_path, &records)?;
            println!("Saved {} records to {}", n, csv_path.display());

            if !no_db {
                let db_path = db.unwrap_or_else(|| settings.db_path.clone());
                let conn = db::connect(&db_path)?;
                db::init_schema(&conn)?;
                let mut stored = 0;
                for t in &batch.transcripts {
                    stored += db::save_transcript(&conn, t)?;
                }
                println!("Stored {} records in {}", stored, db_path.display());
            }

            if json {
                for r in &records {
                    println!("{}", serde_json::to_string(r)?);
                }
            }

            let r = report::Report::build(&records, top.unwrap_or(settings.top_n));
            println!("\n{}", report::render(&r));
            Ok(())
        }
        Commands::Report { db, top } => {
            let conn = open_db(db.as_deref(), &settings)?;
            let records = db::fetch_records(&conn, None, None)?;
            if records.is_empty() {
                println!("No records stored. Run 'extract' first.");
                return Ok(());
            }
            let r = report::Report::build(&records, top.unwrap_or(settings.top_n));
            println!("{}", report::render(&r));
            Ok(())
        }
        Commands::Records {
            db,
            matricula,
            limit,
        } => {
            let conn = open_db(db.as_deref(), &settings)?;
            let rows = db::fetch_records(&conn, matricula.as_deref(), Some(limit))?;
            if rows.is_empty() {
                println!("No records found.");
                return Ok(());
            }

            println!(
                "{:>3} | {:<11} | {:<20} | {:<6} | {:<32} | {:<11} | {:>5}",
                "#", "Matricula", "Nome", "Termo", "Disciplina", "Situação", "Nota"
            );
            println!("{}", "-".repeat(106));
            for (i, r) in rows.iter().enumerate() {
                let grade = r.grade.map(|g| format!("{:.1}", g)).unwrap_or_else(|| "-".into());
                println!(
                    "{:>3} | {:<11} | {:<20} | {:<6} | {:<32} | {:<11} | {:>5}",
                    i + 1,
                    r.identifier,
                    truncate(&r.name, 20),
                    r.term,
                    truncate(&r.course, 32),
                    r.status,
                    grade
                );
            }
            println!("\n{} records", rows.len());
            Ok(())
        }
        Commands::Roster { input, csv } => {
            let pages = TextDocument::new(&input).pages()?;
            let entries = parser::roster::extract(parser::text::document_lines(&pages));
            if entries.is_empty() {
                println!("No roster lines found in {}.", input.display());
                return Ok(());
            }
            for e in &entries {
                println!("{:<32} {:<12} {}", truncate(&e.student, 32), e.identifier, e.average);
            }
            if let Some(path) = csv {
                let n = export::save_roster(&path, &entries)?;
                println!("Saved {} roster rows to {}", n, path.display());
            }
            Ok(())
        }
        Commands::Stats { db } => {
            let conn = open_db(db.as_deref(), &settings)?;
            let s = db::get_stats(&conn)?;
            println!("Records:  {}", s.rows);
            println!("Students: {}", s.students);
            println!("Courses:  {}", s.courses);
            println!("Graded:   {}", s.graded);
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn open_db(path: Option<&Path>, settings: &Settings) -> anyhow::Result<rusqlite::Connection> {
    let conn = db::connect(path.unwrap_or(settings.db_path.as_path()))?;
    db::init_schema(&conn)?;
    Ok(conn)
}

fn extract_documents(inputs: &[PathBuf]) -> anyhow::Result<batch::Batch> {
    use indicatif::{ProgressBar, ProgressStyle};

    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len}")?
            .progress_chars("#>-"),
    );
    let batch = batch::extract_all(inputs, || pb.inc(1));
    pb.finish_and_clear();
    let batch = batch?;

    for (path, e) in &batch.failures {
        warn!(path = %path.display(), error = %e, "document skipped");
    }
    for t in &batch.transcripts {
        println!(
            "{} ({}) - {} records",
            t.identity.name,
            t.identity.identifier,
            t.records.len()
        );
    }
    Ok(batch)
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
