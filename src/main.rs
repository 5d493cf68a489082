mod document;
mod error;
mod parser;
mod record;
mod settings;
mod store;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing::info;

use document::Document;
use parser::extract::ClinicContext;
use record::{ClinicType, PatientRecord};
use store::MasterStore;

#[derive(Parser)]
#[command(name = "clinic_audit", about = "Radiotherapy clinic audit extractor")]
struct Cli {
    /// Master Table location (.csv for a flat file, anything else is SQLite)
    #[arg(long, global = true)]
    master: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a clinic document and preview the records without saving
    Parse {
        file: PathBuf,
        /// Clinic date, YYYY-MM-DD (default: today)
        #[arg(short, long)]
        date: Option<NaiveDate>,
        /// Auto-detect, New, Follow-Up, Post-RT Review, Discharge or Other
        #[arg(short = 't', long)]
        clinic_type: Option<ClinicType>,
        /// Print records as JSON
        #[arg(long)]
        json: bool,
    },
    /// Parse clinic documents and merge them into the Master Table
    Upload {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Clinic date, YYYY-MM-DD (default: today)
        #[arg(short, long)]
        date: Option<NaiveDate>,
        /// Auto-detect, New, Follow-Up, Post-RT Review, Discharge or Other
        #[arg(short = 't', long)]
        clinic_type: Option<ClinicType>,
    },
    /// Delete the Master Table and start fresh
    Reset,
    /// Write the Master Table out as CSV
    Export {
        #[arg(short, long)]
        out: PathBuf,
    },
    /// Stored records overview table
    Show {
        /// Filter by clinic type
        #[arg(short = 't', long)]
        clinic_type: Option<ClinicType>,
        /// Max rows to display
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
    },
    /// Record counts by clinic type and diagnosis
    Stats,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let cfg = settings::load()?;
    let master_path = cli.master.unwrap_or(cfg.master_path);

    let result = match cli.command {
        Commands::Parse {
            file,
            date,
            clinic_type,
            json,
        } => {
            let ctx = clinic_context(date, clinic_type.unwrap_or(cfg.clinic_type));
            let records = parse_file(&file, &ctx)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else if records.is_empty() {
                println!("No patient sections found in {}.", file.display());
            } else {
                print_records(&records);
            }
            Ok(())
        }
        Commands::Upload {
            files,
            date,
            clinic_type,
        } => {
            let ctx = clinic_context(date, clinic_type.unwrap_or(cfg.clinic_type));
            let records = parse_files(&files, &ctx)?;
            if records.is_empty() {
                println!("No patient sections found; Master Table left unchanged.");
                return Ok(());
            }
            println!("Parsed {} records. Preview:", records.len());
            print_records(&records);

            let master = store::open(&master_path);
            let summary = store::upload(master.as_ref(), records)
                .with_context(|| format!("Failed to update {}", master_path.display()))?;
            println!("\n{}", summary);
            let skipped = summary.parsed.saturating_sub(summary.added);
            if skipped > 0 {
                println!("Skipped {} duplicate(s) already in the Master Table.", skipped);
            }
            Ok(())
        }
        Commands::Reset => {
            let master = store::open(&master_path);
            if master.delete()? {
                info!(path = %master_path.display(), "master table deleted");
                println!("Audit file deleted. You can start fresh.");
            } else {
                println!("No audit file found to delete.");
            }
            Ok(())
        }
        Commands::Export { out } => {
            let master = store::open(&master_path);
            let Some(records) = master.load()? else {
                println!("No Master Table at {}. Upload a document first.", master_path.display());
                return Ok(());
            };
            store::CsvStore::new(&out)
                .replace(&records)
                .with_context(|| format!("Failed to write {}", out.display()))?;
            println!("Exported {} records to {}", records.len(), out.display());
            Ok(())
        }
        Commands::Show { clinic_type, limit } => {
            let records = load_or_empty(&master_path)?;
            let rows: Vec<PatientRecord> = records
                .into_iter()
                .filter(|r| clinic_type.map_or(true, |t| r.clinic_type == t.label()))
                .take(limit)
                .collect();
            if rows.is_empty() {
                println!("No records found.");
                return Ok(());
            }
            print_records(&rows);
            println!("\n{} records shown", rows.len());
            Ok(())
        }
        Commands::Stats => {
            let records = load_or_empty(&master_path)?;
            println!("Master:  {}", master_path.display());
            println!("Records: {}", records.len());
            print_breakdown("Clinic type", records.iter().map(|r| r.clinic_type.as_str()));
            print_breakdown("Diagnosis", records.iter().map(|r| r.diagnosis.as_str()));
            print_breakdown("Endocrine", records.iter().map(|r| r.endocrine_therapy.as_str()));
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn clinic_context(date: Option<NaiveDate>, clinic_type: ClinicType) -> ClinicContext {
    let date = date.unwrap_or_else(|| chrono::Local::now().date_naive());
    ClinicContext {
        clinic_date: date.format("%Y-%m-%d").to_string(),
        clinic_type,
    }
}

fn parse_file(path: &Path, ctx: &ClinicContext) -> Result<Vec<PatientRecord>> {
    let doc = Document::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let records = parser::parse_paragraphs(doc.paragraphs(), ctx);
    info!(file = %path.display(), records = records.len(), "document parsed");
    Ok(records)
}

/// Documents are parsed one after another, in argument order.
fn parse_files(files: &[PathBuf], ctx: &ClinicContext) -> Result<Vec<PatientRecord>> {
    use indicatif::{ProgressBar, ProgressStyle};

    let pb = if files.len() > 1 {
        let pb = ProgressBar::new(files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
                .progress_chars("#>-"),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    let mut records = Vec::new();
    for file in files {
        pb.set_message(file.display().to_string());
        records.extend(parse_file(file, ctx)?);
        pb.inc(1);
    }
    pb.finish_and_clear();
    Ok(records)
}

fn load_or_empty(path: &Path) -> Result<Vec<PatientRecord>> {
    let master = store::open(path);
    Ok(master
        .load()
        .with_context(|| format!("Failed to read {}", path.display()))?
        .unwrap_or_default())
}

fn print_records(records: &[PatientRecord]) {
    println!(
        "{:>3} | {:<22} | {:<10} | {:<14} | {:<4} | {:>3} | {:<10} | {:<8} | {:<9}",
        "#", "Patient", "Clinic", "Type", "Dx", "Age", "Surgery", "RT", "Endocrine"
    );
    println!("{}", "-".repeat(105));

    for (i, r) in records.iter().enumerate() {
        let rt = if r.rt_dose.is_empty() {
            "-".to_string()
        } else {
            format!("{}/{}", r.rt_dose, r.rt_fractions)
        };
        println!(
            "{:>3} | {:<22} | {:<10} | {:<14} | {:<4} | {:>3} | {:<10} | {:<8} | {:<9}",
            i + 1,
            truncate(&r.patient_name, 22),
            r.clinic_date,
            truncate(&r.clinic_type, 14),
            r.diagnosis,
            r.age,
            r.surgery_date,
            rt,
            r.endocrine_therapy,
        );
    }
}

fn print_breakdown<'a>(label: &str, values: impl Iterator<Item = &'a str>) {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for v in values {
        *counts.entry(if v.is_empty() { "(blank)" } else { v }).or_default() += 1;
    }
    if counts.is_empty() {
        return;
    }
    println!("\n--- {} ---", label);
    for (value, n) in counts {
        println!("  {:<20} {}", value, n);
    }
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
    } else {
        format!("{}m {}s", secs / 60, secs % 60)
    }
}
