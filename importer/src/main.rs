use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use mdl_core::{extract_error_message, Importer, MrDlibImporter, ParseOptions, Record};
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};
use walkdir::WalkDir;

use std::fs::{self, File};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "mdl-import")]
#[command(about = "Parse Mr. DLib recommendation responses into bibliographic records", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse payload files into a JSON report of ranked records
    Parse {
        /// Input path (file or directory of *.json responses)
        #[arg(long)]
        input: String,
        /// Output report path; stdout when omitted
        #[arg(long)]
        output: Option<String>,
        /// HTML-escape field values in display strings
        #[arg(long, default_value_t = false)]
        escape_html: bool,
    },
    /// Report whether each input file looks like a recommendation payload
    Check {
        #[arg(long)]
        input: String,
    },
}

#[derive(Debug, Serialize)]
struct ImportReport {
    created_at: String,
    payloads: usize,
    failed: usize,
    records: Vec<SourcedRecord>,
}

#[derive(Debug, Serialize)]
struct SourcedRecord {
    source: String,
    /// Display position within its payload, starting at 0.
    position: usize,
    record: Record,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(std::io::stderr).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Parse { input, output, escape_html } => {
            let importer = MrDlibImporter::with_options(ParseOptions { escape_html });
            let report = import_all(&importer, Path::new(&input))?;
            let json = serde_json::to_string_pretty(&report)?;
            match output {
                Some(path) => {
                    if let Some(dir) = Path::new(&path).parent() {
                        fs::create_dir_all(dir)?;
                    }
                    fs::write(&path, json)?;
                    tracing::info!(output = %path, records = report.records.len(), "report written");
                }
                None => println!("{json}"),
            }
            Ok(())
        }
        Commands::Check { input } => {
            let importer = MrDlibImporter::new();
            let mut stdout = std::io::stdout().lock();
            for (file, recognized) in check_all(&importer, Path::new(&input))? {
                let verdict = if recognized { "recognized" } else { "unrecognized" };
                writeln!(stdout, "{}\t{verdict}", file.display())?;
            }
            Ok(())
        }
    }
}

fn collect_inputs(input: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = Vec::new();
    if input.is_dir() {
        for entry in WalkDir::new(input).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() && p.extension().and_then(|s| s.to_str()) == Some("json") {
                files.push(p.to_path_buf());
            }
        }
    } else if input.is_file() {
        files.push(input.to_path_buf());
    } else {
        return Err(anyhow!("input not found: {}", input.display()));
    }
    Ok(files)
}

fn import_all(importer: &MrDlibImporter, input: &Path) -> Result<ImportReport> {
    let files = collect_inputs(input)?;
    let mut records = Vec::new();
    let mut failed = 0;

    for file in &files {
        let source = file.display().to_string();
        match importer.import_database(BufReader::new(File::open(file)?)) {
            Ok(parsed) => {
                records.extend(
                    parsed
                        .into_iter()
                        .enumerate()
                        .map(|(position, record)| SourcedRecord { source: source.clone(), position, record }),
                );
            }
            Err(e) => {
                failed += 1;
                let message = fs::read_to_string(file)
                    .map(|body| extract_error_message(&body))
                    .unwrap_or_else(|_| mdl_core::DEFAULT_ERROR_MESSAGE.to_string());
                tracing::warn!(file = %source, error = %e, %message, "skipping payload");
            }
        }
    }

    tracing::info!(payloads = files.len(), failed, records = records.len(), "import complete");
    Ok(ImportReport {
        created_at: time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_default(),
        payloads: files.len(),
        failed,
        records,
    })
}

fn check_all(importer: &MrDlibImporter, input: &Path) -> Result<Vec<(PathBuf, bool)>> {
    let mut verdicts = Vec::new();
    for file in collect_inputs(input)? {
        let recognized = importer.is_recognized_format(BufReader::new(File::open(&file)?))?;
        tracing::debug!(file = %file.display(), recognized, "checked payload");
        verdicts.push((file, recognized));
    }
    Ok(verdicts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write(dir: &Path, name: &str, body: &str) {
        fs::write(dir.join(name), body).unwrap();
    }

    #[test]
    fn imports_directory_and_skips_failures() {
        let dir = tempdir().unwrap();
        write(dir.path(), "a.json", r#"{"recommendations": {"x": {"title": "second", "recommendation_id": 2}, "y": {"title": "first", "recommendation_id": 1}}}"#);
        write(dir.path(), "b.json", r#"{"message": "rate limited"}"#);
        write(dir.path(), "notes.txt", "ignored");
        fs::create_dir_all(dir.path().join("nested")).unwrap();
        write(&dir.path().join("nested"), "c.json", "{\n\"recommendations\": {\n\"z\": {}\n}\n}");

        let report = import_all(&MrDlibImporter::new(), dir.path()).unwrap();
        assert_eq!(report.payloads, 3);
        assert_eq!(report.failed, 1);
        let titles: Vec<&str> = report.records.iter().map(|r| r.record.title()).collect();
        assert_eq!(titles, vec!["first", "second", ""]);
        assert_eq!(report.records[1].position, 1);
        assert!(report.records[2].source.ends_with("c.json"));
    }

    #[test]
    fn check_reports_each_file() {
        let dir = tempdir().unwrap();
        write(dir.path(), "good.json", r#"{"recommendations": {}}"#);
        write(dir.path(), "bad.json", "<html></html>");
        let verdicts = check_all(&MrDlibImporter::new(), dir.path()).unwrap();
        assert_eq!(verdicts.len(), 2);
        assert!(verdicts.iter().any(|(p, ok)| p.ends_with("good.json") && *ok));
        assert!(verdicts.iter().any(|(p, ok)| p.ends_with("bad.json") && !*ok));
    }

    #[test]
    fn check_continues_past_binary_files() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.json"), [0xffu8, 0xfe, 0x00, 0x7b]).unwrap();
        write(dir.path(), "b.json", r#"{"recommendations": {}}"#);
        let verdicts = check_all(&MrDlibImporter::new(), dir.path()).unwrap();
        assert_eq!(verdicts.len(), 2);
        assert!(!verdicts[0].1);
        assert!(verdicts[1].1);
    }

    #[test]
    fn missing_input_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(collect_inputs(&dir.path().join("absent.json")).is_err());
    }
}
