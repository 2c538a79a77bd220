use anyhow::{bail, Result};
use clap::Parser;
use colored::Colorize;
use serde::Serialize;
use silicon_core::ArchitectureProbe;
use std::path::PathBuf;
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// Report which CPU architectures Mach-O executables were built for
#[derive(Parser)]
#[command(
    name = "silicon",
    about = "Check whether Mach-O binaries include native Apple Silicon (arm64) code",
    version,
    author
)]
struct Cli {
    /// Paths to Mach-O executables
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Only list binaries that are not Apple Silicon ready
    #[arg(long)]
    not_ready: bool,

    /// Print results as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct Report {
    path: String,
    /// `None` when the file is not a valid Mach-O file.
    architectures: Option<Vec<String>>,
    kind: String,
    apple_silicon_ready: bool,
}

impl Report {
    fn new(path: &std::path::Path, probe: Option<&ArchitectureProbe>) -> Self {
        match probe {
            Some(probe) => Self {
                path: probe.path.clone(),
                architectures: Some(
                    probe
                        .architectures()
                        .iter()
                        .map(ToString::to_string)
                        .collect(),
                ),
                kind: probe.architectures_label(),
                apple_silicon_ready: probe.is_apple_silicon_ready(),
            },
            None => Self {
                path: path.display().to_string(),
                architectures: None,
                kind: "not a valid Mach-O file".to_string(),
                apple_silicon_ready: false,
            },
        }
    }
}

#[derive(Tabled)]
struct Row {
    #[tabled(rename = "Path")]
    path: String,
    #[tabled(rename = "Architectures")]
    architectures: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Apple Silicon")]
    apple_silicon: &'static str,
}

impl From<&Report> for Row {
    fn from(report: &Report) -> Self {
        Self {
            path: report.path.clone(),
            architectures: report
                .architectures
                .as_ref()
                .map(|archs| archs.join(", "))
                .unwrap_or_else(|| "-".to_string()),
            kind: report.kind.clone(),
            apple_silicon: match (&report.architectures, report.apple_silicon_ready) {
                (None, _) => "-",
                (Some(_), true) => "yes",
                (Some(_), false) => "no",
            },
        }
    }
}

/// Counts over every probed path, before any `--not-ready` filtering.
#[derive(Debug, PartialEq, Eq)]
struct Summary {
    ready: usize,
    not_ready: usize,
    invalid: usize,
}

impl Summary {
    fn from_reports(reports: &[Report]) -> Self {
        let ready = reports.iter().filter(|r| r.apple_silicon_ready).count();
        let invalid = reports.iter().filter(|r| r.architectures.is_none()).count();
        Self {
            ready,
            not_ready: reports.len() - ready - invalid,
            invalid,
        }
    }

    /// The run fails only when no path was a valid Mach-O file.
    fn check(&self) -> Result<()> {
        if self.ready + self.not_ready == 0 {
            bail!("None of the {} given path(s) is a valid Mach-O file", self.invalid);
        }
        Ok(())
    }
}

fn probe_paths(paths: &[PathBuf]) -> Vec<Report> {
    paths
        .iter()
        .map(|path| {
            let probe = ArchitectureProbe::probe(path);
            if probe.is_none() {
                log::warn!("{}: not a valid Mach-O file", path.display());
            }
            Report::new(path, probe.as_ref())
        })
        .collect()
}

/// Keeps valid binaries that lack an arm64 image.
fn retain_not_ready(reports: &mut Vec<Report>) {
    reports.retain(|r| r.architectures.is_some() && !r.apple_silicon_ready);
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut reports = probe_paths(&cli.paths);
    let summary = Summary::from_reports(&reports);

    if cli.not_ready {
        retain_not_ready(&mut reports);
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return summary.check();
    }

    if reports.is_empty() {
        println!("No binaries lacking Apple Silicon support.");
    } else {
        let rows: Vec<Row> = reports.iter().map(Row::from).collect();
        println!("{}", Table::new(rows).with(Style::rounded()));
    }

    println!(
        "{} ready, {} not ready, {} invalid",
        summary.ready.to_string().green(),
        summary.not_ready.to_string().yellow(),
        summary.invalid.to_string().red()
    );

    summary.check()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::fs;
    use tempfile::{tempdir, TempDir};

    fn fixture(dir: &TempDir, name: &str, bytes: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, bytes).expect("write fixture");
        path
    }

    /// One arm64 binary, one x86_64 binary and one text file.
    fn mixed_fixtures(dir: &TempDir) -> Vec<PathBuf> {
        vec![
            fixture(dir, "arm64", &[0xFE, 0xED, 0xFA, 0xCF, 0x01, 0x00, 0x00, 0x0C]),
            fixture(dir, "x86_64", &[0xCF, 0xFA, 0xED, 0xFE, 0x07, 0x00, 0x00, 0x01]),
            fixture(dir, "readme.txt", b"not a binary"),
        ]
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn invalid_file_renders_placeholders() {
        let report = Report::new(std::path::Path::new("/tmp/readme.txt"), None);
        let row = Row::from(&report);

        assert_eq!(row.path, "/tmp/readme.txt");
        assert_eq!(row.architectures, "-");
        assert_eq!(row.kind, "not a valid Mach-O file");
        assert_eq!(row.apple_silicon, "-");
        assert!(serde_json::to_string(&report)
            .unwrap()
            .contains("\"architectures\":null"));
    }

    #[test]
    fn mixed_inputs_are_counted_and_succeed() {
        let dir = tempdir().expect("create temp dir");
        let reports = probe_paths(&mixed_fixtures(&dir));

        assert_eq!(reports.len(), 3);
        assert_eq!(reports[0].kind, "Apple");
        assert_eq!(reports[1].kind, "Intel 64");
        assert!(reports[2].architectures.is_none());

        let summary = Summary::from_reports(&reports);
        assert_eq!(
            summary,
            Summary {
                ready: 1,
                not_ready: 1,
                invalid: 1,
            }
        );
        assert!(summary.check().is_ok());
    }

    #[test]
    fn not_ready_filter_keeps_only_valid_non_arm64() {
        let dir = tempdir().expect("create temp dir");
        let mut reports = probe_paths(&mixed_fixtures(&dir));

        retain_not_ready(&mut reports);

        assert_eq!(reports.len(), 1);
        assert_eq!(
            reports[0].architectures.as_deref(),
            Some(&["x86_64".to_string()][..])
        );
        assert!(!reports[0].apple_silicon_ready);
    }

    #[test]
    fn fails_only_when_every_path_is_invalid() {
        let dir = tempdir().expect("create temp dir");
        let paths = vec![
            fixture(&dir, "empty", &[]),
            dir.path().join("missing"),
            dir.path().to_path_buf(),
        ];

        let reports = probe_paths(&paths);
        assert_eq!(reports.len(), 3);
        assert!(reports.iter().all(|r| r.architectures.is_none()));

        let summary = Summary::from_reports(&reports);
        assert_eq!(summary.invalid, 3);
        assert!(summary.check().is_err());
    }
}
