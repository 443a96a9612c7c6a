//! CLI: command-line surface of the `processor` binary.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use bytes::Bytes;
use clap::{Parser, Subcommand};
use thiserror::Error;
use tracing::info;

use crate::client::file::JsonFileStore;
use crate::parser::formats::plist::{to_plist_xml, PlistDecoder};
use crate::parser::{DecodeError, ReportDecoder};
use crate::report::{extract_report, RequestContext};
use crate::service::{ProcessError, ReportProcessor};

#[derive(Parser, Debug)]
#[command(
    name = "processor",
    version,
    about = "Munki report processor",
    long_about = "Decode munki ManagedInstallReport submissions (plist or YAML),\n\
                  normalize them and derive the per-machine summary event."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Process one submission and store the result under the data directory.
    Process {
        /// Serial number of the submitting machine.
        #[arg(value_name = "SERIAL")]
        serial: String,

        /// Report file (reads stdin when omitted).
        #[arg(value_name = "PATH")]
        path: Option<PathBuf>,
    },

    /// Reduce a full ManagedInstallReport plist to the keys the server uses.
    Extract {
        /// ManagedInstallReport.plist (reads stdin when omitted).
        #[arg(value_name = "PATH")]
        path: Option<PathBuf>,
    },
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Process(#[from] ProcessError),

    #[error("Could not read install report: {0}")]
    Decode(#[from] DecodeError),

    #[error("Could not encode plist: {0}")]
    Plist(#[from] plist::Error),

    #[error("Could not encode output: {0}")]
    Json(#[from] serde_json::Error),
}

/// Execute `cli`, writing command output to `out`.
pub fn run<W: Write>(
    cli: Cli,
    processor: &ReportProcessor,
    data_dir: &Path,
    out: &mut W,
) -> Result<(), CliError> {
    match cli.command {
        Command::Process { serial, path } => {
            let raw = read_input(path.as_deref())?;
            let store = JsonFileStore::new(data_dir);
            let context = RequestContext::new(serial);

            let outcome = processor.run(Some(raw), &context, &store, &store)?;
            info!(
                serial = %context.serial_number,
                created = outcome.stored.created,
                dir = %store.dir().display(),
                "stored report"
            );

            serde_json::to_writer_pretty(&mut *out, &outcome)?;
            writeln!(out)?;
        }
        Command::Extract { path } => {
            let raw = read_input(path.as_deref())?;
            let install_report = PlistDecoder.decode(&raw)?;
            let extracted = extract_report(&install_report);
            out.write_all(&to_plist_xml(&extracted)?)?;
        }
    }
    Ok(())
}

/// Whole file, or stdin when no path is given. An empty input is passed on
/// as-is so the processor can report it as missing data.
fn read_input(path: Option<&Path>) -> Result<Bytes, CliError> {
    let raw = match path {
        Some(path) => fs::read(path)?,
        None => {
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf)?;
            buf
        }
    };
    Ok(Bytes::from(raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conf::ProcessorConfig;
    use crate::runtime::boot::build_processor;

    const REPORT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
    <key>ManifestName</key>
    <string>site_default</string>
    <key>ManagedInstallVersion</key>
    <string>6.3.1</string>
    <key>Warnings</key>
    <array>
        <string>catalog testing missing</string>
        <string>catalog testing missing</string>
    </array>
    <key>Errors</key>
    <array/>
    <key>MachineInfo</key>
    <dict>
        <key>hostname</key>
        <string>lab-01</string>
    </dict>
</dict>
</plist>
"#;

    fn write_report(dir: &Path) -> PathBuf {
        let path = dir.join("ManagedInstallReport.plist");
        fs::write(&path, REPORT).unwrap();
        path
    }

    #[test]
    fn test_parse_process_command() {
        let cli = Cli::try_parse_from(["processor", "process", "C02ABC", "report.yaml"]).unwrap();
        match cli.command {
            Command::Process { serial, path } => {
                assert_eq!(serial, "C02ABC");
                assert_eq!(path, Some(PathBuf::from("report.yaml")));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_requires_serial() {
        assert!(Cli::try_parse_from(["processor", "process"]).is_err());
    }

    #[test]
    fn test_run_process_writes_store_and_prints_outcome() {
        let tmp = tempfile::tempdir().unwrap();
        let report = write_report(tmp.path());
        let data_dir = tmp.path().join("data");
        let processor = build_processor(&ProcessorConfig::default()).unwrap();

        let cli = Cli::try_parse_from([
            "processor",
            "process",
            "C02ABC",
            report.to_str().unwrap(),
        ])
        .unwrap();
        let mut out = Vec::new();
        run(cli, &processor, &data_dir, &mut out).unwrap();

        let printed: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(printed["stored"]["serial_number"], "C02ABC");
        assert_eq!(printed["stored"]["warning_count"], 2);
        assert!(data_dir.join("C02ABC.json").exists());
        assert!(data_dir.join("C02ABC.event.json").exists());
    }

    #[test]
    fn test_run_process_empty_file_is_no_input() {
        let tmp = tempfile::tempdir().unwrap();
        let empty = tmp.path().join("empty");
        fs::write(&empty, b"").unwrap();
        let processor = build_processor(&ProcessorConfig::default()).unwrap();

        let cli = Cli::try_parse_from(["processor", "process", "C02ABC", empty.to_str().unwrap()])
            .unwrap();
        let err = run(cli, &processor, tmp.path(), &mut Vec::new()).unwrap_err();
        assert!(matches!(err, CliError::Process(ProcessError::NoInput)));
    }

    #[test]
    fn test_run_extract_reduces_report() {
        let tmp = tempfile::tempdir().unwrap();
        let report = write_report(tmp.path());
        let processor = build_processor(&ProcessorConfig::default()).unwrap();

        let cli = Cli::try_parse_from(["processor", "extract", report.to_str().unwrap()]).unwrap();
        let mut out = Vec::new();
        run(cli, &processor, tmp.path(), &mut out).unwrap();

        let xml = String::from_utf8(out).unwrap();
        assert!(xml.contains("<key>ManifestName</key>"));
        assert!(xml.contains("<string>6.3.1</string>"));
        assert!(!xml.contains("MachineInfo"));
        assert!(!xml.contains("<key>Errors</key>"));
        assert_eq!(xml.matches("catalog testing missing").count(), 1);
    }

    #[test]
    fn test_run_extract_rejects_yaml() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("report.yaml");
        fs::write(&path, "ManifestName: lab\n").unwrap();
        let processor = build_processor(&ProcessorConfig::default()).unwrap();

        let cli = Cli::try_parse_from(["processor", "extract", path.to_str().unwrap()]).unwrap();
        let err = run(cli, &processor, tmp.path(), &mut Vec::new()).unwrap_err();
        assert!(matches!(err, CliError::Decode(_)));
    }
}
