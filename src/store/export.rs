use std::fs;
use std::path::Path;

use anyhow::Result;
use thiserror::Error;

use crate::session::attempt::Attempt;
use crate::store::schema::{EXPORT_VERSION, ExportData};

/// Import failures are surfaced verbatim in the settings screen, so each
/// variant carries enough context to tell the user what to fix.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("could not read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("not a valid export file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unsupported export version {found} (expected {expected})")]
    Version { found: u32, expected: u32 },
}

/// Serialize a full export snapshot to a JSON file. Importing this file back
/// reproduces the exact same logs, byte-for-byte at the data level.
pub fn write_json_export(path: &Path, data: &ExportData) -> Result<()> {
    let json = serde_json::to_string_pretty(data)?;
    fs::write(path, json)?;
    Ok(())
}

pub fn read_json_export(path: &Path) -> Result<ExportData, ImportError> {
    let content = fs::read_to_string(path).map_err(|source| ImportError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let data: ExportData = serde_json::from_str(&content)?;
    if data.mathdr_export_version != EXPORT_VERSION {
        return Err(ImportError::Version {
            found: data.mathdr_export_version,
            expected: EXPORT_VERSION,
        });
    }
    Ok(data)
}

const CSV_HEADER: &str =
    "id,timestamp,operation,digits,question,user_answer,correct_answer,correct,time_taken";

/// Write the attempt log as a flat CSV for spreadsheet users. One-way only;
/// CSV is never imported back.
pub fn write_csv_export(path: &Path, attempts: &[Attempt]) -> Result<()> {
    let mut out = String::with_capacity(attempts.len() * 64 + CSV_HEADER.len());
    out.push_str(CSV_HEADER);
    out.push('\n');
    for attempt in attempts {
        let timestamp = attempt
            .timestamp
            .map(|ts| ts.to_rfc3339())
            .unwrap_or_default();
        out.push_str(&format!(
            "{},{},{},{},{},{},{},{},{}\n",
            attempt.id,
            csv_field(&timestamp),
            attempt.operation.as_str(),
            attempt.digits,
            csv_field(&attempt.question_text),
            csv_field(&attempt.user_answer),
            attempt.correct_answer,
            attempt.correct,
            attempt.time_taken,
        ));
    }
    fs::write(path, out)?;
    Ok(())
}

/// Minimal CSV quoting: wrap in quotes when the field contains a delimiter,
/// quote, or newline, doubling embedded quotes.
fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
