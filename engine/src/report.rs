//! Report emission module.
//!
//! This module provides:
//! - The report table handed over by a finalized run ([`Report`])
//! - Format selection from configuration tokens ([`ReportFormat`])
//! - Writers for every supported format ([`write_report`])
//!
//! A report is an ordered list of named columns of equal length. Column
//! order is meaningful and preserved by every writer; all cell values are
//! strings.

use std::fs;
use std::path::PathBuf;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::EngineError;

/// One named column of the report table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportColumn {
    /// Column name, used as CSV/tab header, JSON/YAML key and XML tag
    pub name: String,
    /// Cell values, one per input file, in row order
    pub values: Vec<String>,
}

/// The finalized report table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    /// Columns in emission order
    pub columns: Vec<ReportColumn>,
}

impl Report {
    /// Append a column at the end of the table.
    pub fn push_column(&mut self, name: &str, values: Vec<String>) {
        self.columns.push(ReportColumn {
            name: name.to_string(),
            values,
        });
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&ReportColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Number of rows (length of every column).
    pub fn row_count(&self) -> usize {
        self.columns.first().map(|c| c.values.len()).unwrap_or(0)
    }
}

impl Serialize for Report {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // Serialized as a map to keep column order in the output
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for column in &self.columns {
            map.serialize_entry(&column.name, &column.values)?;
        }
        map.end()
    }
}

/// A requested report output format.
///
/// The six known tokens map to dedicated writers; anything else is kept as
/// a literal file extension for a tab-delimited rendering, so format
/// parsing never fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportFormat {
    Csv,
    Json,
    Pickle,
    Text,
    Yaml,
    Xml,
    Custom(String),
}

impl ReportFormat {
    /// Map a configuration token to a format. Known tokens are matched
    /// case-insensitively; unknown ones are carried through verbatim.
    pub fn parse(token: &str) -> ReportFormat {
        let trimmed = token.trim();
        match trimmed.to_lowercase().as_str() {
            "csv" => Self::Csv,
            "json" => Self::Json,
            "pkl" => Self::Pickle,
            "txt" => Self::Text,
            "yaml" => Self::Yaml,
            "xml" => Self::Xml,
            _ => Self::Custom(trimmed.to_string()),
        }
    }

    /// The file extension this format is written under.
    pub fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Pickle => "pkl",
            Self::Text => "txt",
            Self::Yaml => "yaml",
            Self::Xml => "xml",
            Self::Custom(ext) => ext,
        }
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// Write the report once per requested format, at
/// `<base_name>.<extension>`.
///
/// # Returns
/// The paths written, in request order.
///
/// # Errors
/// Returns `EngineError::ReportEncode` if a serializer rejects the table
/// and `EngineError::ReportWrite` if a file cannot be written. Both are
/// fatal: the report is the product of the run.
pub fn write_report(
    report: &Report,
    base_name: &str,
    formats: &[ReportFormat],
) -> Result<Vec<PathBuf>, EngineError> {
    let mut written = Vec::with_capacity(formats.len());

    for format in formats {
        let path = PathBuf::from(format!("{}.{}", base_name, format.extension()));
        let bytes = render(report, format)?;

        fs::write(&path, bytes).map_err(|e| EngineError::ReportWrite {
            path: path.clone(),
            source: e,
        })?;

        tracing::debug!(path = %path.display(), "Wrote report");
        written.push(path);
    }

    Ok(written)
}

fn render(report: &Report, format: &ReportFormat) -> Result<Vec<u8>, EngineError> {
    let encode_err = |message: String| EngineError::ReportEncode {
        format: format.extension().to_string(),
        message,
    };

    let bytes = match format {
        ReportFormat::Json => serde_json::to_string_pretty(report)
            .map_err(|e| encode_err(e.to_string()))?
            .into_bytes(),
        ReportFormat::Yaml => serde_yaml::to_string(report)
            .map_err(|e| encode_err(e.to_string()))?
            .into_bytes(),
        ReportFormat::Pickle => {
            bincode::serialize(report).map_err(|e| encode_err(e.to_string()))?
        }
        ReportFormat::Csv => render_delimited(report, ",", true).into_bytes(),
        ReportFormat::Xml => render_xml(report).into_bytes(),
        ReportFormat::Text | ReportFormat::Custom(_) => {
            render_delimited(report, "\t", false).into_bytes()
        }
    };

    Ok(bytes)
}

fn csv_escape(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn render_delimited(report: &Report, delimiter: &str, quote: bool) -> String {
    let cell = |value: &str| {
        if quote {
            csv_escape(value)
        } else {
            value.to_string()
        }
    };

    let mut out = String::new();
    let header: Vec<String> = report.columns.iter().map(|c| cell(&c.name)).collect();
    out.push_str(&header.join(delimiter));
    out.push('\n');

    for row in 0..report.row_count() {
        let cells: Vec<String> = report
            .columns
            .iter()
            .map(|c| cell(&c.values[row]))
            .collect();
        out.push_str(&cells.join(delimiter));
        out.push('\n');
    }

    out
}

fn xml_escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn render_xml(report: &Report) -> String {
    let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<report>\n");

    for row in 0..report.row_count() {
        out.push_str("  <file>\n");
        for column in &report.columns {
            out.push_str(&format!(
                "    <{}>{}</{}>\n",
                column.name,
                xml_escape(&column.values[row]),
                column.name
            ));
        }
        out.push_str("  </file>\n");
    }

    out.push_str("</report>\n");
    out
}
