// 🏗️ Statement Reader - Tabular rows → LineItems
// Columns are positional: name, value, type. Header names are ignored.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::statement::LineItem;

// ============================================================================
// CORE TYPES
// ============================================================================

/// Input format, detected from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Csv,
    Tsv,
}

impl InputFormat {
    pub fn delimiter(&self) -> u8 {
        match self {
            InputFormat::Csv => b',',
            InputFormat::Tsv => b'\t',
        }
    }
}

/// Why a row was rejected before classification
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RowError {
    #[error("missing {column} column")]
    MissingColumn { column: String },

    #[error("value {value:?} is not a finite number")]
    InvalidValue { value: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowIssue {
    /// 1-based line in the source (header is line 1)
    pub line: usize,
    pub error: RowError,
}

/// Result of reading one table: good rows plus per-row diagnostics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowImport {
    pub items: Vec<LineItem>,
    pub issues: Vec<RowIssue>,
}

impl RowImport {
    pub fn total_rows(&self) -> usize {
        self.items.len() + self.issues.len()
    }
}

// ============================================================================
// READER TRAIT
// ============================================================================

/// Source of statement rows. The engine only needs `name, value, type` triples.
pub trait StatementReader {
    fn read(&self, input: &mut dyn Read) -> Result<RowImport>;

    fn format(&self) -> InputFormat;
}

pub struct DelimitedReader {
    format: InputFormat,
}

impl DelimitedReader {
    pub fn new(format: InputFormat) -> Self {
        DelimitedReader { format }
    }

    pub fn csv() -> Self {
        Self::new(InputFormat::Csv)
    }
}

impl Default for DelimitedReader {
    fn default() -> Self {
        Self::csv()
    }
}

impl StatementReader for DelimitedReader {
    fn read(&self, input: &mut dyn Read) -> Result<RowImport> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .delimiter(self.format.delimiter())
            .from_reader(input);

        let mut import = RowImport::default();

        for (idx, result) in reader.records().enumerate() {
            let record = result.with_context(|| format!("Failed to read row {}", idx + 2))?;
            let line = record
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(idx + 2);

            match parse_record(&record) {
                Ok(item) => {
                    debug!(line, name = %item.name, value = item.value, "row accepted");
                    import.items.push(item);
                }
                Err(error) => {
                    warn!(line, %error, "skipping malformed row");
                    import.issues.push(RowIssue { line, error });
                }
            }
        }

        info!(
            rows = import.total_rows(),
            accepted = import.items.len(),
            rejected = import.issues.len(),
            "statement rows loaded"
        );

        Ok(import)
    }

    fn format(&self) -> InputFormat {
        self.format
    }
}

fn parse_record(record: &csv::StringRecord) -> std::result::Result<LineItem, RowError> {
    let column = |i: usize, name: &str| {
        record.get(i).ok_or_else(|| RowError::MissingColumn {
            column: name.to_string(),
        })
    };

    let name = column(0, "name")?;
    if name.is_empty() {
        return Err(RowError::MissingColumn {
            column: "name".to_string(),
        });
    }
    let value = parse_value(column(1, "value")?)?;
    let raw_type = column(2, "type")?;

    Ok(LineItem::new(name, value, raw_type))
}

/// Numeric coercion for the value column
pub fn parse_value(text: &str) -> std::result::Result<f64, RowError> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| RowError::InvalidValue {
            value: text.to_string(),
        })
}

// ============================================================================
// FILE HELPERS
// ============================================================================

/// Detect format from extension
pub fn detect_format(file_path: &Path) -> Result<InputFormat> {
    let extension = file_path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "csv" | "txt" => Ok(InputFormat::Csv),
        "tsv" => Ok(InputFormat::Tsv),
        "xlsx" | "xls" => bail!(
            "Excel workbooks are not supported: export {} as CSV",
            file_path.display()
        ),
        _ => bail!("Unknown statement format: {}", file_path.display()),
    }
}

/// Open and read a statement file
pub fn load_rows(file_path: &Path) -> Result<RowImport> {
    let reader = DelimitedReader::new(detect_format(file_path)?);
    let mut file = File::open(file_path)
        .with_context(|| format!("Failed to open file: {}", file_path.display()))?;

    info!(path = %file_path.display(), format = ?reader.format(), "reading statement");
    reader
        .read(&mut file)
        .with_context(|| format!("Failed to parse {}", file_path.display()))
}

/// Example statement offered to users as a starting point
pub const TEMPLATE_ROWS: [(&str, &str, &str); 5] = [
    ("iPhone", "46.2", "Revenue"),
    ("Services", "25.0", "Revenue"),
    ("Cost of Sales", "51.0", "COGS"),
    ("R&D", "8.3", "Expense"),
    ("Tax", "13.8", "Expense"),
];

/// Write the template CSV (`Name,Value,Type` header)
pub fn write_template<W: Write>(writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["Name", "Value", "Type"])?;
    for (name, value, kind) in TEMPLATE_ROWS {
        wtr.write_record([name, value, kind])?;
    }
    wtr.flush().context("Failed to write template")?;
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
