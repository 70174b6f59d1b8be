//! Turn uploaded file bytes into a [`Table`].
//!
//! The filename extension picks the decoder. CSV text is kept verbatim;
//! spreadsheet cells keep their native number/date types. Once parsed, the
//! table is sorted by its date column when one is detected and every value
//! in it parses.

use std::collections::HashSet;
use std::io::Cursor;
use std::path::Path;

use calamine::{Data, DataType, Ods, Range, Reader, Xls, Xlsb, Xlsx};
use encoding_rs::{Encoding, UTF_8};
use tracing::{debug, info};

use super::normalizer::normalize_dates;
use super::roles::detect_roles;
use crate::error::AnalysisError;
use crate::table::{Cell, Table};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Xlsx,
    Xlsb,
    Xls,
    Ods,
}

impl FileFormat {
    /// Pick the decoder from the filename extension (case-insensitive).
    pub fn from_filename(filename: &str) -> Result<Self, AnalysisError> {
        let ext = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .ok_or_else(|| AnalysisError::UnsupportedFormat(filename.to_string()))?;

        match ext.as_str() {
            "csv" => Ok(FileFormat::Csv),
            "xlsx" | "xlsm" => Ok(FileFormat::Xlsx),
            "xlsb" => Ok(FileFormat::Xlsb),
            "xls" => Ok(FileFormat::Xls),
            "ods" => Ok(FileFormat::Ods),
            _ => Err(AnalysisError::UnsupportedFormat(filename.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            FileFormat::Csv => "CSV",
            FileFormat::Xlsx => "XLSX",
            FileFormat::Xlsb => "XLSB",
            FileFormat::Xls => "XLS",
            FileFormat::Ods => "ODS",
        }
    }
}

/// Parse `bytes` according to `filename`'s extension and date-normalize the
/// result. No partial table is ever returned.
pub fn ingest(bytes: &[u8], filename: &str) -> Result<Table, AnalysisError> {
    let (table, _) = ingest_with_status(bytes, filename)?;
    Ok(table)
}

/// Like [`ingest`], also reporting whether the date sort was applied.
pub fn ingest_with_status(bytes: &[u8], filename: &str) -> Result<(Table, bool), AnalysisError> {
    let format = FileFormat::from_filename(filename)?;
    debug!(
        "Ingesting {} ({} bytes) as {}",
        filename,
        bytes.len(),
        format.as_str()
    );

    let mut table = match format {
        FileFormat::Csv => parse_csv(bytes)?,
        FileFormat::Xlsx => parse_workbook::<Xlsx<Cursor<&[u8]>>>(bytes, format)?,
        FileFormat::Xlsb => parse_workbook::<Xlsb<Cursor<&[u8]>>>(bytes, format)?,
        FileFormat::Xls => parse_workbook::<Xls<Cursor<&[u8]>>>(bytes, format)?,
        FileFormat::Ods => parse_workbook::<Ods<Cursor<&[u8]>>>(bytes, format)?,
    };

    let sorted = match detect_roles(&table).date {
        Some(column) => normalize_dates(&mut table, &column),
        None => false,
    };

    info!(
        "Loaded {}: {} rows x {} columns{}",
        filename,
        table.len(),
        table.columns().len(),
        if sorted { " (sorted by date)" } else { "" }
    );
    Ok((table, sorted))
}

/// First `max_rows` rows of `table`; all of them when it is shorter.
pub fn sample(table: &Table, max_rows: usize) -> Table {
    table.head(max_rows)
}

fn decode_text(bytes: &[u8]) -> Result<String, AnalysisError> {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let (text, had_errors) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        if had_errors {
            return Err(AnalysisError::parse(
                "CSV",
                format!("invalid {} byte sequence", encoding.name()),
            ));
        }
        return Ok(text.into_owned());
    }

    UTF_8
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| text.into_owned())
        .ok_or_else(|| AnalysisError::parse("CSV", "file is not valid UTF-8"))
}

/// Whether `text` ends inside a quoted field. The csv reader accepts that
/// silently and folds every remaining line into the open field.
fn has_unterminated_quote(text: &str) -> bool {
    let mut in_quotes = false;
    let mut field_start = true;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                // "" is an escaped quote inside the field
                if chars.peek() == Some(&'"') {
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            continue;
        }
        match c {
            ',' | '\n' | '\r' => {
                field_start = true;
                continue;
            }
            '"' if field_start => in_quotes = true,
            _ => {}
        }
        field_start = false;
    }

    in_quotes
}

fn parse_csv(bytes: &[u8]) -> Result<Table, AnalysisError> {
    let text = decode_text(bytes)?;
    if has_unterminated_quote(&text) {
        return Err(AnalysisError::parse("CSV", "unterminated quoted field"));
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let header = reader
        .headers()
        .map_err(|e| AnalysisError::parse("CSV", format!("failed to read header: {}", e)))?
        .clone();
    if header.is_empty() {
        return Err(AnalysisError::parse("CSV", "no columns to parse from file"));
    }
    let columns = unique_column_names(header.iter().map(|h| h.to_string()).collect());
    let width = columns.len();

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result.map_err(|e| {
            AnalysisError::parse("CSV", format!("failed to read row {}: {}", idx + 1, e))
        })?;
        if record.len() > width {
            return Err(AnalysisError::parse(
                "CSV",
                format!(
                    "row {} has {} fields, expected {}",
                    idx + 1,
                    record.len(),
                    width
                ),
            ));
        }
        let mut row: Vec<Cell> = record.iter().map(Cell::from_text).collect();
        row.resize(width, Cell::Empty);
        rows.push(row);
    }

    Table::new(columns, rows)
}

/// Read the first worksheet of a workbook.
fn parse_workbook<'a, R>(bytes: &'a [u8], format: FileFormat) -> Result<Table, AnalysisError>
where
    R: Reader<Cursor<&'a [u8]>>,
    R::Error: std::fmt::Display,
{
    let mut workbook = R::new(Cursor::new(bytes)).map_err(|e| {
        AnalysisError::parse(format.as_str(), format!("failed to open workbook: {}", e))
    })?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AnalysisError::parse(format.as_str(), "workbook has no worksheets"))?
        .map_err(|e| {
            AnalysisError::parse(format.as_str(), format!("failed to read worksheet: {}", e))
        })?;

    table_from_range(&range, format)
}

fn spreadsheet_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::from_text(s),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Text(b.to_string()),
        Data::DateTime(_) | Data::DateTimeIso(_) => match data.as_datetime() {
            Some(dt) => Cell::Date(dt),
            None => Cell::from_text(&data.to_string()),
        },
        other => Cell::from_text(&other.to_string()),
    }
}

/// Build a table from a worksheet range: first non-empty row is the header,
/// fully empty rows are dropped.
pub fn table_from_range(range: &Range<Data>, format: FileFormat) -> Result<Table, AnalysisError> {
    let mut rows = range
        .rows()
        .filter(|row| row.iter().any(|c| !matches!(c, Data::Empty)));

    let header = rows
        .next()
        .ok_or_else(|| AnalysisError::parse(format.as_str(), "worksheet is empty"))?;
    let columns = unique_column_names(
        header
            .iter()
            .map(|c| match c {
                Data::Empty => String::new(),
                other => spreadsheet_cell(other).to_string(),
            })
            .collect(),
    );

    let body: Vec<Vec<Cell>> = rows
        .map(|row| row.iter().map(spreadsheet_cell).collect())
        .collect();

    Table::new(columns, body)
}

/// Blank headers become `Unnamed: <idx>`; repeats get `.1`, `.2`, ...
fn unique_column_names(raw: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    raw.into_iter()
        .enumerate()
        .map(|(idx, name)| {
            let base = if name.trim().is_empty() {
                format!("Unnamed: {}", idx)
            } else {
                name
            };
            let mut candidate = base.clone();
            let mut n = 1;
            while !seen.insert(candidate.clone()) {
                candidate = format!("{}.{}", base, n);
                n += 1;
            }
            candidate
        })
        .collect()
}
