//! In-memory tabular data shared by every pipeline stage.
//!
//! A [`Table`] is a header plus rows of [`Cell`]s. Every row has exactly one
//! cell per column; [`Table::new`] enforces that, so downstream code can index
//! rows by column position without bounds juggling.

use std::fmt;

use chrono::{NaiveDateTime, NaiveTime};
use serde::Serialize;

use crate::error::AnalysisError;

const PREVIEW_MAX_WIDTH: usize = 40;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Number(f64),
    Date(NaiveDateTime),
    Empty,
}

impl Cell {
    /// Build a cell from raw text, mapping the empty string to [`Cell::Empty`].
    pub fn from_text(s: &str) -> Self {
        if s.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(s.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Numeric value of the cell, if it has one.
    ///
    /// Text is parsed after trimming and dropping thousands separators, so
    /// `" 1,250.5 "` yields `1250.5`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            Cell::Text(s) => {
                let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
                if cleaned.is_empty() {
                    return None;
                }
                cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
            }
            Cell::Date(_) | Cell::Empty => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Date(dt) => {
                if dt.time() == NaiveTime::MIN {
                    write!(f, "{}", dt.format("%Y-%m-%d"))
                } else {
                    write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S"))
                }
            }
            Cell::Empty => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Create a table, rejecting any row whose width differs from the header.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Result<Self, AnalysisError> {
        if let Some((idx, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != columns.len())
        {
            return Err(AnalysisError::parse(
                "table",
                format!(
                    "row {} has {} cells, expected {}",
                    idx + 1,
                    row.len(),
                    columns.len()
                ),
            ));
        }
        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell at `row` in the column called `column`.
    pub fn cell(&self, row: usize, column: &str) -> Option<&Cell> {
        let idx = self.column_index(column)?;
        self.rows.get(row).map(|r| &r[idx])
    }

    /// All cells of one column, top to bottom.
    pub fn column_values<'a>(&'a self, column: &str) -> Option<impl Iterator<Item = &'a Cell>> {
        let idx = self.column_index(column)?;
        Some(self.rows.iter().map(move |r| &r[idx]))
    }

    /// First `n` rows as a new table.
    pub fn head(&self, n: usize) -> Table {
        Table {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    /// Reorder rows by a permutation of row indices. Values are untouched.
    pub(crate) fn reorder(&mut self, order: &[usize]) {
        debug_assert_eq!(order.len(), self.rows.len());
        let mut taken: Vec<Option<Vec<Cell>>> = self.rows.drain(..).map(Some).collect();
        self.rows = order.iter().filter_map(|&i| taken[i].take()).collect();
    }

    /// Render as CSV: header line then one line per row, `\n`-terminated.
    ///
    /// Fields are quoted only when they contain a comma, a quote or a line
    /// break. Cells are stringified through [`Cell`]'s `Display`.
    pub fn to_csv(&self) -> Result<String, AnalysisError> {
        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        writer
            .write_record(&self.columns)
            .map_err(|e| AnalysisError::Render(e.to_string()))?;
        for row in &self.rows {
            writer
                .write_record(row.iter().map(|c| c.to_string()))
                .map_err(|e| AnalysisError::Render(e.to_string()))?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| AnalysisError::Render(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| AnalysisError::Render(e.to_string()))
    }

    /// Fixed-width text grid of the first `n` rows for terminal display.
    pub fn preview(&self, n: usize) -> String {
        let shown: Vec<Vec<String>> = self
            .rows
            .iter()
            .take(n)
            .map(|row| row.iter().map(|c| clip(&c.to_string())).collect())
            .collect();
        let header: Vec<String> = self.columns.iter().map(|c| clip(c)).collect();

        let widths: Vec<usize> = header
            .iter()
            .enumerate()
            .map(|(i, h)| {
                shown
                    .iter()
                    .map(|r| r[i].chars().count())
                    .chain(std::iter::once(h.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut out = String::new();
        push_line(&mut out, &header, &widths);
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        push_line(&mut out, &rule, &widths);
        for row in &shown {
            push_line(&mut out, row, &widths);
        }
        if self.rows.len() > n {
            out.push_str(&format!("... {} more row(s)\n", self.rows.len() - n));
        }
        out
    }
}

fn clip(s: &str) -> String {
    if s.chars().count() <= PREVIEW_MAX_WIDTH {
        return s.to_string();
    }
    let mut clipped: String = s.chars().take(PREVIEW_MAX_WIDTH - 1).collect();
    clipped.push('…');
    clipped
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(c, w)| format!("{:<width$}", c, width = *w))
        .collect();
    out.push_str(padded.join(" | ").trim_end());
    out.push('\n');
}
