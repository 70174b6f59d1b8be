//! energy-analyst - LLM-assisted analysis of building energy spreadsheets
//!
//! Ingests a CSV or spreadsheet of energy usage/cost data, detects the date,
//! usage, cost and site columns, sorts the rows by date, and composes a
//! deterministic prompt (fixed template per analysis focus plus a bounded CSV
//! sample) for an external text-generation service. Supports OpenAI,
//! OpenAI-compatible, Anthropic and Gemini providers.

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod error;
pub mod focus;
pub mod llm;
pub mod pipeline;
pub mod session;
pub mod table;
pub mod util;

pub use error::AnalysisError;
pub use focus::AnalysisFocus;
pub use pipeline::{compose, compose_named, detect_roles, ingest, sample, ColumnRoles, RequestPayload};
pub use session::Session;
pub use table::{Cell, Table};
