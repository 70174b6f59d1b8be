//! Build the request payload for the text-generation service.
//!
//! Composition is a pure function of (table, focus, row bound): the same
//! inputs always produce a byte-identical payload.

use std::str::FromStr;

use serde::Serialize;
use tracing::debug;

use super::ingest::sample;
use crate::error::AnalysisError;
use crate::focus::AnalysisFocus;
use crate::llm::prompts;
use crate::table::Table;

/// System and user instructions for one analysis request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestPayload {
    system: String,
    user: String,
}

impl RequestPayload {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
        }
    }

    pub fn system(&self) -> &str {
        &self.system
    }

    pub fn user(&self) -> &str {
        &self.user
    }
}

/// Render the first `max_rows` rows of `table` into the template for `focus`.
pub fn compose(
    table: &Table,
    focus: AnalysisFocus,
    max_rows: usize,
) -> Result<RequestPayload, AnalysisError> {
    let sampled = sample(table, max_rows);
    let data = sampled.to_csv()?;

    debug!(
        "Composing {} prompt from {} of {} rows ({} bytes of data)",
        focus.as_str(),
        sampled.len(),
        table.len(),
        data.len()
    );

    Ok(RequestPayload::new(
        prompts::SYSTEM_INSTRUCTION,
        prompts::render(focus, &data),
    ))
}

/// [`compose`] with the focus given by name, as it arrives from the interface.
pub fn compose_named(
    table: &Table,
    focus: &str,
    max_rows: usize,
) -> Result<RequestPayload, AnalysisError> {
    let focus = AnalysisFocus::from_str(focus)?;
    compose(table, focus, max_rows)
}
