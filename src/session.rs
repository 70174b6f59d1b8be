//! Per-user session state owned by the interface layer.
//!
//! The pipeline itself is stateless; a `Session` holds the current table and
//! the most recent analysis between actions. A failed action never touches
//! what the session already holds.

use serde::Serialize;
use tracing::{info, warn};

use crate::error::AnalysisError;
use crate::focus::AnalysisFocus;
use crate::llm::client::LlmClient;
use crate::pipeline::ingest::ingest_with_status;
use crate::pipeline::{compose, detect_roles, ColumnRoles, RequestPayload};
use crate::table::Table;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadedTable {
    pub filename: String,
    pub table: Table,
    pub roles: ColumnRoles,
    /// Whether rows were sorted by the date column.
    pub date_sorted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub focus: AnalysisFocus,
    pub payload: RequestPayload,
    pub response: String,
}

#[derive(Debug, Default)]
pub struct Session {
    loaded: Option<LoadedTable>,
    last_analysis: Option<Analysis>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn loaded(&self) -> Option<&LoadedTable> {
        self.loaded.as_ref()
    }

    pub fn last_analysis(&self) -> Option<&Analysis> {
        self.last_analysis.as_ref()
    }

    /// Ingest a new upload, replacing the current table on success.
    pub fn load(&mut self, bytes: &[u8], filename: &str) -> Result<&LoadedTable, AnalysisError> {
        let (table, date_sorted) = ingest_with_status(bytes, filename)?;
        let roles = detect_roles(&table);
        info!("Detected column roles: {:?}", roles);

        self.last_analysis = None;
        Ok(self.loaded.insert(LoadedTable {
            filename: filename.to_string(),
            table,
            roles,
            date_sorted,
        }))
    }

    /// Build the payload for the loaded table without sending it.
    pub fn compose(
        &self,
        focus: AnalysisFocus,
        max_rows: usize,
    ) -> Result<RequestPayload, AnalysisError> {
        let loaded = self.loaded.as_ref().ok_or(AnalysisError::NoTable)?;
        compose(&loaded.table, focus, max_rows)
    }

    /// Compose and send one analysis request. No retry on failure.
    pub async fn analyze(
        &mut self,
        client: &dyn LlmClient,
        focus: AnalysisFocus,
        max_rows: usize,
    ) -> Result<&Analysis, AnalysisError> {
        let payload = self.compose(focus, max_rows)?;

        let response = client.complete(&payload).await.map_err(|e| {
            warn!("Text generation request failed: {:#}", e);
            AnalysisError::ExternalService(format!("{:#}", e))
        })?;

        Ok(self.last_analysis.insert(Analysis {
            focus,
            payload,
            response,
        }))
    }
}
