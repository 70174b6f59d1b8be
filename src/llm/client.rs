use anyhow::Result;
use async_trait::async_trait;

use crate::pipeline::RequestPayload;

#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send one system + user instruction pair and return the completion text.
    async fn complete(&self, payload: &RequestPayload) -> Result<String>;
}

pub struct MockLlmClient;

impl Default for MockLlmClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockLlmClient {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, payload: &RequestPayload) -> Result<String> {
        // Only the instruction part identifies the template; the data block
        // is user content and may contain anything
        let (prompt, rows) = match payload.user().split_once("Data:\n") {
            Some((instruction, data)) => (instruction, data.lines().count().saturating_sub(1)),
            None => (payload.user(), 0),
        };

        let body = if prompt.contains("portfolio asset manager") {
            "## Asset Management Review\n\n\
             - Usage is concentrated in a small number of buildings.\n\
             - No clear degradation trend is visible in the sample.\n\
             - Consider a controls retro-commissioning study for the highest consumer."
        } else if prompt.contains("energy procurement team") {
            "## Procurement Summary\n\n\
             - Spend tracks consumption closely across the period.\n\
             - Baseload is stable, which favours a fixed-price block.\n\
             - Review contract timing ahead of the next seasonal peak."
        } else if prompt.contains("demand response potential") {
            "## Demand Response Assessment\n\n\
             - Peaks cluster in a few periods.\n\
             - Pre-cooling and staggered equipment start-up can shift load.\n\
             - Interval data would be needed to size the opportunity precisely."
        } else if prompt.contains("prioritized action plan") {
            "## Next Best Actions\n\n\
             1. Tune HVAC schedules at the largest site.\n\
             2. Audit lighting controls.\n\
             3. Reconcile invoices against metered usage.\n\
             4. Set up monthly usage alerts.\n\
             5. Collect interval data for demand analysis."
        } else {
            "No analysis available for this request."
        };

        Ok(format!("{}\n\n(mock response, {} data rows received)", body, rows))
    }
}
