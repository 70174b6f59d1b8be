use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::AnalysisError;

/// What the analysis should concentrate on. Each focus selects exactly one
/// prompt template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnalysisFocus {
    AssetManagement,
    Procurement,
    DemandResponse,
    NextBestActions,
}

impl AnalysisFocus {
    pub const ALL: [AnalysisFocus; 4] = [
        AnalysisFocus::AssetManagement,
        AnalysisFocus::Procurement,
        AnalysisFocus::DemandResponse,
        AnalysisFocus::NextBestActions,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            AnalysisFocus::AssetManagement => "asset-management",
            AnalysisFocus::Procurement => "procurement",
            AnalysisFocus::DemandResponse => "demand-response",
            AnalysisFocus::NextBestActions => "next-best-actions",
        }
    }

    pub fn label(&self) -> &str {
        match self {
            AnalysisFocus::AssetManagement => "Asset Management",
            AnalysisFocus::Procurement => "Procurement",
            AnalysisFocus::DemandResponse => "Demand Response",
            AnalysisFocus::NextBestActions => "Next Best Actions",
        }
    }
}

impl fmt::Display for AnalysisFocus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AnalysisFocus {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // "Asset Management", "asset_management" and "asset-management" all match
        let key: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect();
        match key.as_str() {
            "assetmanagement" | "asset" | "assets" => Ok(AnalysisFocus::AssetManagement),
            "procurement" | "procure" => Ok(AnalysisFocus::Procurement),
            "demandresponse" | "dr" => Ok(AnalysisFocus::DemandResponse),
            "nextbestactions" | "nextbestaction" | "nba" => Ok(AnalysisFocus::NextBestActions),
            _ => Err(AnalysisError::UnknownFocus(s.to_string())),
        }
    }
}
