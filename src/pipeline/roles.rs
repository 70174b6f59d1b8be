use serde::Serialize;

use crate::table::Table;

const DATE_ALIASES: &[&str] = &["date"];
const USAGE_ALIASES: &[&str] = &["usage"];
const COST_ALIASES: &[&str] = &["cost"];
const SITE_ALIASES: &[&str] = &["building", "site", "location"];

/// Best-effort mapping from semantic role to the column that fills it.
///
/// A `None` role means the feature relying on it is unavailable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColumnRoles {
    pub date: Option<String>,
    pub usage: Option<String>,
    pub cost: Option<String>,
    pub site: Option<String>,
}

impl ColumnRoles {
    pub fn is_empty(&self) -> bool {
        self.date.is_none() && self.usage.is_none() && self.cost.is_none() && self.site.is_none()
    }
}

/// Resolve each role against the table's column names.
pub fn detect_roles(table: &Table) -> ColumnRoles {
    let columns = table.columns();
    ColumnRoles {
        date: match_column(columns, DATE_ALIASES),
        usage: match_column(columns, USAGE_ALIASES),
        cost: match_column(columns, COST_ALIASES),
        site: match_column(columns, SITE_ALIASES),
    }
}

/// Case-insensitive match. A column equal to an alias wins over one that
/// only contains it; otherwise the first containing column wins.
fn match_column(columns: &[String], aliases: &[&str]) -> Option<String> {
    let lowered: Vec<String> = columns.iter().map(|c| c.trim().to_lowercase()).collect();

    let exact = lowered
        .iter()
        .position(|name| aliases.iter().any(|a| name == a));
    let contains = || {
        lowered
            .iter()
            .position(|name| aliases.iter().any(|a| name.contains(a)))
    };

    exact.or_else(contains).map(|idx| columns[idx].clone())
}
