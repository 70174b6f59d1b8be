//! Chart-ready group-by sums derived from a table and its column roles.
//!
//! Each aggregate returns `None` when a role it needs did not resolve.
//! Cells that are empty or not numeric do not contribute to a sum.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use anyhow::bail;
use chrono::NaiveDateTime;
use serde::Serialize;

use crate::pipeline::normalizer::parse_date;
use crate::pipeline::roles::ColumnRoles;
use crate::table::{Cell, Table};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeBucket {
    Day,
    Month,
    Year,
}

impl TimeBucket {
    fn key(&self, dt: &NaiveDateTime) -> String {
        match self {
            TimeBucket::Day => dt.format("%Y-%m-%d").to_string(),
            TimeBucket::Month => dt.format("%Y-%m").to_string(),
            TimeBucket::Year => dt.format("%Y").to_string(),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TimeBucket::Day => "day",
            TimeBucket::Month => "month",
            TimeBucket::Year => "year",
        }
    }
}

impl fmt::Display for TimeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeBucket {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "day" | "daily" | "d" => Ok(TimeBucket::Day),
            "month" | "monthly" | "m" => Ok(TimeBucket::Month),
            "year" | "yearly" | "annual" | "y" => Ok(TimeBucket::Year),
            _ => bail!("Unknown time bucket: {}", s),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CostUsage {
    pub usage: f64,
    pub cost: f64,
}

fn date_of(cell: &Cell) -> Option<NaiveDateTime> {
    match cell {
        Cell::Date(dt) => Some(*dt),
        Cell::Text(s) => parse_date(s),
        _ => None,
    }
}

fn group_key(cell: &Cell) -> Option<String> {
    match cell {
        Cell::Empty => None,
        other => Some(other.to_string()),
    }
}

/// Total usage per time bucket, keyed `YYYY-MM-DD`, `YYYY-MM` or `YYYY`.
pub fn usage_by_period(
    table: &Table,
    roles: &ColumnRoles,
    bucket: TimeBucket,
) -> Option<BTreeMap<String, f64>> {
    let date_idx = table.column_index(roles.date.as_deref()?)?;
    let usage_idx = table.column_index(roles.usage.as_deref()?)?;

    let mut totals = BTreeMap::new();
    for row in table.rows() {
        let (Some(dt), Some(usage)) = (date_of(&row[date_idx]), row[usage_idx].as_f64()) else {
            continue;
        };
        *totals.entry(bucket.key(&dt)).or_insert(0.0) += usage;
    }
    Some(totals)
}

/// Total usage per site.
pub fn usage_by_site(table: &Table, roles: &ColumnRoles) -> Option<BTreeMap<String, f64>> {
    let site_idx = table.column_index(roles.site.as_deref()?)?;
    let usage_idx = table.column_index(roles.usage.as_deref()?)?;

    let mut totals = BTreeMap::new();
    for row in table.rows() {
        let (Some(site), Some(usage)) = (group_key(&row[site_idx]), row[usage_idx].as_f64()) else {
            continue;
        };
        *totals.entry(site).or_insert(0.0) += usage;
    }
    Some(totals)
}

/// Usage and cost totals per site, for a cost-versus-usage chart.
pub fn cost_vs_usage_by_site(
    table: &Table,
    roles: &ColumnRoles,
) -> Option<BTreeMap<String, CostUsage>> {
    let site_idx = table.column_index(roles.site.as_deref()?)?;
    let usage_idx = table.column_index(roles.usage.as_deref()?)?;
    let cost_idx = table.column_index(roles.cost.as_deref()?)?;

    let mut totals: BTreeMap<String, CostUsage> = BTreeMap::new();
    for row in table.rows() {
        let Some(site) = group_key(&row[site_idx]) else {
            continue;
        };
        let entry = totals.entry(site).or_default();
        if let Some(usage) = row[usage_idx].as_f64() {
            entry.usage += usage;
        }
        if let Some(cost) = row[cost_idx].as_f64() {
            entry.cost += cost;
        }
    }
    Some(totals)
}
