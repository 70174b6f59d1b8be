use std::collections::BTreeMap;
use std::str::FromStr;

use anyhow::Result;
use tracing::info;

use crate::aggregate::{self, TimeBucket};
use crate::config::Config;
use crate::session::LoadedTable;

pub fn run(
    path: String,
    rows: Option<usize>,
    bucket: Option<String>,
    config_path: Option<String>,
) -> Result<()> {
    let config = Config::load_with_path(config_path)?;
    let rows = rows.unwrap_or(config.analysis.preview_rows);
    let bucket = match bucket {
        Some(b) => TimeBucket::from_str(&b)?,
        None => config.analysis.get_time_bucket()?,
    };
    info!("Previewing {} ({} rows, {} buckets)", path, rows, bucket);

    let session = super::load_session(&path)?;
    if let Some(loaded) = session.loaded() {
        print!("{}", render(loaded, rows, bucket));
    }
    Ok(())
}

fn role_line(name: &str, column: &Option<String>) -> String {
    format!(
        "  {:<6} {}\n",
        name,
        column.as_deref().unwrap_or("(not detected)")
    )
}

fn totals_section(title: &str, totals: Option<BTreeMap<String, f64>>) -> String {
    let mut out = format!("\n{}\n", title);
    match totals {
        Some(map) if !map.is_empty() => {
            for (key, total) in map {
                out.push_str(&format!("  {}: {}\n", key, total));
            }
        }
        Some(_) => out.push_str("  (no numeric values)\n"),
        None => out.push_str("  (unavailable: required columns not detected)\n"),
    }
    out
}

/// Everything `preview` prints for a loaded table.
pub fn render(loaded: &LoadedTable, rows: usize, bucket: TimeBucket) -> String {
    let table = &loaded.table;
    let roles = &loaded.roles;

    let mut out = format!(
        "{}: {} rows x {} columns\n",
        loaded.filename,
        table.len(),
        table.columns().len()
    );
    out.push_str("\nDetected columns:\n");
    out.push_str(&role_line("date", &roles.date));
    out.push_str(&role_line("usage", &roles.usage));
    out.push_str(&role_line("cost", &roles.cost));
    out.push_str(&role_line("site", &roles.site));
    if roles.date.is_some() {
        out.push_str(if loaded.date_sorted {
            "  rows sorted by date\n"
        } else {
            "  date values could not all be parsed; original order kept\n"
        });
    }

    out.push('\n');
    out.push_str(&table.preview(rows));

    out.push_str(&totals_section(
        &format!("Total usage by {}:", bucket),
        aggregate::usage_by_period(table, roles, bucket),
    ));
    out.push_str(&totals_section(
        "Total usage by site:",
        aggregate::usage_by_site(table, roles),
    ));

    out.push_str("\nCost vs usage by site:\n");
    match aggregate::cost_vs_usage_by_site(table, roles) {
        Some(map) => {
            for (site, totals) in map {
                out.push_str(&format!(
                    "  {}: usage {}, cost {}\n",
                    site, totals.usage, totals.cost
                ));
            }
        }
        None => out.push_str("  (unavailable: required columns not detected)\n"),
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Session;

    fn loaded(csv: &[u8]) -> LoadedTable {
        let mut session = Session::new();
        session.load(csv, "energy.csv").unwrap().clone()
    }

    #[test]
    fn test_render_full_table() {
        let loaded = loaded(
            b"Date,Building,Usage_kWh,Cost\n2024-01-02,A,100,20\n2024-01-01,B,150,30\n",
        );
        let out = render(&loaded, 10, TimeBucket::Month);
        assert!(out.starts_with("energy.csv: 2 rows x 4 columns\n"));
        assert!(out.contains("  usage  Usage_kWh\n"));
        assert!(out.contains("rows sorted by date"));
        assert!(out.contains("Total usage by month:\n  2024-01: 250\n"));
        assert!(out.contains("  A: usage 100, cost 20\n"));
        assert!(out.contains("  B: usage 150, cost 30\n"));
    }

    #[test]
    fn test_render_without_roles() {
        let loaded = loaded(b"Meter,kWh\nM1,5\n");
        let out = render(&loaded, 10, TimeBucket::Day);
        assert!(out.contains("  date   (not detected)\n"));
        assert!(out.contains("(unavailable: required columns not detected)"));
        assert!(!out.contains("sorted by date"));
    }

    #[test]
    fn test_render_reports_unsorted_dates() {
        let loaded = loaded(b"Date,Usage\nsoon,1\n2024-01-01,2\n");
        let out = render(&loaded, 10, TimeBucket::Day);
        assert!(out.contains("original order kept"));
    }

    #[test]
    fn test_run_missing_file() {
        let result = run("/tmp/no-such-energy-preview.csv".to_string(), None, None, None);
        assert!(result.is_err());
    }
}
