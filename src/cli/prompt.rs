use anyhow::{Context, Result};
use tracing::info;

use crate::config::Config;
use crate::pipeline::RequestPayload;

/// Print the payload `analyze` would send, without contacting any service.
pub fn run(
    path: String,
    focus: Option<String>,
    max_rows: Option<usize>,
    json: bool,
    config_path: Option<String>,
) -> Result<()> {
    let config = Config::load_with_path(config_path)?;
    let focus = super::resolve_focus(focus, &config)?;
    let max_rows = max_rows.unwrap_or(config.analysis.max_rows);
    info!("Composing {} prompt for {} (max {} rows)", focus, path, max_rows);

    let session = super::load_session(&path)?;
    let payload = session.compose(focus, max_rows)?;
    println!("{}", render(&payload, json)?);
    Ok(())
}

pub fn render(payload: &RequestPayload, json: bool) -> Result<String> {
    if json {
        return serde_json::to_string_pretty(payload).context("failed to serialize payload");
    }
    Ok(format!(
        "[system]\n{}\n\n[user]\n{}",
        payload.system(),
        payload.user()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_text() {
        let payload = RequestPayload::new("sys", "usr");
        assert_eq!(render(&payload, false).unwrap(), "[system]\nsys\n\n[user]\nusr");
    }

    #[test]
    fn test_render_json() {
        let payload = RequestPayload::new("sys", "line1\nline2");
        let out = render(&payload, true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["system"], "sys");
        assert_eq!(value["user"], "line1\nline2");
    }

    #[test]
    fn test_run_rejects_unknown_focus() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("e.csv");
        std::fs::write(&path, "Building,Usage\nA,1\n").unwrap();
        let result = run(
            path.to_string_lossy().to_string(),
            Some("weather".to_string()),
            None,
            false,
            None,
        );
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Unknown analysis focus"));
    }
}
