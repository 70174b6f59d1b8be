pub mod analyze;
pub mod preview;
pub mod prompt;

use std::fs;
use std::path::Path;
use std::str::FromStr;

use anyhow::{bail, Context, Result};

use crate::config::Config;
use crate::focus::AnalysisFocus;
use crate::session::Session;

/// Read `path` and load it into a fresh session.
pub(crate) fn load_session(path: &str) -> Result<Session> {
    let file = Path::new(path);
    if !file.exists() {
        bail!("File not found: {}", path);
    }
    if !file.is_file() {
        bail!("Path is not a file: {}", path);
    }

    let bytes = fs::read(file).with_context(|| format!("failed to read {}", path))?;
    let filename = file
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(path)
        .to_string();

    let mut session = Session::new();
    session
        .load(&bytes, &filename)
        .with_context(|| format!("failed to load {}", path))?;
    Ok(session)
}

/// Focus from the command line, falling back to the configured default.
pub(crate) fn resolve_focus(focus: Option<String>, config: &Config) -> Result<AnalysisFocus> {
    match focus {
        Some(name) => Ok(AnalysisFocus::from_str(&name)?),
        None => config.analysis.get_default_focus(),
    }
}
