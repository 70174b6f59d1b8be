use anyhow::Result;
use tracing::info;

use crate::config::Config;
use crate::llm::factory;

#[allow(clippy::too_many_arguments)]
pub async fn run(
    path: String,
    focus: Option<String>,
    max_rows: Option<usize>,
    config_path: Option<String>,
    provider_override: Option<String>,
    model_override: Option<String>,
    base_url_override: Option<String>,
    dry_run: bool,
) -> Result<()> {
    let mut config = Config::load_with_path(config_path)?;

    // Apply CLI overrides
    if let Some(ref provider) = provider_override {
        info!("CLI override: provider = {}", provider);
        config.llm.provider = provider.clone();
    }
    if let Some(ref model) = model_override {
        info!("CLI override: model = {}", model);
        config.llm.model = model.clone();
    }
    if let Some(ref base_url) = base_url_override {
        info!("CLI override: base_url = {}", base_url);
        config.llm.base_url = Some(base_url.clone());
    }

    let focus = super::resolve_focus(focus, &config)?;
    let max_rows = max_rows.unwrap_or(config.analysis.max_rows);
    info!("File: {}", path);
    info!("Focus: {}", focus);
    info!("Max rows: {}", max_rows);
    info!("Dry run: {}", dry_run);

    let mut session = super::load_session(&path)?;
    let client = factory::create_client(&config, dry_run)?;

    info!(
        "Requesting {} analysis from {}/{}",
        focus, config.llm.provider, config.llm.model
    );
    let analysis = session.analyze(client.as_ref(), focus, max_rows).await?;

    println!("{}", analysis.response);
    Ok(())
}
