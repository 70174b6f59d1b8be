use anyhow::{bail, Result};
use tracing::info;

use super::client::LlmClient;
use super::client::MockLlmClient;
use super::client_impl::{AnthropicClient, GeminiClient, OpenAIClient};
use crate::config::Config;

/// Create an LLM client based on configuration
pub fn create_client(config: &Config, dry_run: bool) -> Result<Box<dyn LlmClient>> {
    if dry_run {
        info!("Dry run: using mock LLM client");
        return Ok(Box::new(MockLlmClient::new()));
    }

    let api_key = config.get_api_key()?;
    let llm = &config.llm;
    let max_tokens = llm.get_max_tokens();

    match llm.provider.as_str() {
        "anthropic" => match &llm.base_url {
            Some(base_url) => Ok(Box::new(AnthropicClient::with_base_url(
                api_key,
                llm.model.clone(),
                base_url.clone(),
                max_tokens,
                llm.timeout_secs,
            )?)),
            None => Ok(Box::new(AnthropicClient::new(
                api_key,
                llm.model.clone(),
                max_tokens,
                llm.timeout_secs,
            )?)),
        },

        "openai" => match &llm.base_url {
            Some(base_url) => Ok(Box::new(OpenAIClient::with_base_url(
                api_key,
                llm.model.clone(),
                base_url.clone(),
                max_tokens,
                llm.timeout_secs,
            )?)),
            None => Ok(Box::new(OpenAIClient::new(
                api_key,
                llm.model.clone(),
                max_tokens,
                llm.timeout_secs,
            )?)),
        },

        "openai-compatible" => {
            let base_url = llm
                .base_url
                .clone()
                .unwrap_or_else(|| "http://localhost:11434/v1".to_string());

            Ok(Box::new(OpenAIClient::with_base_url(
                api_key,
                llm.model.clone(),
                base_url,
                max_tokens,
                llm.timeout_secs,
            )?))
        }

        "gemini" => match &llm.base_url {
            Some(base_url) => Ok(Box::new(GeminiClient::with_base_url(
                api_key,
                llm.model.clone(),
                base_url.clone(),
                max_tokens,
                llm.timeout_secs,
            )?)),
            None => Ok(Box::new(GeminiClient::new(
                api_key,
                llm.model.clone(),
                max_tokens,
                llm.timeout_secs,
            )?)),
        },

        unknown => bail!("Unknown LLM provider: {}", unknown),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    #[test]
    fn test_create_mock_client_for_dry_run() {
        let mut config = Config::default();
        // Dry run must not need a key
        config.llm.api_key_env = Some("ENERGY_ANALYST_FACTORY_NO_SUCH_KEY".to_string());
        create_client(&config, true).unwrap();
    }

    #[test]
    #[serial]
    fn test_create_each_provider() {
        env::set_var("ENERGY_ANALYST_FACTORY_KEY", "test_key");
        for provider in ["openai", "openai-compatible", "anthropic", "gemini"] {
            let mut config = Config::default();
            config.llm.provider = provider.to_string();
            config.llm.api_key_env = Some("ENERGY_ANALYST_FACTORY_KEY".to_string());
            assert!(
                create_client(&config, false).is_ok(),
                "provider {} should build",
                provider
            );
        }
        env::remove_var("ENERGY_ANALYST_FACTORY_KEY");
    }

    #[test]
    #[serial]
    fn test_create_client_with_unknown_provider() {
        env::set_var("ENERGY_ANALYST_FACTORY_KEY", "test_key");
        let mut config = Config::default();
        config.llm.provider = "unknown_provider".to_string();
        config.llm.api_key_env = Some("ENERGY_ANALYST_FACTORY_KEY".to_string());
        let result = create_client(&config, false);
        assert!(result.is_err());
        if let Err(e) = result {
            assert!(e.to_string().contains("Unknown LLM provider"));
        }
        env::remove_var("ENERGY_ANALYST_FACTORY_KEY");
    }

    #[test]
    fn test_create_client_without_api_key() {
        let mut config = Config::default();
        config.llm.api_key_env = Some("ENERGY_ANALYST_NONEXISTENT_KEY_FACTORY_99999".to_string());
        let result = create_client(&config, false);
        assert!(result.is_err());
        if let Err(e) = result {
            assert!(e.to_string().contains("API key not found"));
        }
    }
}
