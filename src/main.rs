use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use energy_analyst::cli;

#[derive(Parser)]
#[command(name = "energy-analyst", version)]
#[command(
    about = "Preview building energy data and get LLM-written analysis of it",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show detected columns, the first rows and chart totals for a file
    Preview {
        /// CSV or spreadsheet file (.csv, .xlsx, .xlsm, .xlsb, .xls, .ods)
        file: String,

        /// Number of rows to show (default: from config)
        #[arg(long)]
        rows: Option<usize>,

        /// Time bucket for usage totals: day, month, year
        #[arg(long)]
        bucket: Option<String>,

        /// Path to config file (defaults to ./energy-analyst.toml or ~/.config/energy-analyst/config.toml)
        #[arg(long)]
        config: Option<String>,
    },

    /// Print the request that `analyze` would send, without sending it
    Prompt {
        /// CSV or spreadsheet file
        file: String,

        /// Analysis focus: asset-management, procurement, demand-response, next-best-actions
        #[arg(long)]
        focus: Option<String>,

        /// Rows of data to include in the prompt (default: from config)
        #[arg(long)]
        max_rows: Option<usize>,

        /// Print the payload as JSON
        #[arg(long)]
        json: bool,

        /// Path to config file
        #[arg(long)]
        config: Option<String>,
    },

    /// Send the data sample to the configured LLM and print its analysis
    Analyze {
        /// CSV or spreadsheet file
        file: String,

        /// Analysis focus: asset-management, procurement, demand-response, next-best-actions
        #[arg(long)]
        focus: Option<String>,

        /// Rows of data to include in the prompt (default: from config)
        #[arg(long)]
        max_rows: Option<usize>,

        /// Path to config file
        #[arg(long)]
        config: Option<String>,

        /// Override LLM provider (openai, openai-compatible, anthropic, gemini)
        #[arg(long)]
        provider: Option<String>,

        /// Override LLM model (e.g., "gpt-4o", "claude-sonnet-4-20250514")
        #[arg(long)]
        model: Option<String>,

        /// Override API base URL (for OpenAI-compatible servers)
        #[arg(long)]
        base_url: Option<String>,

        /// Use mock LLM client instead of calling a provider
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout carries only the analysis
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Preview {
            file,
            rows,
            bucket,
            config,
        } => {
            cli::preview::run(file, rows, bucket, config)?;
        }
        Commands::Prompt {
            file,
            focus,
            max_rows,
            json,
            config,
        } => {
            cli::prompt::run(file, focus, max_rows, json, config)?;
        }
        Commands::Analyze {
            file,
            focus,
            max_rows,
            config,
            provider,
            model,
            base_url,
            dry_run,
        } => {
            cli::analyze::run(
                file, focus, max_rows, config, provider, model, base_url, dry_run,
            )
            .await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_parse_analyze_defaults() {
        let cli = Cli::try_parse_from(["energy-analyst", "analyze", "usage.csv"]).unwrap();
        match cli.command {
            Commands::Analyze {
                file,
                focus,
                max_rows,
                dry_run,
                ..
            } => {
                assert_eq!(file, "usage.csv");
                assert!(focus.is_none());
                assert!(max_rows.is_none());
                assert!(!dry_run);
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_parse_analyze_with_all_args() {
        let cli = Cli::try_parse_from([
            "energy-analyst",
            "analyze",
            "usage.xlsx",
            "--focus",
            "demand-response",
            "--max-rows",
            "25",
            "--provider",
            "openai-compatible",
            "--model",
            "llama3",
            "--base-url",
            "http://localhost:11434/v1",
            "--config",
            "my.toml",
            "--dry-run",
        ])
        .unwrap();
        match cli.command {
            Commands::Analyze {
                file,
                focus,
                max_rows,
                config,
                provider,
                model,
                base_url,
                dry_run,
            } => {
                assert_eq!(file, "usage.xlsx");
                assert_eq!(focus.unwrap(), "demand-response");
                assert_eq!(max_rows, Some(25));
                assert_eq!(config.unwrap(), "my.toml");
                assert_eq!(provider.unwrap(), "openai-compatible");
                assert_eq!(model.unwrap(), "llama3");
                assert_eq!(base_url.unwrap(), "http://localhost:11434/v1");
                assert!(dry_run);
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_parse_preview() {
        let cli = Cli::try_parse_from([
            "energy-analyst",
            "preview",
            "usage.csv",
            "--rows",
            "5",
            "--bucket",
            "year",
        ])
        .unwrap();
        match cli.command {
            Commands::Preview {
                file, rows, bucket, ..
            } => {
                assert_eq!(file, "usage.csv");
                assert_eq!(rows, Some(5));
                assert_eq!(bucket.unwrap(), "year");
            }
            _ => panic!("expected preview"),
        }
    }

    #[test]
    fn test_parse_prompt_json() {
        let cli =
            Cli::try_parse_from(["energy-analyst", "prompt", "usage.csv", "--json"]).unwrap();
        match cli.command {
            Commands::Prompt { json, .. } => assert!(json),
            _ => panic!("expected prompt"),
        }
    }

    #[test]
    fn test_parse_missing_file() {
        assert!(Cli::try_parse_from(["energy-analyst", "analyze"]).is_err());
    }

    #[test]
    fn test_parse_missing_subcommand() {
        assert!(Cli::try_parse_from(["energy-analyst"]).is_err());
    }
}
