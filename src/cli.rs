//! CLI argument parsing

use anyhow::{Result, anyhow};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use threadsweep::config::CONFIG_FILE_NAME;
use threadsweep::{Cancelled, Config};
use url::Url;

const EXAMPLES: &str = "\
Examples:
  threadsweep --url http://localhost:9123
  threadsweep --url https://my-server.com --api-key lsv2_pt_abc123
  threadsweep --init-config";

#[derive(Parser, Debug)]
#[command(name = "threadsweep")]
#[command(author, version, about = "Interactive cleanup of threads on a LangGraph server")]
#[command(after_help = EXAMPLES)]
pub struct Cli {
    /// Base URL of your LangGraph server (e.g. http://localhost:9123)
    #[arg(short, long)]
    pub url: Option<String>,

    /// LangSmith API key, sent as X-Api-Key (falls back to LANGSMITH_API_KEY)
    #[arg(short = 'k', long)]
    pub api_key: Option<String>,

    /// Configuration file (default: ./.threadsweep.toml if present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Write a starter configuration file and exit
    #[arg(long)]
    pub init_config: bool,

    /// Overwrite an existing file with --init-config
    #[arg(long, requires = "init_config")]
    pub force: bool,
}

/// Everything the cleanup command needs, after merging flags and config
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
    pub page_size: usize,
    pub review_page_size: usize,
    pub api_key_prefix: String,
}

impl Cli {
    /// Path of the configuration file: `--config`, or the default name in
    /// the current directory
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
    }

    /// Load the configuration file named by `--config`, or the default one
    pub fn load_config(&self) -> Result<Config> {
        match &self.config {
            Some(path) => Config::load_from(path),
            None => Config::load(),
        }
    }

    /// Merge flags, config file and environment into validated settings
    pub fn resolve(&self, config: &Config, env_api_key: Option<String>) -> Result<Settings> {
        let raw_url = config.resolve_url(self.url.clone()).ok_or_else(|| {
            anyhow!(
                "BASE_URL is required\n\n\
                 You must specify the URL of your LangGraph server:\n  \
                 threadsweep --url http://localhost:9123\n\n\
                 For custom server endpoints, you may also need an API key:\n  \
                 threadsweep --url https://my-server.com --api-key lsv2_pt_your_key"
            )
        })?;
        let base_url = validate_base_url(&raw_url)?;

        Ok(Settings {
            base_url,
            api_key: config.resolve_api_key(self.api_key.clone(), env_api_key),
            timeout: Duration::from_secs(config.server.timeout_secs),
            page_size: config.discovery.page_size,
            review_page_size: config.review.page_size,
            api_key_prefix: config.api_key_prefix.clone(),
        })
    }
}

/// Check that `raw` is an absolute URL with a host; returns it without a
/// trailing slash
pub fn validate_base_url(raw: &str) -> Result<String> {
    let invalid = || {
        anyhow!(
            "Invalid BASE_URL format\nProvided: {raw}\n\
             Expected format: http://localhost:9123 or https://my-server.com"
        )
    };

    let parsed = Url::parse(raw).map_err(|_| invalid())?;
    if !parsed.has_host() {
        return Err(invalid());
    }

    Ok(raw.trim_end_matches('/').to_string())
}

/// Warning text when `key` does not look like a LangSmith key
pub fn api_key_warning(key: &str, prefix: &str) -> Option<String> {
    if key.starts_with(prefix) {
        return None;
    }
    let shown: String = key.chars().take(10).collect();
    Some(format!(
        "❌ Warning: API key should start with \"{prefix}\"\n\
         Provided: {shown}...\n\
         LangSmith API keys typically start with \"lsv2_pt_\" or \"lsv2_sk_\"\n"
    ))
}

/// How a finished cleanup run is reported to the operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    /// Input closed at a prompt
    Cancelled,
    Failed(String),
}

impl Outcome {
    pub fn from_result(result: &Result<()>) -> Self {
        match result {
            Ok(()) => Outcome::Completed,
            Err(e) if e.is::<Cancelled>() => Outcome::Cancelled,
            Err(e) => Outcome::Failed(format!("{e:#}")),
        }
    }

    /// Cancellation is a normal end of the session
    pub fn is_success(&self) -> bool {
        !matches!(self, Outcome::Failed(_))
    }

    pub fn exit_code(&self) -> ExitCode {
        if self.is_success() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }

    /// Message to print, if any
    pub fn message(&self) -> Option<String> {
        match self {
            Outcome::Completed => None,
            Outcome::Cancelled => Some("\n\n❌ Operation cancelled by user".to_string()),
            Outcome::Failed(detail) => Some(format!("❌ Fatal error during cleanup: {detail}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("threadsweep").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_parse_short_and_long_flags() {
        let cli = parse(&["-u", "http://localhost:9123", "-k", "lsv2_pt_x"]);
        assert_eq!(cli.url.as_deref(), Some("http://localhost:9123"));
        assert_eq!(cli.api_key.as_deref(), Some("lsv2_pt_x"));

        let cli = parse(&["--url", "https://srv", "--api-key", "k", "--config", "c.toml"]);
        assert_eq!(cli.url.as_deref(), Some("https://srv"));
        assert_eq!(cli.api_key.as_deref(), Some("k"));
        assert_eq!(cli.config, Some(PathBuf::from("c.toml")));
    }

    #[test]
    fn test_help_flag_is_recognised() {
        let err = Cli::try_parse_from(["threadsweep", "-h"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_resolve_requires_url() {
        let cli = parse(&[]);
        let err = cli.resolve(&Config::default(), None).unwrap_err();
        assert!(err.to_string().contains("BASE_URL is required"));
    }

    #[test]
    fn test_resolve_uses_config_url_and_env_key() {
        let cli = parse(&[]);
        let mut config = Config::default();
        config.server.url = Some("http://localhost:9123/".to_string());
        config.review.page_size = 8;

        let settings = cli.resolve(&config, Some("lsv2_env".to_string())).unwrap();

        assert_eq!(settings.base_url, "http://localhost:9123");
        assert_eq!(settings.api_key.as_deref(), Some("lsv2_env"));
        assert_eq!(settings.page_size, 1000);
        assert_eq!(settings.review_page_size, 8);
        assert_eq!(settings.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_validate_base_url() {
        assert_eq!(validate_base_url("http://localhost:9123").unwrap(), "http://localhost:9123");
        assert_eq!(validate_base_url("https://my-server.com/").unwrap(), "https://my-server.com");
        assert!(validate_base_url("localhost:9123").is_err());
        assert!(validate_base_url("not a url").is_err());
        assert!(
            validate_base_url("mailto:ops@example.com")
                .unwrap_err()
                .to_string()
                .contains("Invalid BASE_URL format")
        );
    }

    #[test]
    fn test_api_key_warning() {
        assert!(api_key_warning("lsv2_pt_abc", "lsv2_").is_none());

        let warning = api_key_warning("sk-1234567890abcdef", "lsv2_").unwrap();
        assert!(warning.contains("should start with \"lsv2_\""));
        assert!(warning.contains("Provided: sk-1234567..."));
        assert!(!warning.contains("abcdef"));
    }

    #[test]
    fn test_init_config_flags() {
        let cli = parse(&["--init-config", "--force", "-c", "custom.toml"]);
        assert!(cli.init_config);
        assert!(cli.force);
        assert_eq!(cli.config_path(), PathBuf::from("custom.toml"));

        assert_eq!(parse(&[]).config_path(), PathBuf::from(CONFIG_FILE_NAME));
        assert!(Cli::try_parse_from(["threadsweep", "--force"]).is_err());
    }

    #[test]
    fn test_outcome_cancelled_is_success() {
        let outcome = Outcome::from_result(&Err(Cancelled.into()));

        assert_eq!(outcome, Outcome::Cancelled);
        assert!(outcome.is_success());
        assert!(outcome.message().unwrap().contains("Operation cancelled by user"));
    }

    #[test]
    fn test_outcome_fatal_error_is_failure() {
        let err = anyhow!("Could not find a working threads endpoint");
        let outcome = Outcome::from_result(&Err(err));

        assert!(!outcome.is_success());
        assert_eq!(
            outcome.message().as_deref(),
            Some("❌ Fatal error during cleanup: Could not find a working threads endpoint")
        );
    }

    #[test]
    fn test_outcome_completed() {
        let outcome = Outcome::from_result(&Ok(()));

        assert_eq!(outcome, Outcome::Completed);
        assert!(outcome.is_success());
        assert!(outcome.message().is_none());
    }
}
