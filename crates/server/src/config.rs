//! Startup configuration.
//!
//! Precedence, highest first: CLI flags, environment variables, the optional YAML file given by
//! `--config`, built-in defaults. The result is resolved once into an immutable [`ServerConfig`].

use crate::error::{Result, ServerError};
use clap::{Parser, ValueEnum};
use productboard_mcp_tools::config::{
    ApiConfig, DEFAULT_API_VERSION, DEFAULT_BASE_URL, DEFAULT_TIMEOUT,
};
use serde::Deserialize;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_BIND: SocketAddr = SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 8080));
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// MCP streamable HTTP at `/mcp`.
    #[default]
    Http,
    Stdio,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(
    name = "productboard-mcp",
    version,
    about = "Expose the Productboard REST API as MCP tools"
)]
pub struct Cli {
    /// Optional YAML config file
    #[arg(long, env = "PRODUCTBOARD_MCP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Productboard API token
    #[arg(long, env = "PRODUCTBOARD_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    #[arg(long, env = "PRODUCTBOARD_BASE_URL")]
    pub base_url: Option<String>,

    /// Value of the `X-Version` header
    #[arg(long, env = "PRODUCTBOARD_API_VERSION")]
    pub api_version: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, env = "PRODUCTBOARD_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Listen address for the HTTP transport
    #[arg(long, env = "PRODUCTBOARD_MCP_BIND")]
    pub bind: Option<SocketAddr>,

    #[arg(long, value_enum, env = "PRODUCTBOARD_MCP_TRANSPORT")]
    pub transport: Option<Transport>,

    /// Log filter directive, e.g. `info` or `productboard_mcp_tools=debug`
    #[arg(long, env = "PRODUCTBOARD_MCP_LOG")]
    pub log_level: Option<String>,

    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

/// Contents of the `--config` file. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct FileConfig {
    pub api_token: Option<String>,
    pub base_url: Option<String>,
    pub api_version: Option<String>,
    pub timeout_secs: Option<u64>,
    pub bind: Option<SocketAddr>,
    pub transport: Option<Transport>,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub api: ApiConfig,
    pub bind: SocketAddr,
    pub transport: Transport,
}

impl ServerConfig {
    /// Resolve the effective configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed, no API token is configured,
    /// or the API settings are invalid.
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => load_file_config(path)?,
            None => FileConfig::default(),
        };
        Self::merge(cli, file)
    }

    fn merge(cli: &Cli, file: FileConfig) -> Result<Self> {
        let token = cli
            .api_token
            .clone()
            .or(file.api_token)
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| {
                ServerError::Config(
                    "Productboard API token is required (--api-token or PRODUCTBOARD_API_TOKEN)"
                        .to_string(),
                )
            })?;

        let base_url = cli
            .base_url
            .clone()
            .or(file.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let api_version = cli
            .api_version
            .clone()
            .or(file.api_version)
            .unwrap_or_else(|| DEFAULT_API_VERSION.to_string());
        let timeout = cli
            .timeout_secs
            .or(file.timeout_secs)
            .map_or(DEFAULT_TIMEOUT, Duration::from_secs);

        let api = ApiConfig::new(token)
            .with_base_url(base_url)
            .with_api_version(api_version)
            .with_timeout(timeout);
        api.validate()?;

        Ok(Self {
            api,
            bind: cli.bind.or(file.bind).unwrap_or(DEFAULT_BIND),
            transport: cli.transport.or(file.transport).unwrap_or_default(),
        })
    }
}

fn load_file_config(path: &Path) -> Result<FileConfig> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| ServerError::Config(format!("read config {}: {e}", path.display())))?;
    if raw.trim().is_empty() {
        return Ok(FileConfig::default());
    }
    Ok(serde_yaml::from_str(&raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    /// Parse flags only; `PRODUCTBOARD_*` variables of the test process are ignored.
    fn cli(args: &[&str]) -> Cli {
        use clap::{CommandFactory as _, FromArgMatches as _};

        let argv = std::iter::once("productboard-mcp").chain(args.iter().copied());
        let matches = Cli::command()
            .mut_args(|arg| arg.env(None::<&'static str>))
            .try_get_matches_from(argv)
            .expect("valid CLI arguments");
        Cli::from_arg_matches(&matches).expect("matches map onto Cli")
    }

    fn write_config(contents: &str) -> (tempfile::TempDir, String) {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, contents).expect("write config");
        let path = path.to_string_lossy().into_owned();
        (dir, path)
    }

    #[test]
    fn defaults_apply_when_only_token_given() {
        let cfg = ServerConfig::merge(&cli(&["--api-token", "tok"]), FileConfig::default())
            .expect("config");
        assert_eq!(cfg.api.token, "tok");
        assert_eq!(cfg.api.base_url, "https://api.productboard.com");
        assert_eq!(cfg.api.api_version, "1");
        assert_eq!(cfg.api.timeout, Duration::from_secs(30));
        assert_eq!(cfg.bind.to_string(), "0.0.0.0:8080");
        assert_eq!(cfg.transport, Transport::Http);
    }

    #[test]
    fn missing_token_is_rejected() {
        let err = ServerConfig::merge(&cli(&[]), FileConfig::default()).unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));
        assert!(err.to_string().contains("token"));

        let err = ServerConfig::merge(&cli(&["--api-token", " "]), FileConfig::default())
            .unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));
    }

    #[test]
    fn test_cli_ignores_process_environment() {
        let cmd = {
            use clap::CommandFactory as _;
            Cli::command().mut_args(|arg| arg.env(None::<&'static str>))
        };
        assert!(cmd.get_arguments().all(|arg| arg.get_env().is_none()));

        let parsed = cli(&[]);
        assert!(parsed.api_token.is_none());
        assert!(parsed.base_url.is_none());
    }

    #[test]
    fn cli_flags_override_file_values() {
        let (_dir, path) = write_config(
            r"
apiToken: from-file
baseUrl: http://file.example
timeoutSecs: 5
transport: stdio
",
        );
        let cfg = ServerConfig::resolve(&cli(&[
            "--config",
            &path,
            "--base-url",
            "http://cli.example",
        ]))
        .expect("config");

        assert_eq!(cfg.api.token, "from-file");
        assert_eq!(cfg.api.base_url, "http://cli.example");
        assert_eq!(cfg.api.timeout, Duration::from_secs(5));
        assert_eq!(cfg.transport, Transport::Stdio);
    }

    #[test]
    fn unknown_file_keys_are_rejected() {
        let (_dir, path) = write_config("apiToken: t\nretries: 3\n");
        let err = ServerConfig::resolve(&cli(&["--config", &path])).unwrap_err();
        assert!(matches!(err, ServerError::Yaml(_)));
    }

    #[test]
    fn empty_file_is_treated_as_no_overrides() {
        let (_dir, path) = write_config("\n");
        let cfg = ServerConfig::resolve(&cli(&["--config", &path, "--api-token", "t"]))
            .expect("config");
        assert_eq!(cfg.api.base_url, "https://api.productboard.com");
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let err = ServerConfig::resolve(&cli(&[
            "--config",
            "/definitely/not/here.yaml",
            "--api-token",
            "t",
        ]))
        .unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));
    }

    #[test]
    fn invalid_api_settings_are_rejected() {
        let err = ServerConfig::merge(
            &cli(&["--api-token", "t", "--timeout-secs", "0"]),
            FileConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ServerError::Tools(_)));

        let err = ServerConfig::merge(
            &cli(&["--api-token", "t", "--base-url", "ftp://example.com"]),
            FileConfig::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("Invalid base URL"));
    }

    #[test]
    fn transport_and_bind_parse_from_flags() {
        let cfg = ServerConfig::merge(
            &cli(&[
                "--api-token",
                "t",
                "--transport",
                "stdio",
                "--bind",
                "127.0.0.1:9000",
            ]),
            FileConfig::default(),
        )
        .expect("config");
        assert_eq!(cfg.transport, Transport::Stdio);
        assert_eq!(cfg.bind.to_string(), "127.0.0.1:9000");
    }
}
