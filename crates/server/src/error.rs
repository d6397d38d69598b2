//! Error types for the Productboard MCP server.

use productboard_mcp_tools::runtime::ProductboardToolsError;
use thiserror::Error;

/// Startup error for the server binary.
#[derive(Error, Debug)]
pub enum ServerError {
    /// Configuration errors (missing token, unreadable config file)
    #[error("Configuration error: {0}")]
    Config(String),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Invalid Productboard API settings
    #[error(transparent)]
    Tools(#[from] ProductboardToolsError),
}

/// Result type alias for server startup operations.
pub type Result<T> = std::result::Result<T, ServerError>;
