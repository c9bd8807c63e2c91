//! Configuration management for the Pokédex API.
//!
//! This module provides a configuration system that supports:
//! - Command-line arguments via clap
//! - Environment variables with `POKEDEX_` prefix (a `.env` file is loaded first)
//! - Sensible defaults for all optional settings
//!
//! # Environment Variables
//!
//! - `POKEDEX_HOST` - Server bind address (default: 0.0.0.0)
//! - `POKEDEX_PORT` - Server port (default: 8000)
//! - `POKEDEX_API_TOKEN` - Expected bearer token (required)
//! - `POKEDEX_ENV` - Deployment environment; `production` hides error details
//! - `POKEDEX_DATASET` - Path to the Pokédex JSON file (default: pokedex.json)
//! - `POKEDEX_CORS_ORIGINS` - Allowed CORS origins, comma-separated (default: any)

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use clap::Parser;

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_PORT: u16 = 8000;

/// Default dataset location.
pub const DEFAULT_DATASET: &str = "pokedex.json";

/// Default environment name.
pub const DEFAULT_ENVIRONMENT: &str = "development";

// =============================================================================
// Environment
// =============================================================================

/// Deployment environment.
///
/// Only `production` changes behavior: terser access logs and generic 500
/// bodies. Any other name is kept for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Production,
    Other(String),
}

impl Environment {
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Environment::Other(DEFAULT_ENVIRONMENT.to_string())
    }
}

impl FromStr for Environment {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "production" => Environment::Production,
            other => Environment::Other(other.to_string()),
        })
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Production => write!(f, "production"),
            Environment::Other(name) => write!(f, "{}", name),
        }
    }
}

// =============================================================================
// CLI Arguments
// =============================================================================

/// Pokédex API - a read-only, token-protected Pokémon lookup service.
#[derive(Parser, Debug, Clone)]
#[command(name = "pokedex-api")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "POKEDEX_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "POKEDEX_PORT")]
    pub port: u16,

    /// Deployment environment (`production` suppresses error details).
    #[arg(long, default_value = DEFAULT_ENVIRONMENT, env = "POKEDEX_ENV")]
    pub environment: Environment,

    // =========================================================================
    // Authentication Configuration
    // =========================================================================
    /// Bearer token every request must present.
    #[arg(long, env = "POKEDEX_API_TOKEN", hide_env_values = true)]
    pub api_token: String,

    // =========================================================================
    // Data Configuration
    // =========================================================================
    /// Path to the Pokédex JSON file.
    #[arg(long, default_value = DEFAULT_DATASET, env = "POKEDEX_DATASET")]
    pub dataset: String,

    // =========================================================================
    // CORS Configuration
    // =========================================================================
    /// Allowed CORS origins (comma-separated).
    ///
    /// If not specified, allows any origin.
    #[arg(long, env = "POKEDEX_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable transport-level request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.api_token.is_empty() {
            return Err(
                "API token is required. Set --api-token or POKEDEX_API_TOKEN".to_string(),
            );
        }

        // The header is split on a single space and must be visible ASCII,
        // so any other token could never match
        if !self.api_token.bytes().all(|b| b.is_ascii_graphic()) {
            return Err(
                "API token must contain only visible ASCII characters (no whitespace)"
                    .to_string(),
            );
        }

        if self.dataset.is_empty() {
            return Err(
                "Dataset path is required. Set --dataset or POKEDEX_DATASET".to_string(),
            );
        }

        Ok(())
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// =============================================================================
// Tests
// =============================================================================
