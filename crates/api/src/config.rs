use std::str::FromStr;

use subline_core::language::{validate_language_code, DEFAULT_TARGET_LANGUAGE};
use subline_pipeline::DEFAULT_BATCH_SIZE;

/// Which translation backend the server talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslationProvider {
    /// Amazon Translate.
    Aws,
    /// Offline translator that tags text with the target language.
    Mock,
}

impl FromStr for TranslationProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "aws" => Ok(Self::Aws),
            "mock" => Ok(Self::Mock),
            other => Err(format!(
                "Unknown translation provider '{other}'. Must be one of: aws, mock"
            )),
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3001`).
    pub port: u16,
    /// HTTP request timeout in seconds (default: `300`). The translate
    /// request waits for the whole job, so this bounds how long a client
    /// waits for the result; the job itself is never cut short.
    pub request_timeout_secs: u64,
    /// Maximum accepted upload body in bytes (default: 10 MiB).
    pub upload_limit_bytes: usize,
    /// Target language when a translate request names none (default: `es`).
    pub target_language: String,
    /// Entries per translation batch (default: `10`).
    pub batch_size: usize,
    /// Translation backend (default: `aws`).
    pub provider: TranslationProvider,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default     |
    /// |--------------------------|-------------|
    /// | `HOST`                   | `0.0.0.0`   |
    /// | `PORT`                   | `3001`      |
    /// | `REQUEST_TIMEOUT_SECS`   | `300`       |
    /// | `UPLOAD_LIMIT_BYTES`     | `10485760`  |
    /// | `TARGET_LANGUAGE`        | `es`        |
    /// | `TRANSLATION_BATCH_SIZE` | `10`        |
    /// | `TRANSLATION_PROVIDER`   | `aws`       |
    ///
    /// # Panics
    ///
    /// Panics on malformed values so misconfiguration fails at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3001".into())
            .parse()
            .expect("PORT must be a valid u16");

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "300".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let upload_limit_bytes: usize = std::env::var("UPLOAD_LIMIT_BYTES")
            .unwrap_or_else(|_| (10 * 1024 * 1024).to_string())
            .parse()
            .expect("UPLOAD_LIMIT_BYTES must be a valid usize");

        let target_language =
            std::env::var("TARGET_LANGUAGE").unwrap_or_else(|_| DEFAULT_TARGET_LANGUAGE.into());
        validate_language_code(&target_language)
            .unwrap_or_else(|e| panic!("TARGET_LANGUAGE is invalid: {e}"));

        let batch_size: usize = std::env::var("TRANSLATION_BATCH_SIZE")
            .unwrap_or_else(|_| DEFAULT_BATCH_SIZE.to_string())
            .parse()
            .expect("TRANSLATION_BATCH_SIZE must be a valid usize");
        assert!(batch_size > 0, "TRANSLATION_BATCH_SIZE must be at least 1");

        let provider: TranslationProvider = std::env::var("TRANSLATION_PROVIDER")
            .unwrap_or_else(|_| "aws".into())
            .parse()
            .unwrap_or_else(|e: String| panic!("TRANSLATION_PROVIDER is invalid: {e}"));

        Self {
            host,
            port,
            request_timeout_secs,
            upload_limit_bytes,
            target_language,
            batch_size,
            provider,
        }
    }
}
