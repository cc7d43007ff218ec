//! Runtime configuration
//!
//! Resolves CLI arguments and XDG paths into the explicit settings each
//! component receives at construction time. Nothing else in the crate
//! looks at the environment or picks directories on its own.

use std::path::PathBuf;

use directories::ProjectDirs;
use thiserror::Error;

use crate::cli::Cli;

/// Errors from resolving the runtime configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No service endpoint was supplied
    #[error("no service endpoint configured; pass --endpoint or set OPSCAT_ENDPOINT")]
    NoEndpoint,

    /// No usable cache directory could be determined
    #[error("could not determine a cache directory; pass --cache-dir")]
    NoCacheDir,
}

/// Resolved runtime settings
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the remote service, without a trailing slash
    pub endpoint: String,
    /// Root of the on-disk object mirror
    pub object_cache_root: PathBuf,
    /// Directory backing the expiring metadata store
    pub meta_cache_root: PathBuf,
}

impl Config {
    /// Resolves the configuration from parsed CLI arguments.
    ///
    /// The cache root comes from `--cache-dir` when given, otherwise from
    /// the XDG-compliant user cache directory (`~/.cache/opscat/` on
    /// Linux). The object mirror and the metadata store get separate
    /// subtrees so object paths can never collide with store keys.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let endpoint = cli.endpoint.as_deref().ok_or(ConfigError::NoEndpoint)?;

        let cache_root = match &cli.cache_dir {
            Some(dir) => dir.clone(),
            None => ProjectDirs::from("", "", "opscat")
                .ok_or(ConfigError::NoCacheDir)?
                .cache_dir()
                .to_path_buf(),
        };

        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            object_cache_root: cache_root.join("objects"),
            meta_cache_root: cache_root.join("meta"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_explicit_cache_dir_is_used_for_both_roots() {
        let cli = Cli::parse_from([
            "opscat",
            "--endpoint",
            "https://svc.example",
            "--cache-dir",
            "/tmp/opscat-test",
            "ls",
        ]);
        let config = Config::from_cli(&cli).expect("config should resolve");

        assert_eq!(
            config.object_cache_root,
            PathBuf::from("/tmp/opscat-test/objects")
        );
        assert_eq!(config.meta_cache_root, PathBuf::from("/tmp/opscat-test/meta"));
    }

    #[test]
    fn test_trailing_slash_is_stripped_from_endpoint() {
        let cli = Cli::parse_from([
            "opscat",
            "--endpoint",
            "https://svc.example/",
            "--cache-dir",
            "/tmp/opscat-test",
            "ls",
        ]);
        let config = Config::from_cli(&cli).expect("config should resolve");

        assert_eq!(config.endpoint, "https://svc.example");
    }

    #[test]
    fn test_missing_endpoint_is_an_error() {
        let mut cli = Cli::parse_from(["opscat", "--cache-dir", "/tmp/opscat-test", "ls"]);
        // The env fallback may be set in the environment running the tests.
        cli.endpoint = None;

        let result = Config::from_cli(&cli);

        assert!(matches!(result, Err(ConfigError::NoEndpoint)));
    }
}
