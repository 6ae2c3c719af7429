//! TOML configuration for strapd
//!
//! Every section and key is optional; an absent config file means defaults
//! throughout.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use strap_api::state::DEFAULT_UPLOAD_LIMIT;
use strap_core::staging::{DEFAULT_PREFIX, DEFAULT_SUFFIX};
use strap_core::TempDirStaging;

/// Top-level daemon configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StrapdConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub staging: StagingConfig,
    #[serde(default)]
    pub upload: UploadConfig,
}

/// Listener settings
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to bind
    #[serde(default = "default_host")]
    pub host: IpAddr,
    /// TCP port
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    8000
}

/// Where uploads are staged for the decoder
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StagingConfig {
    /// Staging directory (default: OS temp directory)
    #[serde(default)]
    pub dir: Option<PathBuf>,
    /// File name prefix
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// File name suffix
    #[serde(default = "default_suffix")]
    pub suffix: String,
}

impl Default for StagingConfig {
    fn default() -> Self {
        Self {
            dir: None,
            prefix: default_prefix(),
            suffix: default_suffix(),
        }
    }
}

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

fn default_suffix() -> String {
    DEFAULT_SUFFIX.to_string()
}

/// Upload limits
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UploadConfig {
    /// Largest accepted request body in bytes
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_bytes: default_max_bytes(),
        }
    }
}

fn default_max_bytes() -> usize {
    DEFAULT_UPLOAD_LIMIT
}

impl StrapdConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e))?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e))
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Socket address to listen on
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.server.host, self.server.port)
    }

    /// Build the staging area, creating its directory if needed
    pub fn staging_area(&self) -> anyhow::Result<TempDirStaging> {
        let dir = self
            .staging
            .dir
            .clone()
            .unwrap_or_else(std::env::temp_dir);
        std::fs::create_dir_all(&dir).map_err(|e| {
            anyhow::anyhow!("Failed to create staging directory '{}': {}", dir.display(), e)
        })?;

        Ok(TempDirStaging::new(dir)
            .with_prefix(self.staging.prefix.clone())
            .with_suffix(self.staging.suffix.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = StrapdConfig::parse("").unwrap();
        assert_eq!(config.listen_addr(), "0.0.0.0:8000".parse().unwrap());
        assert_eq!(config.staging.dir, None);
        assert_eq!(config.staging.prefix, "history-");
        assert_eq!(config.staging.suffix, ".bin");
        assert_eq!(config.upload.max_bytes, 64 * 1024 * 1024);
    }

    #[test]
    fn test_full_config() {
        let config = StrapdConfig::parse(
            r#"
            [server]
            host = "127.0.0.1"
            port = 9100

            [staging]
            dir = "/var/tmp/strapd"
            prefix = "upload-"
            suffix = ".whoop"

            [upload]
            max_bytes = 1048576
            "#,
        )
        .unwrap();

        assert_eq!(config.listen_addr(), "127.0.0.1:9100".parse().unwrap());
        assert_eq!(config.staging.dir, Some(PathBuf::from("/var/tmp/strapd")));
        assert_eq!(config.staging.prefix, "upload-");
        assert_eq!(config.staging.suffix, ".whoop");
        assert_eq!(config.upload.max_bytes, 1_048_576);
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config = StrapdConfig::parse("[server]\nport = 8080\n").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, default_host());
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        assert!(StrapdConfig::parse("[server]\nprot = 8080\n").is_err());
    }

    #[test]
    fn test_staging_area_creates_directory() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("nested").join("staging");
        let config = StrapdConfig {
            staging: StagingConfig {
                dir: Some(dir.clone()),
                ..StagingConfig::default()
            },
            ..StrapdConfig::default()
        };

        let staging = config.staging_area().unwrap();
        assert!(dir.is_dir());
        assert_eq!(staging.dir(), dir.as_path());
    }

    #[test]
    fn test_load_missing_file() {
        let root = tempfile::tempdir().unwrap();
        let err = StrapdConfig::load(&root.path().join("missing.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
