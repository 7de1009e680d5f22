//! Server configuration.
//!
//! Values come from the process environment (a `.env` file is loaded by
//! the binary through `dotenvy`), and command-line flags override them.
//!
//! | Variable                    | Default              |
//! |-----------------------------|----------------------|
//! | `UPLOAD_PORT`               | `8080`               |
//! | `UPLOAD_STORAGE_DIR`        | `.fileupload/objects`|
//! | `UPLOAD_MAX_SIZE`           | `5242880` (5 MiB)    |
//! | `UPLOAD_ALLOWED_EXTENSIONS` | empty (any type)     |

use std::path::PathBuf;

use crate::error::{ConfigError, ConfigResult};
use crate::upload::UploadPolicy;

/// Port the form posts to by default.
pub const DEFAULT_PORT: u16 = 8080;

/// Directory for stored uploads (relative to current dir).
pub const DEFAULT_STORAGE_DIR: &str = ".fileupload/objects";

/// 5 MB
pub const DEFAULT_MAX_SIZE: u64 = 5 << 20;

/// Bytes allowed on top of the file for multipart boundaries and headers.
pub const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Runtime configuration of the upload server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to listen on
    pub port: u16,
    /// Root directory of the local object store
    pub storage_dir: PathBuf,
    /// What uploads are accepted
    pub policy: UploadPolicy,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            policy: UploadPolicy::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(port) = lookup("UPLOAD_PORT") {
            config.port = parse_var("UPLOAD_PORT", &port)?;
        }
        if let Some(dir) = lookup("UPLOAD_STORAGE_DIR").filter(|d| !d.trim().is_empty()) {
            config.storage_dir = PathBuf::from(dir.trim());
        }
        if let Some(size) = lookup("UPLOAD_MAX_SIZE") {
            config.policy.max_size = parse_var("UPLOAD_MAX_SIZE", &size)?;
        }
        if let Some(exts) = lookup("UPLOAD_ALLOWED_EXTENSIONS") {
            config.policy = config.policy.with_extensions(exts.split(','));
        }

        Ok(config)
    }

    /// Largest request body the server will read.
    pub fn body_limit(&self) -> usize {
        usize::try_from(self.policy.max_size)
            .unwrap_or(usize::MAX)
            .saturating_add(MULTIPART_OVERHEAD)
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, value: &str) -> ConfigResult<T> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        name,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_without_env() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.storage_dir, PathBuf::from(".fileupload/objects"));
        assert_eq!(config.policy.max_size, 5 * 1024 * 1024);
        assert!(config.policy.allowed_extensions.is_empty());
    }

    #[test]
    fn test_env_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("UPLOAD_PORT", "9000"),
            ("UPLOAD_STORAGE_DIR", "/tmp/uploads"),
            ("UPLOAD_MAX_SIZE", "1024"),
            ("UPLOAD_ALLOWED_EXTENSIONS", "jpg, PNG,,"),
        ]))
        .unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(config.storage_dir, PathBuf::from("/tmp/uploads"));
        assert_eq!(config.policy.max_size, 1024);
        assert_eq!(config.policy.allowed_extensions, vec!["jpg", "png"]);
        assert_eq!(config.body_limit(), 1024 + MULTIPART_OVERHEAD);
    }

    #[test]
    fn test_invalid_port() {
        let err = ServerConfig::from_lookup(lookup(&[("UPLOAD_PORT", "eighty")])).unwrap_err();
        assert!(err.to_string().contains("UPLOAD_PORT"));
    }
}
