use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

/// Token value shipped in the sample configuration file.
const PLACEHOLDER_TOKEN: &str = "your_plex_token_here";

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    plex_url: Option<String>,
    plex_token: Option<String>,
}

/// Where and how to reach the Plex server.
#[derive(Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub url: String,
    pub token: String,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("url", &self.url)
            .field("token", &"<redacted>")
            .finish()
    }
}

impl ServerConfig {
    /// Read `path`, then apply the overrides. The file may be absent only
    /// when both overrides are given.
    pub fn load(
        path: &Path,
        url_override: Option<String>,
        token_override: Option<String>,
    ) -> Result<Self, ConfigError> {
        let raw = if url_override.is_some() && token_override.is_some() {
            RawConfig::default()
        } else {
            read_raw(path)?
        };

        Self::from_parts(
            url_override.or(raw.plex_url),
            token_override.or(raw.plex_token),
        )
    }

    pub fn from_parts(url: Option<String>, token: Option<String>) -> Result<Self, ConfigError> {
        let url = url
            .map(|u| u.trim().trim_end_matches('/').to_string())
            .filter(|u| !u.is_empty())
            .ok_or(ConfigError::Missing("plex_url"))?;
        let token = token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty() && !t.eq_ignore_ascii_case(PLACEHOLDER_TOKEN))
            .ok_or(ConfigError::Missing("plex_token"))?;

        let lower = url.to_ascii_lowercase();
        if !(lower.starts_with("http://") || lower.starts_with("https://")) {
            return Err(ConfigError::InvalidUrl(url));
        }

        Ok(Self { url, token })
    }
}

fn read_raw(path: &Path) -> Result<RawConfig, ConfigError> {
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Expand a leading `~/` to the user's home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(body: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, body).unwrap();
        (dir, path)
    }

    #[test]
    fn test_load_trims_trailing_slash() {
        let (_dir, path) =
            write_config(r#"{"plex_url": "http://plex.lan:32400/", "plex_token": "abc"}"#);
        let config = ServerConfig::load(&path, None, None).unwrap();
        assert_eq!(config.url, "http://plex.lan:32400");
        assert_eq!(config.token, "abc");
    }

    #[test]
    fn test_placeholder_token_rejected() {
        let (_dir, path) = write_config(
            r#"{"plex_url": "http://plex.lan:32400", "plex_token": "YOUR_PLEX_TOKEN_HERE"}"#,
        );
        let err = ServerConfig::load(&path, None, None).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("plex_token")));
    }

    #[test]
    fn test_missing_file() {
        let err = ServerConfig::load(Path::new("/nope/config.json"), None, None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_overrides_skip_file() {
        let config = ServerConfig::load(
            Path::new("/nope/config.json"),
            Some("https://plex.example".into()),
            Some("tok".into()),
        )
        .unwrap();
        assert_eq!(config.url, "https://plex.example");
    }

    #[test]
    fn test_partial_override() {
        let (_dir, path) =
            write_config(r#"{"plex_url": "http://plex.lan:32400", "plex_token": "file"}"#);
        let config = ServerConfig::load(&path, None, Some("env".into())).unwrap();
        assert_eq!(config.token, "env");
        assert_eq!(config.url, "http://plex.lan:32400");
    }

    #[test]
    fn test_bad_json() {
        let (_dir, path) = write_config("{not json");
        let err = ServerConfig::load(&path, None, None).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_url_scheme_required() {
        let err = ServerConfig::from_parts(Some("plex.lan:32400".into()), Some("t".into()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl(_)));
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = ServerConfig::from_parts(Some("http://h".into()), Some("secret".into()))
            .unwrap();
        assert!(!format!("{config:?}").contains("secret"));
    }

    #[test]
    fn test_expand_tilde_passthrough() {
        assert_eq!(expand_tilde("config.json"), PathBuf::from("config.json"));
    }
}
