use std::path::PathBuf;

use thiserror::Error;

/// Problems with the credentials file or overrides. Always fatal, raised
/// before any connection attempt.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file '{0}' not found")]
    NotFound(PathBuf),

    #[error("could not read configuration file '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not decode JSON from '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("ensure '{0}' is set correctly in the configuration file")]
    Missing(&'static str),

    #[error("plex_url must start with http:// or https:// (got '{0}')")]
    InvalidUrl(String),
}

/// Server unreachable or rejecting our token. Fatal.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("could not reach Plex server at {url}: {source}")]
    Unreachable { url: String, source: reqwest::Error },

    #[error("Plex server at {url} rejected the token (HTTP {status})")]
    Unauthorized { url: String, status: u16 },

    #[error("Plex server at {url} answered HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("unexpected identity response from {url}: {source}")]
    Decode { url: String, source: reqwest::Error },

    #[error("could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Failures reading or writing the location mapping file.
#[derive(Debug, Error)]
pub enum MappingError {
    #[error("could not access mapping file '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("mapping file '{path}' is not a JSON object of strings: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("could not encode mapping: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Why a remote path could not be turned into a local directory.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("no mapped location contains '{0}'")]
    NotFound(String),

    #[error("'{path}' does not sit below mapped location '{root}'")]
    RelativePath { path: String, root: String },
}

/// Listing or searching the library failed after the connection was up.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        source: reqwest::Error,
    },

    #[error("request to {endpoint} answered HTTP {status}")]
    Status { endpoint: String, status: u16 },

    #[error("could not decode response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        source: reqwest::Error,
    },
}

/// Artwork upload failures. `Rejected` and `Unsupported` are the two
/// conditions callers must be able to tell apart.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("server rejected the logo (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("'{item_type}' items do not support clear logo uploads")]
    Unsupported { item_type: String },

    #[error("upload request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("could not read logo file '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Download failures. A non-success status is kept separate from the
/// transport failing outright.
#[derive(Debug, Error)]
pub enum TransferError {
    #[error("download failed with HTTP status {0}")]
    Status(u16),

    #[error("download request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("could not write '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}
