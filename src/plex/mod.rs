//! Media-server collaborator: the `MediaServer` seam and its Plex HTTP
//! implementation.

pub mod responses;

use std::fs;
use std::path::Path;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;

use crate::error::{ConnectionError, ServerError, UploadError};
use crate::model::{Image, LibrarySection, MediaItem};
use responses::{Envelope, Identity, Metadata, MetadataContainer, SectionsContainer};

const TIMEOUT: Duration = Duration::from_secs(30);
const PRODUCT: &str = "plex-clearlogo";

/// Everything the engine needs from the media server.
pub trait MediaServer {
    fn sections(&self) -> Result<Vec<LibrarySection>, ServerError>;

    /// Every item in `section`.
    fn items(&self, section: &LibrarySection) -> Result<Vec<MediaItem>, ServerError>;

    /// Items in `section` whose title contains `query`.
    fn search(&self, section: &LibrarySection, query: &str)
    -> Result<Vec<MediaItem>, ServerError>;

    /// Upload a local image file as the item's clear logo.
    fn upload_logo(&self, item: &MediaItem, file: &Path) -> Result<(), UploadError>;

    /// Ask the server to fetch `url` and apply it as the item's clear logo.
    fn upload_logo_from_url(&self, item: &MediaItem, url: &str) -> Result<(), UploadError>;

    /// Absolute, fetchable URL for an image attached to an item.
    fn image_url(&self, image: &Image) -> String;
}

pub struct PlexClient {
    http: Client,
    base_url: String,
    token: String,
    friendly_name: String,
    version: String,
}

impl std::fmt::Debug for PlexClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlexClient")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .field("friendly_name", &self.friendly_name)
            .finish_non_exhaustive()
    }
}

impl PlexClient {
    /// Open a client and verify the server answers with our token.
    pub fn connect(base_url: &str, token: &str) -> Result<Self, ConnectionError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        let http = Client::builder()
            .timeout(TIMEOUT)
            .build()
            .map_err(ConnectionError::Client)?;

        let mut client = Self {
            http,
            base_url,
            token: token.to_string(),
            friendly_name: String::new(),
            version: String::new(),
        };

        let url = client.url("/");
        let response = client
            .authed(client.http.get(&url))
            .send()
            .map_err(|source| ConnectionError::Unreachable {
                url: client.base_url.clone(),
                source,
            })?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(ConnectionError::Unauthorized {
                    url: client.base_url.clone(),
                    status: response.status().as_u16(),
                });
            }
            status if !status.is_success() => {
                return Err(ConnectionError::Status {
                    url: client.base_url.clone(),
                    status: status.as_u16(),
                });
            }
            _ => {}
        }

        let identity: Envelope<Identity> =
            response.json().map_err(|source| ConnectionError::Decode {
                url: client.base_url.clone(),
                source,
            })?;
        let identity = identity.media_container;
        client.friendly_name = identity.friendly_name.unwrap_or_default();
        client.version = identity.version.unwrap_or_default();

        tracing::info!(
            server = %client.friendly_name,
            version = %client.version,
            "Connected to Plex"
        );
        Ok(client)
    }

    pub fn friendly_name(&self) -> &str {
        &self.friendly_name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("X-Plex-Token", &self.token)
            .header("X-Plex-Product", PRODUCT)
            .header("X-Plex-Client-Identifier", PRODUCT)
            .header(ACCEPT, "application/json")
    }

    fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ServerError> {
        tracing::debug!(endpoint, "GET");
        let response = self
            .authed(self.http.get(self.url(endpoint)).query(query))
            .send()
            .map_err(|source| ServerError::Transport {
                endpoint: endpoint.to_string(),
                source,
            })?;
        if !response.status().is_success() {
            return Err(ServerError::Status {
                endpoint: endpoint.to_string(),
                status: response.status().as_u16(),
            });
        }
        let envelope: Envelope<T> = response.json().map_err(|source| ServerError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })?;
        Ok(envelope.media_container)
    }

    fn list(
        &self,
        section: &LibrarySection,
        query: &[(&str, &str)],
    ) -> Result<Vec<MediaItem>, ServerError> {
        let endpoint = format!("/library/sections/{}/all", section.key);
        let container: MetadataContainer = self.get(&endpoint, query)?;
        Ok(container
            .metadata
            .into_iter()
            .map(|meta| self.hydrate(meta))
            .collect())
    }

    /// Re-fetch a listing entry from the item endpoint when it is missing
    /// images or paths. Falls back to the partial entry on failure.
    fn hydrate(&self, meta: Metadata) -> MediaItem {
        if !meta.is_partial() {
            return meta.into();
        }
        let endpoint = format!("/library/metadata/{}", meta.rating_key);
        match self.get::<MetadataContainer>(&endpoint, &[]) {
            Ok(container) => match container.metadata.into_iter().next() {
                Some(full) => full.into(),
                None => meta.into(),
            },
            Err(e) => {
                tracing::warn!(title = %meta.title, error = %e, "Could not load item details");
                meta.into()
            }
        }
    }

    fn check_supported(item: &MediaItem) -> Result<(), UploadError> {
        match item.item_type.as_str() {
            "movie" | "show" => Ok(()),
            other => Err(UploadError::Unsupported {
                item_type: other.to_string(),
            }),
        }
    }

    fn upload_status(item: &MediaItem, response: Response) -> Result<(), UploadError> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        match status {
            StatusCode::METHOD_NOT_ALLOWED | StatusCode::NOT_IMPLEMENTED => {
                Err(UploadError::Unsupported {
                    item_type: item.item_type.clone(),
                })
            }
            _ => Err(UploadError::Rejected {
                status: status.as_u16(),
                message: response.text().unwrap_or_default(),
            }),
        }
    }
}

impl MediaServer for PlexClient {
    fn sections(&self) -> Result<Vec<LibrarySection>, ServerError> {
        let container: SectionsContainer = self.get("/library/sections", &[])?;
        Ok(container.directories.into_iter().map(Into::into).collect())
    }

    fn items(&self, section: &LibrarySection) -> Result<Vec<MediaItem>, ServerError> {
        self.list(section, &[])
    }

    fn search(
        &self,
        section: &LibrarySection,
        query: &str,
    ) -> Result<Vec<MediaItem>, ServerError> {
        self.list(section, &[("title", query)])
    }

    fn upload_logo(&self, item: &MediaItem, file: &Path) -> Result<(), UploadError> {
        Self::check_supported(item)?;
        let body = fs::read(file).map_err(|source| UploadError::Io {
            path: file.to_path_buf(),
            source,
        })?;
        let endpoint = format!("/library/metadata/{}/clearLogos", item.rating_key);
        tracing::debug!(endpoint, bytes = body.len(), "POST logo");
        let response = self
            .authed(self.http.post(self.url(&endpoint)))
            .body(body)
            .send()
            .map_err(UploadError::Transport)?;
        Self::upload_status(item, response)
    }

    fn upload_logo_from_url(&self, item: &MediaItem, url: &str) -> Result<(), UploadError> {
        Self::check_supported(item)?;
        let endpoint = format!("/library/metadata/{}/clearLogos", item.rating_key);
        tracing::debug!(endpoint, url, "POST logo url");
        let response = self
            .authed(self.http.post(self.url(&endpoint)).query(&[("url", url)]))
            .send()
            .map_err(UploadError::Transport)?;
        Self::upload_status(item, response)
    }

    fn image_url(&self, image: &Image) -> String {
        // Agent-hosted images are already absolute; never leak the token to them.
        if image.url.starts_with("http://") || image.url.starts_with("https://") {
            return image.url.clone();
        }
        format!("{}{}?X-Plex-Token={}", self.base_url, image.url, self.token)
    }
}
