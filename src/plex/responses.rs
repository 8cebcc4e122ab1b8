//! JSON shapes returned by the Plex Media Server API.
//!
//! Every response is wrapped in a `MediaContainer` object. Only the fields
//! this tool reads are modelled; unknown fields are ignored.

use serde::Deserialize;

use crate::model::{Image, LibrarySection, MediaItem, SectionKind};

#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(rename = "MediaContainer")]
    pub media_container: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    #[serde(default)]
    pub friendly_name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SectionsContainer {
    #[serde(rename = "Directory", default)]
    pub directories: Vec<Directory>,
}

#[derive(Debug, Deserialize)]
pub struct Directory {
    pub key: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    #[serde(rename = "Location", default)]
    pub locations: Vec<Location>,
}

#[derive(Debug, Deserialize)]
pub struct Location {
    pub path: String,
}

#[derive(Debug, Deserialize)]
pub struct MetadataContainer {
    #[serde(rename = "Metadata", default)]
    pub metadata: Vec<Metadata>,
}

#[derive(Debug, Deserialize)]
pub struct Metadata {
    #[serde(rename = "ratingKey")]
    pub rating_key: String,
    pub title: String,
    #[serde(default)]
    pub year: Option<u32>,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(rename = "Media", default)]
    pub media: Vec<Media>,
    #[serde(rename = "Location", default)]
    pub locations: Vec<Location>,
    /// Absent from some listing endpoints; `None` means "not loaded", not
    /// "no images".
    #[serde(rename = "Image", default)]
    pub images: Option<Vec<ImageEntry>>,
}

#[derive(Debug, Deserialize)]
pub struct Media {
    #[serde(rename = "Part", default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub file: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ImageEntry {
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
}

impl Metadata {
    /// Whether the listing entry lacks data the processor needs and must be
    /// fetched again from the item endpoint.
    pub fn is_partial(&self) -> bool {
        let missing_path = match self.kind.as_str() {
            "movie" => !self.media.iter().any(|m| !m.parts.is_empty()),
            "show" => self.locations.is_empty(),
            _ => false,
        };
        self.images.is_none() || missing_path
    }
}

impl From<Directory> for LibrarySection {
    fn from(dir: Directory) -> Self {
        LibrarySection {
            key: dir.key,
            title: dir.title,
            kind: SectionKind::from_plex(&dir.kind),
            locations: dir.locations.into_iter().map(|l| l.path).collect(),
        }
    }
}

impl From<Metadata> for MediaItem {
    fn from(meta: Metadata) -> Self {
        let part_files = meta
            .media
            .into_iter()
            .flat_map(|m| m.parts)
            .filter_map(|p| p.file)
            .collect();
        MediaItem {
            rating_key: meta.rating_key,
            title: meta.title,
            year: meta.year,
            item_type: meta.kind,
            part_files,
            locations: meta.locations.into_iter().map(|l| l.path).collect(),
            images: meta
                .images
                .unwrap_or_default()
                .into_iter()
                .map(|i| Image {
                    kind: i.kind,
                    url: i.url,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sections() {
        let json = r#"{"MediaContainer":{"size":2,"Directory":[
            {"key":"1","type":"movie","title":"Movies","agent":"tv.plex.agents.movie",
             "Location":[{"id":1,"path":"/media/movies"},{"id":4,"path":"/media/movies-4k"}]},
            {"key":"2","type":"artist","title":"Music","Location":[{"id":2,"path":"/media/music"}]}
        ]}}"#;
        let env: Envelope<SectionsContainer> = serde_json::from_str(json).unwrap();
        let sections: Vec<LibrarySection> = env
            .media_container
            .directories
            .into_iter()
            .map(Into::into)
            .collect();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].kind, SectionKind::Movie);
        assert_eq!(sections[0].locations, ["/media/movies", "/media/movies-4k"]);
        assert!(!sections[1].kind.is_eligible());
    }

    #[test]
    fn test_parse_movie_with_logo() {
        let json = r#"{"MediaContainer":{"Metadata":[{
            "ratingKey":"10520","title":"Alpha","year":2020,"type":"movie",
            "Media":[{"id":1,"Part":[{"id":7,"file":"/media/movies/Alpha (2020)/movie.mkv"}]}],
            "Image":[{"alt":"Alpha","type":"clearLogo","url":"/library/metadata/10520/clearLogo/1757122405"}]
        }]}}"#;
        let env: Envelope<MetadataContainer> = serde_json::from_str(json).unwrap();
        let meta = env.media_container.metadata.into_iter().next().unwrap();
        assert!(!meta.is_partial());
        let item = MediaItem::from(meta);
        assert_eq!(item.part_files, ["/media/movies/Alpha (2020)/movie.mkv"]);
        assert!(item.has_clear_logo());
        assert_eq!(item.year, Some(2020));
    }

    #[test]
    fn test_show_listing_without_location_is_partial() {
        let json = r#"{"MediaContainer":{"Metadata":[
            {"ratingKey":"5","title":"Gamma","type":"show","Image":[]}
        ]}}"#;
        let env: Envelope<MetadataContainer> = serde_json::from_str(json).unwrap();
        assert!(env.media_container.metadata[0].is_partial());
    }

    #[test]
    fn test_missing_image_array_is_partial() {
        let json = r#"{"MediaContainer":{"Metadata":[
            {"ratingKey":"5","title":"Gamma","type":"show","Location":[{"path":"/media/tv/Gamma"}]}
        ]}}"#;
        let env: Envelope<MetadataContainer> = serde_json::from_str(json).unwrap();
        assert!(env.media_container.metadata[0].is_partial());
    }

    #[test]
    fn test_empty_container() {
        let env: Envelope<MetadataContainer> =
            serde_json::from_str(r#"{"MediaContainer":{"size":0}}"#).unwrap();
        assert!(env.media_container.metadata.is_empty());
    }

    #[test]
    fn test_parse_identity() {
        let env: Envelope<Identity> = serde_json::from_str(
            r#"{"MediaContainer":{"friendlyName":"basement","version":"1.41.0.8992"}}"#,
        )
        .unwrap();
        assert_eq!(env.media_container.friendly_name.as_deref(), Some("basement"));
    }
}
