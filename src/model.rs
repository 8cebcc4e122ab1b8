use std::fmt;

/// Image type Plex uses for clear logo artwork.
pub const CLEAR_LOGO: &str = "clearLogo";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionKind {
    Movie,
    Show,
    Other(String),
}

impl SectionKind {
    pub fn from_plex(kind: &str) -> Self {
        match kind {
            "movie" => SectionKind::Movie,
            "show" => SectionKind::Show,
            other => SectionKind::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            SectionKind::Movie => "movie",
            SectionKind::Show => "show",
            SectionKind::Other(kind) => kind,
        }
    }

    /// Only movie and show libraries carry clear logos we can match.
    pub fn is_eligible(&self) -> bool {
        matches!(self, SectionKind::Movie | SectionKind::Show)
    }

    /// How items in this section are identified on disk.
    pub fn keying(&self) -> Option<PathKeying> {
        match self {
            SectionKind::Movie => Some(PathKeying::File),
            SectionKind::Show => Some(PathKeying::Folder),
            SectionKind::Other(_) => None,
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether an item's remote path names a file (its folder is the parent)
/// or the item folder itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKeying {
    File,
    Folder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibrarySection {
    pub key: String,
    pub title: String,
    pub kind: SectionKind,
    pub locations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub kind: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MediaItem {
    pub rating_key: String,
    pub title: String,
    pub year: Option<u32>,
    pub item_type: String,
    pub part_files: Vec<String>,
    pub locations: Vec<String>,
    pub images: Vec<Image>,
}

impl MediaItem {
    pub fn has_clear_logo(&self) -> bool {
        self.clear_logo().is_some()
    }

    pub fn clear_logo(&self) -> Option<&Image> {
        self.images.iter().find(|image| image.kind == CLEAR_LOGO)
    }

    /// The path the server knows this item by: first media part for movies,
    /// first declared location for shows.
    pub fn remote_path(&self, kind: &SectionKind) -> Option<&str> {
        match kind {
            SectionKind::Movie => self.part_files.first(),
            SectionKind::Show => self.locations.first(),
            SectionKind::Other(_) => None,
        }
        .map(String::as_str)
        .filter(|path| !path.is_empty())
    }

    /// `Title (Year)`, or just the title when the year is unknown.
    pub fn display_name(&self) -> String {
        match self.year {
            Some(year) => format!("{} ({})", self.title, year),
            None => self.title.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie() -> MediaItem {
        MediaItem {
            rating_key: "1".into(),
            title: "Alpha".into(),
            year: Some(2020),
            item_type: "movie".into(),
            part_files: vec!["/media/movies/Alpha (2020)/movie.mkv".into()],
            locations: vec!["/media/movies/Alpha (2020)".into()],
            images: Vec::new(),
        }
    }

    #[test]
    fn test_remote_path_by_kind() {
        let item = movie();
        assert_eq!(
            item.remote_path(&SectionKind::Movie),
            Some("/media/movies/Alpha (2020)/movie.mkv")
        );
        assert_eq!(
            item.remote_path(&SectionKind::Show),
            Some("/media/movies/Alpha (2020)")
        );
        assert_eq!(item.remote_path(&SectionKind::Other("artist".into())), None);
    }

    #[test]
    fn test_remote_path_missing() {
        let mut item = movie();
        item.part_files.clear();
        assert_eq!(item.remote_path(&SectionKind::Movie), None);
    }

    #[test]
    fn test_clear_logo_detection() {
        let mut item = movie();
        assert!(!item.has_clear_logo());
        item.images.push(Image {
            kind: "coverPoster".into(),
            url: "/library/metadata/1/thumb/1".into(),
        });
        assert!(!item.has_clear_logo());
        item.images.push(Image {
            kind: CLEAR_LOGO.into(),
            url: "/library/metadata/1/clearLogo/2".into(),
        });
        assert!(item.has_clear_logo());
    }

    #[test]
    fn test_section_kind_eligibility() {
        assert!(SectionKind::from_plex("movie").is_eligible());
        assert!(SectionKind::from_plex("show").is_eligible());
        assert!(!SectionKind::from_plex("artist").is_eligible());
        assert_eq!(SectionKind::from_plex("photo").as_str(), "photo");
    }

    #[test]
    fn test_display_name() {
        let mut item = movie();
        assert_eq!(item.display_name(), "Alpha (2020)");
        item.year = None;
        assert_eq!(item.display_name(), "Alpha");
    }
}
