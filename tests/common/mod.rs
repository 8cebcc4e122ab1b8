// Shared fixtures for the integration tests: an in-memory media server and a
// console that replays scripted answers.
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};

use plex_clearlogo::console::{Console, Selection, pick_numbered};
use plex_clearlogo::error::{ServerError, UploadError};
use plex_clearlogo::model::{CLEAR_LOGO, Image, LibrarySection, MediaItem, SectionKind};
use plex_clearlogo::plex::MediaServer;

#[derive(Debug, Clone, Copy)]
pub enum Failure {
    Rejected,
    Unsupported,
}

#[derive(Default)]
pub struct FakeServer {
    pub sections: Vec<LibrarySection>,
    items: RefCell<HashMap<String, Vec<MediaItem>>>,
    failures: HashMap<String, Failure>,
    /// Successful uploads attach a clear logo to the stored item.
    pub record_logos: bool,
    pub uploads: RefCell<Vec<(String, PathBuf)>>,
    pub url_uploads: RefCell<Vec<(String, String)>>,
}

impl FakeServer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_section(mut self, section: LibrarySection, items: Vec<MediaItem>) -> Self {
        self.items.get_mut().insert(section.key.clone(), items);
        self.sections.push(section);
        self
    }

    pub fn failing(mut self, rating_key: &str, failure: Failure) -> Self {
        self.failures.insert(rating_key.to_string(), failure);
        self
    }

    pub fn recording_logos(mut self) -> Self {
        self.record_logos = true;
        self
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.borrow().len()
    }

    fn fail(&self, item: &MediaItem) -> Result<(), UploadError> {
        match self.failures.get(&item.rating_key) {
            Some(Failure::Rejected) => Err(UploadError::Rejected {
                status: 400,
                message: "Bad Request".into(),
            }),
            Some(Failure::Unsupported) => Err(UploadError::Unsupported {
                item_type: item.item_type.clone(),
            }),
            None => Ok(()),
        }
    }

    fn attach_logo(&self, rating_key: &str) {
        if !self.record_logos {
            return;
        }
        for items in self.items.borrow_mut().values_mut() {
            for item in items.iter_mut().filter(|i| i.rating_key == rating_key) {
                item.images.push(Image {
                    kind: CLEAR_LOGO.into(),
                    url: format!("/library/metadata/{rating_key}/clearLogo/1"),
                });
            }
        }
    }
}

impl MediaServer for FakeServer {
    fn sections(&self) -> Result<Vec<LibrarySection>, ServerError> {
        Ok(self.sections.clone())
    }

    fn items(&self, section: &LibrarySection) -> Result<Vec<MediaItem>, ServerError> {
        Ok(self
            .items
            .borrow()
            .get(&section.key)
            .cloned()
            .unwrap_or_default())
    }

    fn search(
        &self,
        section: &LibrarySection,
        query: &str,
    ) -> Result<Vec<MediaItem>, ServerError> {
        let query = query.to_lowercase();
        Ok(self
            .items(section)?
            .into_iter()
            .filter(|i| i.title.to_lowercase().contains(&query))
            .collect())
    }

    fn upload_logo(&self, item: &MediaItem, file: &Path) -> Result<(), UploadError> {
        self.fail(item)?;
        self.uploads
            .borrow_mut()
            .push((item.rating_key.clone(), file.to_path_buf()));
        self.attach_logo(&item.rating_key);
        Ok(())
    }

    fn upload_logo_from_url(&self, item: &MediaItem, url: &str) -> Result<(), UploadError> {
        self.fail(item)?;
        self.url_uploads
            .borrow_mut()
            .push((item.rating_key.clone(), url.to_string()));
        self.attach_logo(&item.rating_key);
        Ok(())
    }

    fn image_url(&self, image: &Image) -> String {
        format!("http://plex.test{}?X-Plex-Token=tok", image.url)
    }
}

pub struct ScriptedConsole {
    answers: VecDeque<String>,
    pub prompts: Vec<String>,
}

impl ScriptedConsole {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|s| s.to_string()).collect(),
            prompts: Vec::new(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl Console for ScriptedConsole {
    fn prompt(&mut self, message: &str) -> Option<String> {
        self.prompts.push(message.to_string());
        self.answers.pop_front()
    }

    fn pick(&mut self, labels: &[String], allow_all: bool) -> Selection {
        pick_numbered(self, labels, allow_all)
    }
}

pub fn section(key: &str, title: &str, kind: SectionKind, locations: &[&str]) -> LibrarySection {
    LibrarySection {
        key: key.into(),
        title: title.into(),
        kind,
        locations: locations.iter().map(|s| s.to_string()).collect(),
    }
}

pub fn movie(rating_key: &str, title: &str, year: u32, file: &str) -> MediaItem {
    MediaItem {
        rating_key: rating_key.into(),
        title: title.into(),
        year: Some(year),
        item_type: "movie".into(),
        part_files: vec![file.into()],
        locations: Vec::new(),
        images: Vec::new(),
    }
}

pub fn show(rating_key: &str, title: &str, folder: &str) -> MediaItem {
    MediaItem {
        rating_key: rating_key.into(),
        title: title.into(),
        year: None,
        item_type: "show".into(),
        part_files: Vec::new(),
        locations: vec![folder.into()],
        images: Vec::new(),
    }
}

pub fn with_logo(mut item: MediaItem) -> MediaItem {
    item.images.push(Image {
        kind: CLEAR_LOGO.into(),
        url: format!("/library/metadata/{}/clearLogo/9", item.rating_key),
    });
    item
}

/// Create `root/rel/name` with some bytes, making parent folders.
pub fn touch(root: &Path, rel: &str, name: &str) -> PathBuf {
    let dir = root.join(rel);
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    fs::write(&path, b"\x89PNG").unwrap();
    path
}
