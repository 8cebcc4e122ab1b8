//! Remote-root to local-root mapping table and its JSON file.
//!
//! The table is kept ordered by descending remote-root length so nested
//! library locations are tried before any location that contains them.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::MappingError;
use crate::model::LibrarySection;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingEntry {
    pub remote_root: String,
    pub local_root: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationMap {
    entries: Vec<MappingEntry>,
}

impl LocationMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, R, L>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (R, L)>,
        R: Into<String>,
        L: Into<PathBuf>,
    {
        let mut map = Self::new();
        for (remote, local) in pairs {
            map.insert(remote, local);
        }
        map
    }

    /// Insert or replace the entry for `remote_root`.
    pub fn insert(&mut self, remote_root: impl Into<String>, local_root: impl Into<PathBuf>) {
        let remote_root = remote_root.into();
        let local_root = local_root.into();
        match self.entries.iter_mut().find(|e| e.remote_root == remote_root) {
            Some(entry) => entry.local_root = local_root,
            None => {
                self.entries.push(MappingEntry {
                    remote_root,
                    local_root,
                });
                self.sort();
            }
        }
    }

    pub fn contains(&self, remote_root: &str) -> bool {
        self.entries.iter().any(|e| e.remote_root == remote_root)
    }

    pub fn get(&self, remote_root: &str) -> Option<&Path> {
        self.entries
            .iter()
            .find(|e| e.remote_root == remote_root)
            .map(|e| e.local_root.as_path())
    }

    /// Entries, longest remote root first.
    pub fn entries(&self) -> &[MappingEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn sort(&mut self) {
        self.entries.sort_by(|a, b| {
            b.remote_root
                .len()
                .cmp(&a.remote_root.len())
                .then_with(|| a.remote_root.cmp(&b.remote_root))
        });
    }

    fn to_json_object(&self) -> BTreeMap<&str, String> {
        self.entries
            .iter()
            .map(|e| {
                (
                    e.remote_root.as_str(),
                    e.local_root.to_string_lossy().into_owned(),
                )
            })
            .collect()
    }
}

/// Supplies a local directory for a remote root that has no mapping yet.
///
/// Returning `None` (or a path that is not an existing directory) leaves the
/// root unmapped; items below it are then skipped during resolution.
pub trait MappingPrompter {
    fn local_root_for(&mut self, remote_root: &str) -> Option<String>;
}

impl<F> MappingPrompter for F
where
    F: FnMut(&str) -> Option<String>,
{
    fn local_root_for(&mut self, remote_root: &str) -> Option<String> {
        self(remote_root)
    }
}

/// Headless policy: never maps anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct SkipPrompter;

impl MappingPrompter for SkipPrompter {
    fn local_root_for(&mut self, remote_root: &str) -> Option<String> {
        tracing::warn!(remote_root, "No mapping for location and prompting is disabled");
        None
    }
}

/// JSON file holding the mapping between runs.
#[derive(Debug, Clone)]
pub struct MappingStore {
    path: PathBuf,
}

impl MappingStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted table, or an empty one when no file exists.
    pub fn load(&self) -> Result<LocationMap, MappingError> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(LocationMap::new()),
            Err(source) => {
                return Err(MappingError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let raw: BTreeMap<String, String> =
            serde_json::from_str(&data).map_err(|source| MappingError::Parse {
                path: self.path.clone(),
                source,
            })?;
        let map = LocationMap::from_pairs(raw);
        tracing::info!(path = %self.path.display(), entries = map.len(), "Loaded mappings");
        Ok(map)
    }

    /// Write the table as pretty JSON, replacing any previous file.
    pub fn persist(&self, map: &LocationMap) -> Result<(), MappingError> {
        let json =
            serde_json::to_string_pretty(&map.to_json_object()).map_err(MappingError::Encode)?;
        let io_err = |source| MappingError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, json).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)?;

        tracing::info!(path = %self.path.display(), entries = map.len(), "Saved mappings");
        Ok(())
    }

    /// Load the table; when it is empty, fill it from `prompter` for the
    /// eligible locations of `sections` and persist the result.
    pub fn load_or_populate(
        &self,
        sections: &[LibrarySection],
        prompter: &mut dyn MappingPrompter,
    ) -> Result<LocationMap, MappingError> {
        let mut map = self.load()?;
        if !map.is_empty() {
            println!("\n[+] Loaded mappings from {}", self.path.display());
            return Ok(map);
        }

        println!("\nEnter the local folder path corresponding to each Plex library location:");
        populate(&mut map, sections, prompter);
        self.persist(&map)?;
        println!("\n[+] Saved mappings to {}", self.path.display());
        Ok(map)
    }

    /// Delete the persisted table. Returns whether a file was removed.
    pub fn clear(&self) -> Result<bool, MappingError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(source) => Err(MappingError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

/// Ask `prompter` for every eligible remote root not already in `map`.
///
/// Answers that are not existing directories are skipped. Returns the number
/// of entries added.
pub fn populate(
    map: &mut LocationMap,
    sections: &[LibrarySection],
    prompter: &mut dyn MappingPrompter,
) -> usize {
    let mut added = 0;
    for section in sections.iter().filter(|s| s.kind.is_eligible()) {
        for remote_root in &section.locations {
            if map.contains(remote_root) {
                continue;
            }
            let Some(answer) = prompter.local_root_for(remote_root) else {
                continue;
            };
            let local = PathBuf::from(answer.trim());
            if local.as_os_str().is_empty() || !local.is_dir() {
                println!("[!] Invalid folder. Skipping this location.");
                tracing::debug!(remote_root, local = %local.display(), "Rejected mapping answer");
                continue;
            }
            map.insert(remote_root.clone(), local);
            added += 1;
        }
    }
    added
}
