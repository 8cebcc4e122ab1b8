//! Translate a server-side path into the local directory to search.
//!
//! Matching works on path segments, never raw string prefixes, so a root
//! `/media/movies` does not claim `/media/movies2/...`. Server paths may come
//! from a Windows host, so both `/` and `\` separate segments.

use std::path::PathBuf;

use crate::error::ResolveError;
use crate::mapping::{LocationMap, MappingEntry};
use crate::model::PathKeying;

fn segments(path: &str) -> Vec<&str> {
    path.split(['/', '\\']).filter(|s| !s.is_empty()).collect()
}

fn is_segment_prefix(root: &[&str], path: &[&str]) -> bool {
    root.len() <= path.len() && root.iter().zip(path).all(|(a, b)| a == b)
}

/// First entry (longest root first) whose root contains `remote_path`.
pub fn matching_entry<'a>(remote_path: &str, map: &'a LocationMap) -> Option<&'a MappingEntry> {
    let path = segments(remote_path);
    map.entries()
        .iter()
        .find(|entry| is_segment_prefix(&segments(&entry.remote_root), &path))
}

/// Compute the local directory that should hold the item's logo.
pub fn resolve(
    remote_path: &str,
    keying: PathKeying,
    map: &LocationMap,
) -> Result<PathBuf, ResolveError> {
    let entry = matching_entry(remote_path, map)
        .ok_or_else(|| ResolveError::NotFound(remote_path.to_string()))?;

    let path = segments(remote_path);
    let root = segments(&entry.remote_root);

    let dir: &[&str] = match keying {
        PathKeying::File => &path[..path.len().saturating_sub(1)],
        PathKeying::Folder => &path,
    };

    if !is_segment_prefix(&root, dir) {
        return Err(ResolveError::RelativePath {
            path: remote_path.to_string(),
            root: entry.remote_root.clone(),
        });
    }

    let relative = match &dir[root.len()..] {
        // Root points straight at the item folder: keep its name so the local
        // directory stays distinguishable.
        [] => path.last().map(std::slice::from_ref).unwrap_or_default(),
        rest => rest,
    };

    let mut local = entry.local_root.clone();
    local.extend(relative);
    Ok(local)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn movies_map() -> LocationMap {
        LocationMap::from_pairs([("/media/movies", "/local/movies")])
    }

    #[test]
    fn test_movie_file_resolves_to_its_folder() {
        let local = resolve(
            "/media/movies/Alpha (2020)/movie.mkv",
            PathKeying::File,
            &movies_map(),
        )
        .unwrap();
        assert_eq!(local, Path::new("/local/movies/Alpha (2020)"));
    }

    #[test]
    fn test_show_folder_resolves_to_itself() {
        let map = LocationMap::from_pairs([("/media/tv", "/local/tv")]);
        let local = resolve("/media/tv/Anime/Show A", PathKeying::Folder, &map).unwrap();
        assert_eq!(local, Path::new("/local/tv/Anime/Show A"));
    }

    #[test]
    fn test_longest_root_wins() {
        let map = LocationMap::from_pairs([
            ("/media", "/local/all"),
            ("/media/movies", "/local/movies"),
            ("/media/movies/kids", "/local/kids"),
        ]);
        let local = resolve("/media/movies/kids/Cars/cars.mkv", PathKeying::File, &map).unwrap();
        assert_eq!(local, Path::new("/local/kids/Cars"));

        let local = resolve("/media/movies/Heat/heat.mkv", PathKeying::File, &map).unwrap();
        assert_eq!(local, Path::new("/local/movies/Heat"));
    }

    #[test]
    fn test_segment_boundary_is_respected() {
        let map = LocationMap::from_pairs([("/media/movie", "/local/movie")]);
        let err = resolve("/media/movies2/X/x.mkv", PathKeying::File, &map).unwrap_err();
        assert_eq!(err, ResolveError::NotFound("/media/movies2/X/x.mkv".into()));
    }

    #[test]
    fn test_root_equal_to_item_folder_falls_back_to_last_segment() {
        let map = LocationMap::from_pairs([("/media/tv/Show A", "/local/show-a")]);
        let exact = resolve("/media/tv/Show A", PathKeying::Folder, &map).unwrap();
        assert_eq!(exact, Path::new("/local/show-a/Show A"));

        let nested = resolve("/media/tv/Show A/Specials", PathKeying::Folder, &map).unwrap();
        assert_eq!(nested, Path::new("/local/show-a/Specials"));
        assert_ne!(exact, nested);
    }

    #[test]
    fn test_movie_file_directly_in_root_uses_file_name() {
        let local = resolve("/media/movies/loose.mkv", PathKeying::File, &movies_map()).unwrap();
        assert_eq!(local, Path::new("/local/movies/loose.mkv"));
    }

    #[test]
    fn test_file_path_equal_to_root_is_relative_path_error() {
        let err = resolve("/media/movies", PathKeying::File, &movies_map()).unwrap_err();
        assert!(matches!(err, ResolveError::RelativePath { .. }));
    }

    #[test]
    fn test_windows_server_paths() {
        let map = LocationMap::from_pairs([("D:\\Media\\Movies", "/mnt/movies")]);
        let local = resolve("D:\\Media\\Movies\\Heat (1995)\\heat.mkv", PathKeying::File, &map)
            .unwrap();
        assert_eq!(local, Path::new("/mnt/movies/Heat (1995)"));
    }

    #[test]
    fn test_trailing_separator_on_root() {
        let map = LocationMap::from_pairs([("/media/movies/", "/local/movies")]);
        let local = resolve("/media/movies/Heat/heat.mkv", PathKeying::File, &map).unwrap();
        assert_eq!(local, Path::new("/local/movies/Heat"));
    }

    #[test]
    fn test_unmapped_path() {
        let err = resolve("/media/other/Gamma/show", PathKeying::Folder, &movies_map()).unwrap_err();
        assert!(matches!(err, ResolveError::NotFound(_)));
    }
}
