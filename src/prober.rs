use std::path::{Path, PathBuf};

/// Base names in priority order.
pub const LOGO_BASENAMES: &[&str] = &["logo", "clearlogo"];
/// Extensions in priority order, tried for each base name.
pub const LOGO_EXTENSIONS: &[&str] = &["png", "jpg"];

/// Every candidate path, in the order they are tried.
pub fn candidates(dir: &Path) -> impl Iterator<Item = PathBuf> + '_ {
    LOGO_BASENAMES.iter().flat_map(move |base| {
        LOGO_EXTENSIONS
            .iter()
            .map(move |ext| dir.join(format!("{base}.{ext}")))
    })
}

/// First candidate that exists as a regular file.
pub fn probe(dir: &Path) -> Option<PathBuf> {
    candidates(dir).find(|candidate| candidate.is_file())
}
