use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::blocking::{Client, Response};

use crate::error::TransferError;

const TIMEOUT: Duration = Duration::from_secs(60);

/// Stream `url` into `dest`, returning the number of bytes written.
///
/// The body goes to `<dest>.part` first and is renamed into place once
/// complete. A non-200 answer is reported as `TransferError::Status`; no
/// failure leaves a file behind.
pub fn download(client: &Client, url: &str, dest: &Path) -> Result<u64, TransferError> {
    let mut response = client.get(url).timeout(TIMEOUT).send()?;
    let status = response.status();
    if status != reqwest::StatusCode::OK {
        return Err(TransferError::Status(status.as_u16()));
    }

    let part = part_path(dest);
    let written = write_body(&mut response, &part).and_then(|n| {
        fs::rename(&part, dest).map_err(|source| TransferError::Io {
            path: dest.to_path_buf(),
            source,
        })?;
        Ok(n)
    });
    let written = match written {
        Ok(n) => n,
        Err(e) => {
            let _ = fs::remove_file(&part);
            return Err(e);
        }
    };

    tracing::debug!(url, dest = %dest.display(), bytes = written, "Downloaded");
    Ok(written)
}

fn part_path(dest: &Path) -> PathBuf {
    let mut name = OsString::from(dest.as_os_str());
    name.push(".part");
    PathBuf::from(name)
}

fn write_body(response: &mut Response, part: &Path) -> Result<u64, TransferError> {
    let io_err = |source| TransferError::Io {
        path: part.to_path_buf(),
        source,
    };
    let mut writer = BufWriter::new(File::create(part).map_err(io_err)?);
    let written = response.copy_to(&mut writer)?;
    writer.flush().map_err(io_err)?;
    Ok(written)
}

/// Where to save a downloaded logo: `target` itself, or
/// `target/<stem>.<ext>` when `target` is an existing directory.
pub fn destination(target: &Path, stem: &str, url: &str) -> PathBuf {
    if target.is_dir() {
        target.join(format!("{}.{}", sanitize_stem(stem), extension_from_url(url)))
    } else {
        target.to_path_buf()
    }
}

fn sanitize_stem(stem: &str) -> String {
    stem.chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c => c,
        })
        .collect()
}

/// Plex serves transcoded logos without an extension; assume PNG then.
fn extension_from_url(url: &str) -> &str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let last = path.rsplit('/').next().unwrap_or(path);
    match last.rsplit_once('.') {
        Some((_, ext)) if matches!(ext.to_ascii_lowercase().as_str(), "png" | "jpg" | "jpeg") => {
            ext
        }
        _ => "png",
    }
}
