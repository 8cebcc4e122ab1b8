//! Logo URL lookup and apply-from-URL sessions.

use std::path::Path;

use reqwest::blocking::Client;

use crate::console::{Console, Selection};
use crate::error::UploadError;
use crate::model::{LibrarySection, MediaItem};
use crate::plex::MediaServer;
use crate::session::{self, SearchHit};
use crate::transfer;

/// How strictly an item is chosen before acting on it.
#[derive(Debug, Clone, Copy, Default)]
struct Choosing {
    /// Ask for an optional release year and keep only items from that year.
    ask_year: bool,
    /// Ask for confirmation when the search yields a single item.
    confirm_single: bool,
}

/// Read an optional year. `None` at end of input; blank means no filter.
fn prompt_year<C: Console + ?Sized>(console: &mut C) -> Option<Option<u32>> {
    loop {
        let answer = console.prompt("Enter the release year (optional, press Enter to skip): ")?;
        let answer = answer.trim();
        if answer.is_empty() {
            return Some(None);
        }
        match answer.parse() {
            Ok(year) => return Some(Some(year)),
            Err(_) => println!("[!] Invalid year format."),
        }
    }
}

/// Prompt for a query (unless one is pending), search, and let the operator
/// pick exactly one item.
fn choose_one<S, C>(
    server: &S,
    sections: &[LibrarySection],
    console: &mut C,
    pending_query: &mut Option<String>,
    max_results: usize,
    choosing: Choosing,
) -> Option<SearchHit>
where
    S: MediaServer + ?Sized,
    C: Console + ?Sized,
{
    let query = match pending_query.take() {
        Some(query) => query,
        None => console.prompt("Enter the title to search for: ")?,
    };
    let year = if choosing.ask_year {
        prompt_year(console)?
    } else {
        None
    };

    let mut hits = session::search(server, sections, query.trim(), max_results);
    if let Some(year) = year {
        hits.retain(|hit| hit.item.year == Some(year));
    }
    if hits.is_empty() {
        println!("[!] No results found.");
        return None;
    }

    if choosing.confirm_single && hits.len() == 1 {
        let hit = hits.swap_remove(0);
        println!(
            "\nFound {}: {}",
            sections[hit.section].kind,
            hit.item.display_name()
        );
        if console.confirm("Is this correct?") {
            return Some(hit);
        }
        println!("Okay, item not confirmed.");
        return None;
    }

    match console.pick(&session::labels(&hits, sections), false) {
        Selection::One(i) if i < hits.len() => {
            let hit = hits.swap_remove(i);
            println!("\nSelected: {}", hit.item.display_name());
            Some(hit)
        }
        _ => {
            println!("[!] No item selected.");
            None
        }
    }
}

/// Print the tokenised clear logo URL of a chosen item, optionally saving the
/// image, until the operator stops.
pub fn run_lookup<S, C>(
    server: &S,
    sections: &[LibrarySection],
    console: &mut C,
    http: &Client,
    mut query: Option<String>,
    download_to: Option<&Path>,
    max_results: usize,
) where
    S: MediaServer + ?Sized,
    C: Console + ?Sized,
{
    loop {
        let found = choose_one(
            server,
            sections,
            console,
            &mut query,
            max_results,
            Choosing::default(),
        );
        if let Some(hit) = found {
            report_logo_url(server, http, &hit.item, download_to);
        }
        if !console.confirm("\nDo you want to search for another ClearLogo?") {
            break;
        }
    }
}

/// Returns the URL that was reported, if the item has a logo.
pub fn report_logo_url<S: MediaServer + ?Sized>(
    server: &S,
    http: &Client,
    item: &MediaItem,
    download_to: Option<&Path>,
) -> Option<String> {
    let Some(image) = item.clear_logo() else {
        println!("[!] No clearlogo image found for this item.");
        return None;
    };
    let url = server.image_url(image);
    println!("\nClearLogo image URL:\n{url}");

    if let Some(target) = download_to {
        let dest = transfer::destination(target, &item.title, &url);
        match transfer::download(http, &url, &dest) {
            Ok(bytes) => println!("[+] Logo downloaded to: {} ({} bytes)", dest.display(), bytes),
            Err(e) => {
                println!("[!] Failed to download image: {e}");
                tracing::warn!(title = %item.title, error = %e, "Logo download failed");
            }
        }
    }
    Some(url)
}

pub fn is_http_url(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Have the server fetch a logo from a URL the operator types in, until the
/// operator stops. Items can be narrowed by year, and a lone search result
/// must be confirmed before anything is applied.
pub fn run_apply<S, C>(
    server: &S,
    sections: &[LibrarySection],
    console: &mut C,
    dry_run: bool,
    max_results: usize,
) where
    S: MediaServer + ?Sized,
    C: Console + ?Sized,
{
    let choosing = Choosing {
        ask_year: true,
        confirm_single: true,
    };
    let mut query = None;
    loop {
        let found = choose_one(server, sections, console, &mut query, max_results, choosing);
        if let Some(hit) = found {
            if apply_from_url(server, console, &hit.item, dry_run) {
                println!("\n[+] Logo updated successfully for '{}'.", hit.item.title);
            } else {
                println!("\n[!] Logo update did not complete for '{}'.", hit.item.title);
            }
        }
        if !console.confirm("\nDo you want to update another logo?") {
            break;
        }
    }
}

/// Returns whether the server accepted a logo for `item`.
pub fn apply_from_url<S, C>(server: &S, console: &mut C, item: &MediaItem, dry_run: bool) -> bool
where
    S: MediaServer + ?Sized,
    C: Console + ?Sized,
{
    loop {
        let message = format!(
            "Enter the URL for the logo image for '{}' (or press Enter to cancel): ",
            item.title
        );
        let url = match console.prompt(&message) {
            Some(url) if !url.trim().is_empty() => url.trim().to_string(),
            _ => {
                println!("Logo update cancelled.");
                return false;
            }
        };
        if !is_http_url(&url) {
            println!("[!] Invalid URL format.");
            continue;
        }

        if dry_run {
            println!("[DRY RUN] Would apply logo from {} to '{}'", url, item.title);
            return true;
        }

        println!("Applying logo from {} to '{}'...", url, item.title);
        match server.upload_logo_from_url(item, &url) {
            Ok(()) => {
                tracing::info!(title = %item.title, url, "Applied logo from URL");
                return true;
            }
            Err(e @ UploadError::Rejected { .. }) => {
                println!("\n[!] Error applying logo: {e}");
                println!("This often means the URL was invalid, the format unsupported, or the fetch failed.");
                if !console.confirm("Do you want to try a different URL?") {
                    return false;
                }
            }
            Err(e @ UploadError::Unsupported { .. }) => {
                println!("\n[!] {e}");
                return false;
            }
            Err(e) => {
                println!("\n[!] Unexpected error during logo upload: {e}");
                tracing::warn!(title = %item.title, error = %e, "Apply from URL failed");
                if !console.confirm("Do you want to try applying the logo again?") {
                    return false;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_http_url() {
        assert!(is_http_url("https://assets.example/logo.png"));
        assert!(is_http_url("HTTP://assets.example/logo.png"));
        assert!(!is_http_url("ftp://assets.example/logo.png"));
        assert!(!is_http_url("/local/logo.png"));
    }
}
