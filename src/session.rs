//! Run controller: bulk sweeps and the interactive search session.

use std::io::{self, Write};

use crate::console::{Console, Selection};
use crate::error::ServerError;
use crate::mapping::LocationMap;
use crate::model::{LibrarySection, MediaItem};
use crate::plex::MediaServer;
use crate::processor::{ItemProcessor, Outcome, ProcessOptions, RunStats, Summary};

#[derive(Debug, Clone)]
pub struct SearchHit {
    pub item: MediaItem,
    /// Index into the section slice the search ran over.
    pub section: usize,
}

impl SearchHit {
    pub fn label(&self, sections: &[LibrarySection]) -> String {
        let section = &sections[self.section];
        let year = self.item.year.map(|y| y.to_string()).unwrap_or_default();
        format!(
            "{} ({}) [{}] - Library: {}",
            self.item.title, year, section.kind, section.title
        )
    }
}

/// Sections whose items can carry clear logos, in server order.
pub fn eligible_sections<S: MediaServer + ?Sized>(
    server: &S,
) -> Result<Vec<LibrarySection>, ServerError> {
    Ok(server
        .sections()?
        .into_iter()
        .filter(|s| s.kind.is_eligible())
        .collect())
}

/// Search every eligible section for `query`, keeping at most `max_results`
/// hits in section order.
pub fn search<S: MediaServer + ?Sized>(
    server: &S,
    sections: &[LibrarySection],
    query: &str,
    max_results: usize,
) -> Vec<SearchHit> {
    let mut hits = Vec::new();
    for (idx, section) in sections.iter().enumerate() {
        if !section.kind.is_eligible() {
            continue;
        }
        let items = match server.search(section, query) {
            Ok(items) => items,
            Err(e) => {
                println!("[!] Search failed in library {}: {}", section.title, e);
                tracing::warn!(section = %section.title, error = %e, "Search failed");
                continue;
            }
        };
        for item in items {
            if hits.len() >= max_results {
                println!(
                    "[!] Search result limit of {max_results} reached. Showing first {max_results} matches."
                );
                return hits;
            }
            hits.push(SearchHit { item, section: idx });
        }
    }
    hits
}

pub fn labels(hits: &[SearchHit], sections: &[LibrarySection]) -> Vec<String> {
    hits.iter().map(|hit| hit.label(sections)).collect()
}

/// One logical run of the local-logo sync. Statistics accumulate across
/// everything processed through the same session.
pub struct SyncSession<'a, S: MediaServer + ?Sized> {
    server: &'a S,
    sections: &'a [LibrarySection],
    map: &'a LocationMap,
    options: ProcessOptions,
    stats: RunStats,
}

impl<'a, S: MediaServer + ?Sized> SyncSession<'a, S> {
    pub fn new(
        server: &'a S,
        sections: &'a [LibrarySection],
        map: &'a LocationMap,
        options: ProcessOptions,
    ) -> Self {
        Self {
            server,
            sections,
            map,
            options,
            stats: RunStats::new(),
        }
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    pub fn summary(&self) -> Summary<'_> {
        Summary {
            stats: &self.stats,
            dry_run: self.options.dry_run,
        }
    }

    /// Process every item of every eligible section.
    pub fn run_bulk(&mut self) -> Vec<Outcome> {
        let processor = ItemProcessor::new(self.server, self.map, self.options);
        let verbose = self.options.verbose;
        let mut outcomes = Vec::new();

        println!("\nStarting logo upload process...\n");
        for section in self.sections.iter().filter(|s| s.kind.is_eligible()) {
            println!("Processing library: {} ({})", section.title, section.kind);
            let items = match self.server.items(section) {
                Ok(items) => items,
                Err(e) => {
                    println!("[!] Could not list library {}: {}", section.title, e);
                    tracing::warn!(section = %section.title, error = %e, "Listing failed");
                    continue;
                }
            };

            let count = items.len();
            for (idx, item) in items.iter().enumerate() {
                if !verbose {
                    print!("\r  Progress: {}/{} items", idx + 1, count);
                    let _ = io::stdout().flush();
                }
                outcomes.push(processor.process(&mut self.stats, item, section));
            }
            if !verbose {
                println!();
            }
        }
        outcomes
    }

    /// Query, pick, process; repeat while the operator asks for another.
    /// Overwrites existing logos and reports every item.
    pub fn run_search<C: Console + ?Sized>(
        &mut self,
        console: &mut C,
        max_results: usize,
    ) -> Vec<Outcome> {
        let options = ProcessOptions {
            force: true,
            verbose: true,
            ..self.options
        };
        let processor = ItemProcessor::new(self.server, self.map, options);
        let mut outcomes = Vec::new();

        loop {
            let Some(query) = console.prompt("\nEnter the title to search for: ") else {
                break;
            };
            let hits = search(self.server, self.sections, query.trim(), max_results);

            let chosen: Vec<&SearchHit> = match hits.len() {
                0 => {
                    println!("[!] No results found for that query.");
                    Vec::new()
                }
                1 => vec![&hits[0]],
                _ => match console.pick(&labels(&hits, self.sections), true) {
                    Selection::One(i) => hits.get(i).into_iter().collect(),
                    Selection::All => hits.iter().collect(),
                    Selection::Quit => {
                        println!("[!] No item selected.");
                        Vec::new()
                    }
                },
            };

            for hit in chosen {
                println!("\nSelected: {}", hit.item.display_name());
                let section = &self.sections[hit.section];
                outcomes.push(processor.process(&mut self.stats, &hit.item, section));
            }

            if !console.confirm("\nDo you want to update another ClearLogo?") {
                break;
            }
        }
        outcomes
    }
}
