//! Incremental on-disk catalog built from remote lookups.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use super::scryfall::CardSource;
use crate::cards::Catalog;
use crate::deck::referenced_names;
use crate::error::{Error, FetchError, Result};

/// Outcome of `FetchCache::fill_from_decks`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FillSummary {
    pub decks_read: usize,
    pub fetched: usize,
    pub already_cached: usize,
    /// Names the remote source does not know.
    pub not_found: Vec<String>,
}

/// A catalog file that grows one fetched record at a time.
///
/// The file is rewritten after every new record, so an interrupted run
/// keeps everything fetched so far and the next run skips it.
#[derive(Debug)]
pub struct FetchCache {
    path: PathBuf,
    catalog: Catalog,
}

impl FetchCache {
    /// Open the cache at `path`, starting empty if the file does not exist.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let catalog = if path.exists() { Catalog::load(&path)? } else { Catalog::new() };
        debug!(path = %path.display(), cached = catalog.len(), "Opened fetch cache");
        Ok(Self { path, catalog })
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn into_catalog(self) -> Catalog {
        self.catalog
    }

    /// Make sure `name` is cached. Returns whether a new record was stored.
    ///
    /// A name counts as cached when it matches a stored record's name, or
    /// one face of a `//` name, ignoring case. The remote may answer with a
    /// canonical name that differs from the request; that name is only
    /// stored once.
    pub fn ensure(&mut self, name: &str, source: &dyn CardSource) -> Result<bool> {
        if self.is_cached(name) {
            return Ok(false);
        }

        let card = source.fetch(name)?;
        if card.name != name {
            debug!(requested = name, returned = %card.name, "Remote returned a different canonical name");
        }
        if self.catalog.contains(&card.name) {
            return Ok(false);
        }
        self.catalog.push(card);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        self.catalog.save(&self.path)?;
        Ok(true)
    }

    fn is_cached(&self, name: &str) -> bool {
        self.catalog.contains(name)
            || self.catalog.iter().any(|card| {
                same_name(&card.name, name) || card.name.split("//").any(|face| same_name(face.trim(), name))
            })
    }

    /// Fetch every card referenced by the deck files under `dir`.
    ///
    /// Unknown names are collected in the summary. Any other fetch failure
    /// stops the fill; records fetched before it stay on disk.
    pub fn fill_from_decks(&mut self, dir: &Path, extension: &str, source: &dyn CardSource) -> Result<FillSummary> {
        let mut summary = FillSummary::default();

        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry.map_err(|e| Error::Io(e.into()))?;
            let path = entry.path();
            if !entry.file_type().is_file() || path.extension().and_then(|e| e.to_str()) != Some(extension) {
                continue;
            }

            summary.decks_read += 1;
            let text = fs::read_to_string(path)?;
            for name in referenced_names(&text) {
                match self.ensure(name, source) {
                    Ok(true) => summary.fetched += 1,
                    Ok(false) => summary.already_cached += 1,
                    Err(Error::Fetch(FetchError::NotFound(missing))) => {
                        warn!(card = %missing, deck = %path.display(), "Card not found remotely");
                        if !summary.not_found.contains(&missing) {
                            summary.not_found.push(missing);
                        }
                    }
                    Err(err) => return Err(err),
                }
            }
        }

        info!(
            decks = summary.decks_read,
            fetched = summary.fetched,
            cached = self.catalog.len(),
            not_found = summary.not_found.len(),
            "Fetch finished"
        );
        Ok(summary)
    }
}

/// Case-insensitive name comparison.
fn same_name(a: &str, b: &str) -> bool {
    a.chars().flat_map(char::to_lowercase).eq(b.chars().flat_map(char::to_lowercase))
}
