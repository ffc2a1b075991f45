//! Directory-level deck conversion.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use super::rewriter::DeckRewriter;
use crate::error::{DeckError, Error, Result};

/// Totals for one `convert_tree` call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TreeSummary {
    /// Deck files written.
    pub files: usize,
    /// Card lines rewritten through the mapping.
    pub mapped_lines: usize,
    /// Basic land lines rewritten.
    pub basic_lines: usize,
    /// Lines passed through under lenient rewriting, with their file.
    pub diagnostics: Vec<(PathBuf, DeckError)>,
}

/// Rewrite every deck file under `input` into the same relative path under
/// `output`.
///
/// `output` is cleared first. Files without the configured extension are
/// ignored. The first failing deck aborts the run and is reported with its
/// path.
pub fn convert_tree(input: &Path, output: &Path, rewriter: &DeckRewriter<'_>) -> Result<TreeSummary> {
    if output.starts_with(input) || input.starts_with(output) {
        return Err(Error::Config(format!(
            "output directory {} overlaps input directory {}",
            output.display(),
            input.display()
        )));
    }

    if output.exists() {
        debug!(path = %output.display(), "Clearing output directory");
        fs::remove_dir_all(output)?;
    }
    fs::create_dir_all(output)?;

    let extension = rewriter.config().deck_extension.as_str();
    let mut summary = TreeSummary::default();

    for entry in WalkDir::new(input).sort_by_file_name() {
        let entry = entry.map_err(|e| Error::Io(e.into()))?;
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().and_then(|e| e.to_str()) != Some(extension) {
            continue;
        }

        let relative = path.strip_prefix(input).unwrap_or(path);
        let destination = output.join(relative);

        let text = fs::read_to_string(path)?;
        let deck = rewriter.rewrite(&text).map_err(|source| Error::Deck {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&destination, deck.to_text())?;
        debug!(from = %path.display(), to = %destination.display(), "Converted deck");

        summary.files += 1;
        summary.mapped_lines += deck.mapped;
        summary.basic_lines += deck.basics;
        summary
            .diagnostics
            .extend(deck.diagnostics.into_iter().map(|d| (path.to_path_buf(), d)));
    }

    info!(
        files = summary.files,
        mapped = summary.mapped_lines,
        basics = summary.basic_lines,
        passed_through = summary.diagnostics.len(),
        "Deck conversion finished"
    );
    Ok(summary)
}
