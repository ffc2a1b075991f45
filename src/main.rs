//! ccg-remap - command-line entry point
//!
//! Subcommands mirror the pipeline stages:
//! - `fetch`: build a source catalog from the cards named in deck files
//! - `reshape`: turn a name-keyed card dump into a flat catalog
//! - `match`: map every source card to a target card
//! - `convert`: rewrite a directory of deck files through a mapping

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ccg_remap::core::config::{AcceptancePolicy, AppConfig, FailurePolicy, MatchConfig, Strictness};
use ccg_remap::deck::{convert_tree, DeckRewriter};
use ccg_remap::fetch::{FetchCache, ScryfallClient};
use ccg_remap::mapping::MappingTable;
use ccg_remap::matching::{MatchEngine, Strategy};
use ccg_remap::Catalog;

/// Command-line arguments for ccg-remap
#[derive(Parser, Debug)]
#[command(name = "ccg-remap")]
#[command(about = "Map deck lists from one card catalog onto another")]
#[command(version)]
struct Args {
    /// TOML file with [matching], [rewrite] and [fetch] tables
    #[arg(short, long, global = true, env = "CCG_REMAP_CONFIG")]
    config: Option<PathBuf>,

    /// Log at debug level (ignored when RUST_LOG is set)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Match a source catalog onto a target catalog and write the mapping
    Match {
        /// Source catalog (flat JSON list)
        #[arg(long)]
        source: PathBuf,

        /// Target catalog (flat JSON list)
        #[arg(long)]
        target: PathBuf,

        /// Mapping file to write
        #[arg(short, long, default_value = "mapping.json")]
        output: PathBuf,

        /// Initial fuzziness for the relaxation loop
        #[arg(long)]
        fuzziness: Option<f64>,

        /// Accept the highest-cost candidate when no exact cost match exists
        #[arg(long)]
        cost_relaxed: bool,

        /// Keep going past unmatched cards instead of stopping at the first
        #[arg(long)]
        skip_unmatched: bool,
    },

    /// Rewrite every deck file in a directory through a mapping
    Convert {
        /// Mapping file produced by `match`
        #[arg(long)]
        mapping: PathBuf,

        /// Target catalog, used for set codes of mapped cards
        #[arg(long)]
        target: Option<PathBuf>,

        /// Directory of deck files to read
        #[arg(long, env = "CCG_REMAP_INPUT_DIR")]
        input_dir: PathBuf,

        /// Directory to write converted decks to (cleared first)
        #[arg(long, env = "CCG_REMAP_OUTPUT_DIR")]
        output_dir: PathBuf,

        /// Copy unmapped card lines instead of failing
        #[arg(long)]
        lenient: bool,
    },

    /// Fetch every card named in a directory of deck files
    Fetch {
        /// Directory of deck files to scan
        #[arg(long)]
        deck_dir: PathBuf,

        /// Catalog file to create or extend
        #[arg(short, long, default_value = "all_cards.json")]
        output: PathBuf,
    },

    /// Convert a name-keyed card dump into a flat catalog
    Reshape {
        /// Name-keyed JSON object
        #[arg(long)]
        input: PathBuf,

        /// Flat catalog to write
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose { "ccg_remap=debug" } else { "ccg_remap=info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match &args.config {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AppConfig::default(),
    };

    match args.command {
        Command::Match {
            source,
            target,
            output,
            fuzziness,
            cost_relaxed,
            skip_unmatched,
        } => {
            let mut matching = config.matching;
            if let Some(fuzziness) = fuzziness {
                matching = matching.with_fuzziness(fuzziness);
            }
            if cost_relaxed {
                matching = matching.with_acceptance(AcceptancePolicy::CostRelaxed);
            }
            if skip_unmatched {
                matching = matching.with_failure_policy(FailurePolicy::Skip);
            }
            matching.validate().context("Invalid matching options")?;
            run_match(&source, &target, &output, matching)
        }
        Command::Convert {
            mapping,
            target,
            input_dir,
            output_dir,
            lenient,
        } => {
            let mut rewrite = config.rewrite;
            if lenient {
                rewrite = rewrite.with_strictness(Strictness::Lenient);
            }
            let mapping = MappingTable::load(&mapping)
                .with_context(|| format!("Failed to load mapping {}", mapping.display()))?;
            let target = target
                .map(|path| load_catalog(&path))
                .transpose()?;

            let mut rewriter = DeckRewriter::new(&mapping, &rewrite);
            if let Some(target) = &target {
                rewriter = rewriter.with_target(target);
            }

            let summary = convert_tree(&input_dir, &output_dir, &rewriter)
                .context("Deck conversion failed")?;
            for (path, diagnostic) in &summary.diagnostics {
                warn!(deck = %path.display(), "{}", diagnostic);
            }
            info!(files = summary.files, output = %output_dir.display(), "Decks converted");
            Ok(())
        }
        Command::Fetch { deck_dir, output } => {
            let client = ScryfallClient::new(config.fetch).context("Failed to create HTTP client")?;
            let mut cache = FetchCache::open(&output)
                .with_context(|| format!("Failed to open catalog {}", output.display()))?;
            let summary = cache
                .fill_from_decks(&deck_dir, &config.rewrite.deck_extension, &client)
                .context("Fetch failed")?;
            info!(
                fetched = summary.fetched,
                total = cache.catalog().len(),
                output = %output.display(),
                "Catalog updated"
            );
            Ok(())
        }
        Command::Reshape { input, output } => {
            let text = std::fs::read_to_string(&input)
                .with_context(|| format!("Failed to read {}", input.display()))?;
            let catalog = Catalog::from_keyed_json_str(&text)
                .with_context(|| format!("Failed to parse {}", input.display()))?;
            catalog
                .save(&output)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            info!(cards = catalog.len(), output = %output.display(), "Catalog reshaped");
            Ok(())
        }
    }
}

fn load_catalog(path: &Path) -> Result<Catalog> {
    Catalog::load(path).with_context(|| format!("Failed to load catalog {}", path.display()))
}

fn run_match(
    source: &Path,
    target: &Path,
    output: &Path,
    matching: MatchConfig,
) -> Result<()> {
    let source = load_catalog(source)?;
    let target = load_catalog(target)?;

    let report = MatchEngine::new(&target, matching).run(&source);

    // Partial mapping is written even when the run stopped early.
    report
        .mapping
        .save(output)
        .with_context(|| format!("Failed to write mapping {}", output.display()))?;

    for strategy in Strategy::ALL {
        info!(strategy = %strategy, matches = report.stats.count_for(strategy), "Strategy usage");
    }
    info!(
        mapped = report.mapping.len(),
        rate = %format!("{:.1}%", report.stats.match_rate() * 100.0),
        output = %output.display(),
        "Mapping written"
    );

    if report.aborted {
        let miss = report.into_result().err();
        match miss {
            Some(err) => return Err(err).context("Matching stopped at an unmatched card"),
            None => bail!("Matching stopped early"),
        }
    }
    if !report.is_complete() {
        warn!(unmatched = report.unmatched.len(), "Some cards were left unmapped");
    }
    Ok(())
}
