use anyhow::Context;
use colored::Colorize;
use serde::Serialize;
use tracing::info;

use chanline_catalog::Catalog;
use chanline_graph::{propagate, Additions, UpgradeGraph};

use crate::cli::OutputFormat;
use crate::config::RunConfig;

/// What a run did, for reporting.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    /// Bundle records in the catalog.
    pub bundles: usize,
    /// Bundle records that gained channel entries.
    pub updated: usize,
    /// Whether the result was written.
    pub written: bool,
    pub additions: Additions,
}

/// Load, propagate, merge, and (unless dry-running) write the catalog.
///
/// Every failure happens before the write, so a failed run leaves the
/// target untouched.
pub fn run(config: &RunConfig) -> anyhow::Result<RunSummary> {
    let mut catalog = Catalog::load(&config.input)
        .with_context(|| format!("failed to load {}", config.input.display()))?;
    let bundles = catalog
        .bundles()
        .with_context(|| format!("failed to read bundles from {}", config.input.display()))?;

    let graph = UpgradeGraph::build(&bundles)?;
    let additions = propagate(&graph)?;
    let updated = catalog.apply(&additions)?;

    info!(
        bundles = bundles.len(),
        updated,
        entries = additions.total_entries(),
        "propagated channels"
    );

    let written = !config.dry_run;
    if written {
        let target = config.target();
        catalog
            .save(target)
            .with_context(|| format!("failed to write {}", target.display()))?;
    }

    Ok(RunSummary {
        bundles: bundles.len(),
        updated,
        written,
        additions,
    })
}

pub fn print_summary(summary: &RunSummary, format: &OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(summary)?),
        OutputFormat::Text => print_text(summary),
    }
    Ok(())
}

fn print_text(summary: &RunSummary) {
    if summary.additions.is_empty() {
        println!(
            "{} {} bundles, all channels already connected.",
            "✓".green().bold(),
            summary.bundles
        );
        return;
    }

    for (bundle, entries) in summary.additions.iter() {
        println!("{}", bundle.yellow().bold());
        for entry in entries {
            println!("  {} {}", "+".green(), entry);
        }
    }

    let verb = if summary.written { "Updated" } else { "Would update" };
    println!(
        "{} {} {} of {} bundles ({} channel entries).",
        "✓".green().bold(),
        verb,
        summary.updated.to_string().bold(),
        summary.bundles,
        summary.additions.total_entries()
    );
}
