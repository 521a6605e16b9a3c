// Host entry point: read run input, search, emit one JSON line per record.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use tender_search::{IndustryTemplates, ScoringCriteria, SearchParams};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "tender-actor", about = "TED.EU tender search actor")]
struct Args {
    /// Path to the run input JSON; reads stdin when omitted.
    #[arg(long)]
    input: Option<PathBuf>,

    /// Write result records here instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,
}

/// Run input schema: search parameters plus the optional template and
/// scoring-weight overrides. Unspecified fields keep the engine defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RunInput {
    industry_template: Option<String>,
    scoring_criteria: HashMap<String, u32>,
    #[serde(flatten)]
    search: SearchParams,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tender_search=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    tracing::info!("Starting TED.EU tender search actor");

    let mut input = read_input(args.input.as_ref()).context("Failed to read run input")?;

    // A non-custom template overrides keywords and CPV codes when it
    // resolves to non-empty sets.
    if let Some(name) = input.industry_template.as_deref() {
        if name != "custom" {
            tracing::info!(template = name, "Applying industry template");
            let keywords = IndustryTemplates::get_keywords(name);
            if !keywords.is_empty() {
                input.search.search_keywords = keywords;
            }
            let cpv_codes = IndustryTemplates::get_cpv_codes(name);
            if !cpv_codes.is_empty() {
                input.search.cpv_codes = cpv_codes;
            }
        }
    }

    let criteria = ScoringCriteria::with_overrides(&input.scoring_criteria);
    tracing::info!(
        keywords = ?input.search.search_keywords,
        cpv_codes = ?input.search.cpv_codes,
        countries = ?input.search.countries,
        year_from = input.search.year_from,
        year_to = input.search.year_to,
        active_only = input.search.active_only,
        max_results = input.search.max_results,
        "Search parameters"
    );

    let client = ted_client::TedClient::new().context("Failed to build TED client")?;
    let results = tender_search::search_tenders(&client, &input.search, &criteria).await;
    tracing::info!(count = results.len(), "Search finished");

    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).context("Failed to create output file")?,
        )),
        None => Box::new(std::io::stdout().lock()),
    };

    for (i, record) in results.iter().enumerate() {
        let line = serde_json::to_string(record).context("Failed to encode record")?;
        writeln!(out, "{line}")?;
        if (i + 1) % 10 == 0 {
            tracing::info!(pushed = i + 1, total = results.len(), "Pushing records");
        }
    }

    match tender_search::summarize(&results, &input.search) {
        Some(summary) => {
            tracing::info!(
                total_found = summary.total_found,
                average_score = summary.average_score,
                high_relevance = summary.high_relevance_count,
                active = summary.active_count,
                "Search summary"
            );
            let line = serde_json::to_string(&summary).context("Failed to encode summary")?;
            writeln!(out, "{line}")?;
        }
        None => tracing::info!("No tenders found matching criteria"),
    }
    out.flush()?;

    Ok(())
}

fn read_input(path: Option<&PathBuf>) -> Result<RunInput> {
    let text = match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    if text.trim().is_empty() {
        return Ok(RunInput::default());
    }
    serde_json::from_str(&text).context("Run input is not valid JSON")
}
