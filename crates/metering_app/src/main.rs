//! Host shell around the metering engine: one invocation is one page view.
mod config;
mod logging;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, Local, TimeZone};
use clap::{Parser, Subcommand};
use metering_core::{ContentId, ViewLedger};
use metering_engine::{FileLedgerStore, HtmlTruncator, LedgerStore, Meter};
use metering_logging::meter_info;

use config::AppConfig;
use logging::LogDestination;

#[derive(Debug, Parser)]
#[command(name = "metering_app", about = "Metered content gate for saved pages")]
struct Cli {
    /// RON file with the metering settings.
    #[arg(long)]
    config: PathBuf,
    /// Directory holding the reader's ledger.
    #[arg(long, default_value = ".metering")]
    store_dir: PathBuf,
    #[arg(long, value_enum, default_value_t = LogDestination::Terminal)]
    log: LogDestination,
    #[arg(short, long)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Meter one view of an HTML page and emit the page to serve.
    View {
        #[arg(long)]
        page: PathBuf,
        /// Write the result here instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
        /// Override the viewed content id from the config.
        #[arg(long)]
        post_id: Option<String>,
        /// Evaluate at this RFC 3339 instant instead of the local clock.
        #[arg(long, value_parser = parse_instant)]
        now: Option<DateTime<FixedOffset>>,
    },
    /// Show the reader's consumed and remaining views.
    Status {
        #[arg(long, value_parser = parse_instant)]
        now: Option<DateTime<FixedOffset>>,
    },
    /// Forget every recorded view.
    Reset,
}

fn parse_instant(raw: &str) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::initialize(cli.log, cli.verbose);

    let config = AppConfig::load(&cli.config)?;
    let store = FileLedgerStore::new(&cli.store_dir, &config.storage_key);

    match cli.command {
        Command::View {
            page,
            out,
            post_id,
            now,
        } => match now {
            Some(now) => view(&config, store, &page, out.as_deref(), post_id, &now),
            None => view(&config, store, &page, out.as_deref(), post_id, &Local::now()),
        },
        Command::Status { now } => {
            match now {
                Some(now) => status(&config, &store, &now),
                None => status(&config, &store, &Local::now()),
            }
            Ok(())
        }
        Command::Reset => {
            store.clear().context("failed to clear ledger")?;
            meter_info!("Cleared ledger at {:?}", store.path());
            Ok(())
        }
    }
}

fn view<Tz: TimeZone>(
    config: &AppConfig,
    store: FileLedgerStore,
    page: &Path,
    out: Option<&Path>,
    post_id: Option<String>,
    now: &DateTime<Tz>,
) -> Result<()> {
    let html = fs::read_to_string(page)
        .with_context(|| format!("failed to read page {}", page.display()))?;
    let settings = match post_id {
        Some(id) => config.metering.for_post(parse_content_id(&id)),
        None => config.metering.clone(),
    };

    let truncator = HtmlTruncator::new(&config.container_selector, &config.gate_class);
    let meter = Meter::new(store, truncator);
    let report = meter.view_page(&settings, &html, now);
    meter_info!(
        "Viewed {}: locked={} remaining={}",
        report.outcome.content_id,
        report.outcome.locked(),
        report.outcome.views_remaining()
    );

    match out {
        Some(path) => fs::write(path, &report.html)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => print!("{}", report.html),
    }
    Ok(())
}

fn status<Tz: TimeZone>(config: &AppConfig, store: &FileLedgerStore, now: &DateTime<Tz>) {
    let period = config.metering.period;
    let ledger = ViewLedger::load_or_fresh(store.load(), period, now)
        .rollover_if_expired(period, now);
    let used = ledger.views_used();
    let allowance = config.metering.count as usize;
    println!("period:     {period:?}");
    println!("used:       {used}/{allowance}");
    println!("remaining:  {}", allowance.saturating_sub(used));
    println!("expiration: {}", ledger.expiration);
    for id in &ledger.content {
        println!("  - {id}");
    }
}

/// Numeric ids stay numeric so they match what the host stored. Text that only
/// looks numeric ("007", "+7") keeps its spelling.
fn parse_content_id(raw: &str) -> ContentId {
    match raw.parse::<i64>() {
        Ok(number) if number.to_string() == raw => ContentId::Number(number.into()),
        _ => ContentId::from(raw),
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_content_id, Cli};
    use clap::CommandFactory;
    use metering_core::ContentId;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn numeric_post_ids_are_numbers() {
        assert_eq!(parse_content_id("42"), ContentId::from(42));
        assert_eq!(parse_content_id("-3"), ContentId::Number((-3i64).into()));
        assert_eq!(parse_content_id("post-42"), ContentId::from("post-42"));
    }

    #[test]
    fn numeric_looking_text_keeps_its_spelling() {
        assert_eq!(parse_content_id("007"), ContentId::from("007"));
        assert_eq!(parse_content_id("+7"), ContentId::from("+7"));
    }
}
