use anyhow::Result;
use clap::{Parser, Subcommand};
use log::{info, warn};
use std::time::Duration;
use tokio::runtime::Handle;

use item_dictionary::config::{Config, DEFAULT_CONFIG_PATH};
use item_dictionary::fetcher::{ApiClient, CatalogFetcher, RefreshOutcome, RefreshRequest};
use item_dictionary::{Dictionary, EntityKind, Filter, FilterOption};

#[derive(Parser)]
#[command(name = "item-dictionary")]
#[command(about = "Browse and filter the item and charm catalog")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH, global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Download the catalog and rebuild the local copy
    Fetch,
    /// List items matching the given filters
    Items {
        /// Case-insensitive name substring
        #[arg(short, long)]
        name: Option<String>,
        /// option:comparator:value[:constant], e.g. stat:gte:strength:5
        #[arg(short, long)]
        filter: Vec<Filter>,
        /// Print JSON instead of one line per item
        #[arg(long)]
        json: bool,
    },
    /// List charms matching the given filters
    Charms {
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        filter: Vec<Filter>,
        #[arg(long)]
        json: bool,
    },
    /// Print the distinct values seen for a facet
    Facets {
        kind: EntityKind,
        facet: FilterOption,
    },
    /// Write a default configuration file
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = Config::load(&cli.config).await;
    let config = loaded.as_ref().cloned().unwrap_or_default();
    init_logging(&config, cli.verbose);
    if let Err(e) = &loaded {
        warn!("Using default configuration ({}): {}", cli.config, e);
    }

    if let Commands::Init = cli.command {
        Config::create_default(&cli.config).await?;
        println!("Wrote default configuration to {}", cli.config);
        return Ok(());
    }

    let client = ApiClient::new(&config.api)?;
    let mut dictionary = Dictionary::from_config(&config, client, Handle::current());

    match cli.command {
        Commands::Fetch => fetch(&mut dictionary).await,
        Commands::Items { name, filter, json } => {
            dictionary.set_filters(EntityKind::Item, filter);
            dictionary.set_name_filter(EntityKind::Item, name);
            report_load_failure(&dictionary, EntityKind::Item);

            let items = dictionary.refresh_items();
            if json {
                println!("{}", serde_json::to_string_pretty(&items)?);
            } else {
                for item in &items {
                    println!(
                        "{} [{}] {} {}",
                        item.name,
                        item.item_type,
                        item.tier.as_deref().unwrap_or("-"),
                        item.region.as_deref().unwrap_or("-")
                    );
                }
                println!("{} items", items.len());
            }
            Ok(())
        }
        Commands::Charms { name, filter, json } => {
            dictionary.set_filters(EntityKind::Charm, filter);
            dictionary.set_name_filter(EntityKind::Charm, name);
            report_load_failure(&dictionary, EntityKind::Charm);

            let charms = dictionary.refresh_charms();
            if json {
                println!("{}", serde_json::to_string_pretty(&charms)?);
            } else {
                for charm in &charms {
                    println!(
                        "{} [{} {}] power {} {}",
                        charm.name, charm.tier, charm.class_name, charm.power, charm.location
                    );
                }
                println!("{} charms", charms.len());
            }
            Ok(())
        }
        Commands::Facets { kind, facet } => {
            match dictionary.facet_values(kind, facet) {
                Some(values) => values.iter().for_each(|value| println!("{}", value)),
                None => warn!("{:?} has no {} facet", kind, facet),
            }
            Ok(())
        }
        Commands::Init => Ok(()),
    }
}

async fn fetch(dictionary: &mut Dictionary<ApiClient>) -> Result<()> {
    if dictionary.request_catalog_refresh() == RefreshRequest::AlreadyInFlight {
        return Ok(());
    }

    let mut ticker = tokio::time::interval(Duration::from_millis(50));
    loop {
        ticker.tick().await;
        match dictionary.tick() {
            Some(RefreshOutcome::Updated { items, charms }) => {
                println!("Catalog updated: {} items, {} charms", items, charms);
                return Ok(());
            }
            Some(RefreshOutcome::Failed(e)) => return Err(e.into()),
            None => {}
        }
    }
}

fn report_load_failure<F: CatalogFetcher>(dictionary: &Dictionary<F>, kind: EntityKind) {
    if dictionary.load_failed(kind) {
        warn!("Stored {:?} catalog failed to load; run `fetch` to retry", kind);
    }
    let skipped = dictionary.load_report(kind).skipped.len();
    if skipped > 0 {
        info!("{} {:?} records were skipped while loading", skipped, kind);
    }
}

fn init_logging(config: &Config, verbosity: u8) {
    let mut builder = env_logger::Builder::new();
    // CLI verbosity raises the configured level
    let base_level = match verbosity {
        0 => config.logging.level_filter(),
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);
    if let Ok(spec) = std::env::var("RUST_LOG") {
        builder.parse_filters(&spec);
    }
    builder.format_timestamp_secs();
    builder.init();
}
