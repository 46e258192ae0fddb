use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pubharvest::config::{get_config, load_config, Config};
use pubharvest::entrez::{DateWindow, EUtilsClient, Harvester};
use pubharvest::models::expand_authors;
use pubharvest::store::Store;
use pubharvest::utils::{normalize_date, prompt};
use pubharvest::{interchange, medline, ParsedRecord};

/// Harvest PubMed records and search them by author
#[derive(Parser, Debug)]
#[command(name = "pubharvest")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Harvest PubMed records via E-utilities, load them into SQLite, and search by author", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (can be used multiple times: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Search PubMed for a key term within a date window and write the
    /// accepted records to a CSV file
    Harvest {
        /// Key term to search (prompted for when omitted)
        #[arg(long)]
        term: Option<String>,

        /// Start date, MM/DD/YYYY (prompted for when omitted)
        #[arg(long)]
        mindate: Option<String>,

        /// End date, MM/DD/YYYY (prompted for when omitted)
        #[arg(long)]
        maxdate: Option<String>,

        /// Output CSV path
        #[arg(long, default_value = "publication_output.csv")]
        output: PathBuf,
    },

    /// Load a harvested CSV file into the publications database
    Load {
        /// Input CSV path
        #[arg(long, default_value = "publication_output.csv")]
        input: PathBuf,

        /// Database file (defaults to the configured path)
        #[arg(long)]
        db: Option<PathBuf>,
    },

    /// Look publications up by author name prefix
    Search {
        /// Author first name (prompted for when omitted)
        #[arg(long)]
        first: Option<String>,

        /// Author last name (prompted for when omitted)
        #[arg(long)]
        last: Option<String>,

        /// Database file (defaults to the configured path)
        #[arg(long)]
        db: Option<PathBuf>,
    },

    /// Harvest, load, and search in one pass
    Run {
        #[arg(long)]
        term: Option<String>,

        #[arg(long)]
        mindate: Option<String>,

        #[arg(long)]
        maxdate: Option<String>,

        /// Intermediate CSV path
        #[arg(long, default_value = "publication_output.csv")]
        output: PathBuf,

        #[arg(long)]
        db: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            tracing_subscriber::EnvFilter::new(format!("pubharvest={}", default_level))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => get_config(),
    };

    match cli.command {
        Commands::Harvest {
            term,
            mindate,
            maxdate,
            output,
        } => {
            harvest(&config, term, mindate, maxdate, &output)?;
        }
        Commands::Load { input, db } => {
            let db = db.unwrap_or_else(|| config.database.path.clone());
            load(&input, &db)?;
        }
        Commands::Search { first, last, db } => {
            let db = db.unwrap_or_else(|| config.database.path.clone());
            search(first, last, &db)?;
        }
        Commands::Run {
            term,
            mindate,
            maxdate,
            output,
            db,
        } => {
            let db = db.unwrap_or_else(|| config.database.path.clone());
            harvest(&config, term, mindate, maxdate, &output)?;
            load(&output, &db)?;
            search(None, None, &db)?;
        }
    }

    Ok(())
}

/// Prompt for any missing harvest inputs, run the crawl, and write the CSV.
fn harvest(
    config: &Config,
    term: Option<String>,
    mindate: Option<String>,
    maxdate: Option<String>,
    output: &PathBuf,
) -> Result<Vec<ParsedRecord>> {
    let term = match term {
        Some(term) => term,
        None => prompt("Key Word to search: ")?,
    };
    let mindate_raw = match mindate {
        Some(date) => date,
        None => prompt("Start date (MM/DD/YYYY): ")?,
    };
    let maxdate_raw = match maxdate {
        Some(date) => date,
        None => prompt("End date (MM/DD/YYYY): ")?,
    };

    let mindate = normalize_date(&mindate_raw)?;
    let maxdate = normalize_date(&maxdate_raw)?;
    let window = DateWindow::new(mindate, maxdate)?;

    let client = EUtilsClient::new(&config.entrez)?;
    let harvester =
        Harvester::new(&client).with_paging(config.harvest.id_cap, config.harvest.page_size);

    let raw = harvester.run(&term, &window)?;
    let accepted = medline::accept_records(&raw)?;

    interchange::write_csv(output, &accepted)
        .with_context(|| format!("failed to write {}", output.display()))?;

    println!("query outputted {} publications", accepted.len());
    println!("file written to {}", output.display());
    Ok(accepted)
}

/// Full-refresh load of a harvested CSV into the database.
fn load(input: &PathBuf, db: &PathBuf) -> Result<()> {
    let records = interchange::read_csv(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let authors = expand_authors(&records);

    let mut store = Store::open(db)?;
    store.create_tables()?;
    store.load(&records, &authors)?;

    println!(
        "loaded {} publications and {} author rows into {}",
        records.len(),
        authors.len(),
        db.display()
    );
    Ok(())
}

/// Prompt for any missing name parts and print the title of every hit.
fn search(first: Option<String>, last: Option<String>, db: &PathBuf) -> Result<()> {
    let first = match first {
        Some(first) => first,
        None => prompt("Enter first name of author you would like to search: ")?,
    };
    let last = match last {
        Some(last) => last,
        None => prompt("Enter last name of author you would like to search: ")?,
    };

    let store = Store::open(db)?;
    let hits = store.author_query(&first, &last)?;

    for hit in &hits {
        println!("{}", hit.title);
    }
    tracing::info!(hits = hits.len(), "author query complete");
    Ok(())
}
