use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use property_catalog::normalize::{explain, format_price};
use property_catalog::sources::{load_term_index, CatalogQuery, PropertySource, SampleSource, WordPressSource};
use property_catalog::{
    compute_stats, filter, group_by, sort_by, to_card_with_terms, to_detail_with_terms, Config, GroupKey,
    PropertyCard, PropertyFilter, RetryPolicy, SortBy, TermIndex,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Fetch, shape and summarize real-estate listings from the CMS
#[derive(Debug, Parser)]
#[command(name = "property-catalog", version)]
struct Cli {
    /// Use the bundled sample listings instead of the CMS
    #[arg(long, global = true)]
    sample: bool,

    /// CMS root URL (overrides CMS_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Attempts per request (overrides CMS_MAX_RETRIES)
    #[arg(long, global = true)]
    max_retries: Option<u32>,

    /// Backoff unit in milliseconds (overrides CMS_RETRY_DELAY_MS)
    #[arg(long, global = true)]
    retry_delay_ms: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List property cards
    List(ListArgs),
    /// Show one property in full
    Show {
        slug: String,
    },
    /// Print statistics for the (filtered) listing
    Stats(FilterArgs),
    /// Report where each field of a record was found
    Explain {
        /// Record to inspect; defaults to the first listed property
        #[arg(long)]
        slug: Option<String>,
    },
}

#[derive(Debug, Args)]
struct ListArgs {
    #[command(flatten)]
    filter: FilterArgs,

    /// price-asc, price-desc, date or title
    #[arg(long)]
    sort: Option<SortBy>,

    /// type, status, city, bedrooms or bathrooms
    #[arg(long)]
    group_by: Option<GroupKey>,

    /// Write the resulting cards to this JSON file
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct FilterArgs {
    #[arg(long)]
    min_price: Option<f64>,
    #[arg(long)]
    max_price: Option<f64>,
    #[arg(long)]
    min_bedrooms: Option<f64>,
    #[arg(long)]
    max_bedrooms: Option<f64>,
    #[arg(long = "type")]
    property_type: Option<String>,
    #[arg(long)]
    status: Option<String>,
    #[arg(long)]
    city: Option<String>,
    /// Case-insensitive match on title or address
    #[arg(long)]
    search: Option<String>,
}

impl FilterArgs {
    fn to_filter(&self) -> PropertyFilter {
        PropertyFilter {
            min_price: self.min_price,
            max_price: self.max_price,
            min_bedrooms: self.min_bedrooms,
            max_bedrooms: self.max_bedrooms,
            property_type: self.property_type.clone(),
            status: self.status.clone(),
            city: self.city.clone(),
            search: self.search.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("property_catalog=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let source: Box<dyn PropertySource> = match (&config.base_url, cli.sample) {
        (Some(base_url), false) => Box::new(WordPressSource::with_settings(
            base_url,
            config.timeout,
            config.retry,
        )?),
        (None, false) => {
            warn!("CMS_BASE_URL is not set, falling back to sample data");
            Box::new(SampleSource::new()?)
        }
        (_, true) => Box::new(SampleSource::new()?),
    };

    info!("🏠 Property Catalog - {} source", source.source_name());
    info!("==========================================");

    let terms = load_term_index(source.as_ref()).await;
    let query = CatalogQuery {
        per_page: config.per_page,
        max_pages: config.max_pages,
        search: None,
    };

    match cli.command {
        Command::List(args) => list(source.as_ref(), &terms, &query, &config, args).await,
        Command::Show { slug } => show(source.as_ref(), &terms, &slug).await,
        Command::Stats(args) => stats(source.as_ref(), &terms, &query, &config, &args).await,
        Command::Explain { slug } => explain_record(source.as_ref(), &terms, slug.as_deref()).await,
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::from_env()?;

    if let Some(base_url) = &cli.base_url {
        config.base_url = Some(base_url.clone());
    }
    config.retry = RetryPolicy::new(
        cli.max_retries.unwrap_or(config.retry.max_retries),
        cli.retry_delay_ms
            .map(Duration::from_millis)
            .unwrap_or(config.retry.base_delay),
    );

    Ok(config)
}

async fn fetch_cards(source: &dyn PropertySource, terms: &TermIndex, query: &CatalogQuery) -> Result<Vec<PropertyCard>> {
    let raw = source.fetch_properties(query).await?;
    Ok(raw.iter().map(|record| to_card_with_terms(record, terms)).collect())
}

async fn list(
    source: &dyn PropertySource,
    terms: &TermIndex,
    query: &CatalogQuery,
    config: &Config,
    args: ListArgs,
) -> Result<()> {
    let cards = fetch_cards(source, terms, query).await?;
    let mut cards = filter(&cards, &args.filter.to_filter());
    if let Some(order) = args.sort {
        cards = sort_by(&cards, order);
    }

    info!("\n✅ {} properties match\n", cards.len());

    match args.group_by {
        Some(key) => {
            for (bucket, members) in group_by(&cards, key) {
                println!("== {} ({}: {})", bucket, key, members.len());
                print_cards(&members, &config.currency_symbol);
            }
        }
        None => print_cards(&cards, &config.currency_symbol),
    }

    if let Some(path) = args.output {
        let json = serde_json::to_string_pretty(&cards)?;
        tokio::fs::write(&path, json)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("💾 Saved {} cards to {}", cards.len(), path.display());
    }

    Ok(())
}

fn print_cards(cards: &[PropertyCard], currency_symbol: &str) {
    for (i, card) in cards.iter().enumerate() {
        let price = format_price(&card.price, currency_symbol).unwrap_or_else(|| "Price on request".to_string());
        println!("{}. {} ({})", i + 1, card.title, price);
        println!("   {} bed, {} bath, {}", card.bedrooms, card.bathrooms, card.area);
        if !card.address.is_empty() {
            println!("   Address: {}", card.address);
        }
        let labels: Vec<&str> = [&card.property_type, &card.status, &card.city]
            .into_iter()
            .filter_map(|v| v.as_deref())
            .collect();
        if !labels.is_empty() {
            println!("   {}", labels.join(" · "));
        }
        if card.featured {
            println!("   ★ Featured");
        }
        println!("   URL: {}", card.link);
        println!();
    }
}

async fn show(source: &dyn PropertySource, terms: &TermIndex, slug: &str) -> Result<()> {
    let Some(raw) = source.fetch_property(slug).await? else {
        anyhow::bail!("No property with slug '{}'", slug);
    };

    let detail = to_detail_with_terms(&raw, terms);
    println!("{}", serde_json::to_string_pretty(&detail)?);
    Ok(())
}

async fn stats(
    source: &dyn PropertySource,
    terms: &TermIndex,
    query: &CatalogQuery,
    config: &Config,
    args: &FilterArgs,
) -> Result<()> {
    let cards = fetch_cards(source, terms, query).await?;
    let cards = filter(&cards, &args.to_filter());
    let summary = compute_stats(&cards);

    let money = |amount: f64| {
        format_price(&amount.to_string(), &config.currency_symbol).unwrap_or_else(|| "-".to_string())
    };
    info!(
        "📊 {} properties ({} featured), price range {} - {}, average {}",
        summary.total,
        summary.featured,
        money(summary.min_price),
        money(summary.max_price),
        money(summary.average_price)
    );

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

async fn explain_record(source: &dyn PropertySource, terms: &TermIndex, slug: Option<&str>) -> Result<()> {
    let raw = match slug {
        Some(slug) => source.fetch_property(slug).await?,
        None => {
            let first_page = CatalogQuery {
                per_page: 1,
                max_pages: 1,
                search: None,
            };
            source.fetch_properties(&first_page).await?.into_iter().next()
        }
    };
    let Some(raw) = raw else {
        anyhow::bail!("No property to explain");
    };

    println!(
        "Record {} ({})",
        raw.id.as_deref().unwrap_or("?"),
        raw.slug.as_deref().unwrap_or("no slug")
    );
    println!("   _embedded present: {}", raw.embedded.is_some());
    println!("   property_meta present: {}", raw.property_meta.is_some());
    println!("   acf present: {}", raw.acf.is_some());
    println!();

    for report in explain(&raw, terms) {
        match (&report.source, &report.value) {
            (Some(source), Some(value)) => println!("{:<18} {:<40} {}", report.field, source, value),
            _ => println!("{:<18} {:<40} -", report.field, "(missing)"),
        }
    }

    Ok(())
}
