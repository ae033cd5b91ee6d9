use clap::Parser;
use postcode_finder::geo::GeoNamesTable;
use postcode_finder::google::GoogleSearch;
use postcode_finder::page::HttpPageText;
use postcode_finder::{
    format_row, http_client, Finder, LogReporter, Postcode, PostcodeResult, SearchQuery,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing_error::ErrorLayer;
use tracing_subscriber::prelude::*;

/// Find UK postcodes near home on the pages of a Google search.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Search terms, e.g. `cambridge supermarkets`
    #[arg(required = true)]
    terms: Vec<String>,

    /// Home postcode distances are measured from
    #[arg(long, default_value = "CB4 2FY")]
    home: String,

    /// Keep postcodes at most this many kilometers from home
    #[arg(long, default_value_t = 20.0)]
    limit: f64,

    /// Results page to read, starting at 1
    #[arg(long, default_value_t = 1)]
    page: u32,

    /// Skip result links under the path of another result link
    #[arg(long)]
    ignore_subdomains: bool,

    /// GeoNames postal code dump for GB
    #[arg(long, default_value = "GB_full.txt")]
    postcodes: PathBuf,

    /// Page fetch timeout in seconds
    #[arg(long, default_value_t = 3)]
    timeout: u64,

    /// Print results as JSON
    #[arg(long)]
    json: bool,
}

fn print_table(results: &[PostcodeResult]) {
    println!("Results:");
    for r in results {
        println!("{}", format_row(r.postcode().as_str(), r.distance(), r.url()));
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| {
                "info,html5ever=error,selectors=error,hyper=warn,reqwest=info".into()
            }),
        )
        .with(ErrorLayer::default())
        .init();

    let args = Args::parse();
    let home = Postcode::parse(&args.home)?;

    let client = http_client(Duration::from_secs(args.timeout))?;
    let geo = GeoNamesTable::open(&args.postcodes)?;
    let finder = Finder::new(
        GoogleSearch::new(client.clone()),
        HttpPageText::new(client),
        geo,
    );

    let query = SearchQuery::new(args.terms)
        .with_page(args.page)
        .with_ignore_subdomains(args.ignore_subdomains);
    let outcome = finder
        .run(&query, home.as_str(), args.limit, &mut LogReporter)
        .await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome.results)?);
    } else {
        print_table(&outcome.results);
    }

    Ok(())
}
