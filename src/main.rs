use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use catalog_explorer::data::model::{Facets, DEFAULT_DURATION_RANGE, DEFAULT_YEAR_RANGE};
use catalog_explorer::{
    run_query, Bounds, CatalogSource, ExplorerConfig, FilterCriteria, QueryError, Selection,
    SortKey, Summary,
};

#[derive(Parser, Debug)]
#[command(version, about = "Explore a catalog of movie and TV titles")]
struct CliArgs {
    /// Catalog file (.csv, .json or .parquet)
    path: PathBuf,

    /// Start from the dashboard defaults (all types and ratings, added 2016-2021)
    #[arg(long)]
    dashboard: bool,

    /// Keep only this content type (repeatable)
    #[arg(long = "type", value_name = "TYPE", conflicts_with = "no_types")]
    types: Vec<String>,

    /// Deselect every content type
    #[arg(long)]
    no_types: bool,

    /// Keep only this rating (repeatable)
    #[arg(long = "rating", value_name = "RATING", conflicts_with = "no_ratings")]
    ratings: Vec<String>,

    /// Deselect every rating
    #[arg(long)]
    no_ratings: bool,

    /// Year added, inclusive, as MIN:MAX
    #[arg(long, value_name = "MIN:MAX")]
    years: Option<String>,

    /// Movie runtime in minutes, inclusive, as MIN:MAX
    #[arg(long, value_name = "MIN:MAX")]
    duration: Option<String>,

    /// Case-insensitive title substring
    #[arg(long)]
    search: Option<String>,

    /// release_year_desc or title_asc
    #[arg(long, default_value = "release_year_desc")]
    sort: String,

    /// Write the filtered titles to this CSV file
    #[arg(long, value_name = "FILE")]
    export: Option<PathBuf>,

    /// Print the summary as JSON instead of text
    #[arg(long)]
    json: bool,

    /// List the available filter options and exit
    #[arg(long)]
    facets: bool,

    /// JSON config file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn selection(values: &[String], none: bool, fallback: Selection) -> Selection {
    if none {
        Selection::none()
    } else if !values.is_empty() {
        Selection::only(values.iter().cloned())
    } else {
        fallback
    }
}

fn build_criteria(args: &CliArgs, facets: &Facets) -> Result<FilterCriteria, QueryError> {
    let base = if args.dashboard {
        FilterCriteria::dashboard(facets)
    } else {
        FilterCriteria::default()
    };

    let years = match &args.years {
        Some(text) => Some(Bounds::parse("year_added", text)?),
        None => base.year_range,
    };
    let duration = match &args.duration {
        Some(text) => Some(Bounds::parse("duration", text)?),
        None => base.duration_range,
    };

    Ok(FilterCriteria {
        types: selection(&args.types, args.no_types, base.types),
        ratings: selection(&args.ratings, args.no_ratings, base.ratings),
        year_range: years,
        title_query: args.search.clone(),
        duration_range: duration,
        sort: args.sort.parse::<SortKey>()?,
    })
}

fn print_facets(facets: &Facets) {
    println!("Types:   {}", facets.types.join(", "));
    println!("Ratings: {}", facets.ratings.join(", "));
    match facets.year_added_bounds {
        Some((lo, hi)) => println!("Year added: {lo} – {hi}"),
        None => println!("Year added: unknown"),
    }
    match facets.movie_minutes_bounds {
        Some((lo, hi)) => println!("Movie duration: {lo} – {hi} min"),
        None => println!("Movie duration: unknown"),
    }
    let (y0, y1) = DEFAULT_YEAR_RANGE;
    let (d0, d1) = DEFAULT_DURATION_RANGE;
    println!("Dashboard defaults: added {y0} – {y1}, duration {d0} – {d1} min");
}

fn print_summary(summary: &Summary) {
    println!(
        "Total titles: {}   Movies: {}   TV Shows: {}",
        summary.total_count, summary.movie_count, summary.tv_show_count
    );

    println!("\nBy type:");
    for (kind, count) in &summary.count_by_type {
        println!("  {kind:<20} {count}");
    }

    println!("\nAdded per year:");
    for (year, count) in &summary.count_by_year {
        println!("  {year}  {count}");
    }

    println!("\nTop genres:");
    for entry in &summary.top_genres {
        println!("  {:<40} {}", entry.key, entry.count);
    }

    println!("\nTop countries:");
    for entry in &summary.top_countries {
        println!("  {:<40} {}", entry.key, entry.count);
    }

    println!("\nPreview:");
    for row in &summary.preview {
        println!("  {} [{}]", row.title, row.kind);
        println!("      Country: {}  Rating: {}  Duration: {}", row.country, row.rating, row.duration);
        println!("      {}", row.description);
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = CliArgs::parse();

    let config = match &args.config {
        Some(path) => ExplorerConfig::load(path)?,
        None => ExplorerConfig::default(),
    };

    let mut source = CatalogSource::new(&args.path, config.max_records);
    let store = source.store()?;

    if args.facets {
        print_facets(store.facets());
        return Ok(());
    }

    let criteria = build_criteria(&args, store.facets())?;
    let outcome = run_query(&store, &criteria, &config.limits())?;

    if args.json {
        let text = serde_json::to_string_pretty(&outcome.summary).context("encoding summary")?;
        println!("{text}");
    } else {
        print_summary(&outcome.summary);
    }

    if let Some(path) = &args.export {
        outcome.view.export(path)?;
        log::info!("Exported {} titles to {}", outcome.view.len(), path.display());
    }

    Ok(())
}
