//! Ad-hoc query command: runs the engine against the configured dataset.

use clap::Args;
use foodfinder_core::{
    execute, summary_lines, AppConfig, QueryParams, QuerySpec, ReportRow, RestaurantRecord,
};
use serde::Serialize;

/// Filters accepted by `query`. Values are parsed the same way as HTTP
/// query parameters, so a malformed number is rejected with the same error.
#[derive(Debug, Default, Args)]
pub struct QueryArgs {
    /// Case-insensitive substring matched against name, cuisine, city, address
    #[arg(long)]
    pub search: Option<String>,
    /// Latitude of the radius centre
    #[arg(long, allow_hyphen_values = true)]
    pub lat: Option<String>,
    /// Longitude of the radius centre
    #[arg(long, allow_hyphen_values = true)]
    pub lng: Option<String>,
    /// Radius in kilometres
    #[arg(long, allow_hyphen_values = true)]
    pub radius: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    pub lat_min: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    pub lat_max: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    pub lng_min: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    pub lng_max: Option<String>,
    #[arg(long)]
    pub min_rating: Option<String>,
    /// Exact city label
    #[arg(long)]
    pub city: Option<String>,
    /// Maximum cost for two
    #[arg(long)]
    pub max_cost: Option<String>,
    /// Return every match instead of the first page
    #[arg(long)]
    pub all: bool,
    /// Print report summary and formatted rows instead of raw records
    #[arg(long)]
    pub report: bool,
}

impl QueryArgs {
    pub(crate) fn to_params(&self) -> QueryParams {
        QueryParams {
            search: self.search.clone(),
            lat: self.lat.clone(),
            lng: self.lng.clone(),
            radius: self.radius.clone(),
            lat_min: self.lat_min.clone(),
            lat_max: self.lat_max.clone(),
            lng_min: self.lng_min.clone(),
            lng_max: self.lng_max.clone(),
            min_rating: self.min_rating.clone(),
            selected_city: self.city.clone(),
            max_cost: self.max_cost.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ReportOutput {
    summary: Vec<String>,
    rows: Vec<ReportRow>,
}

pub(crate) async fn run_query(config: &AppConfig, args: &QueryArgs) -> anyhow::Result<()> {
    let output = query_output(config, args).await?;
    println!("{output}");
    Ok(())
}

/// Load the same snapshot the server would, including its CSV fallback, and
/// render the matches.
async fn query_output(config: &AppConfig, args: &QueryArgs) -> anyhow::Result<String> {
    let spec = QuerySpec::from_params(&args.to_params())?;
    let (store, source) = foodfinder_db::load_store(config).await?;
    let coordinates = foodfinder_db::load_coordinates(config)?;

    let results = execute(store.records(), &coordinates, &spec, !args.all);
    tracing::debug!(%source, count = results.len(), "query executed");
    render(&spec, &results, args.report)
}

fn render(spec: &QuerySpec, results: &[RestaurantRecord], report: bool) -> anyhow::Result<String> {
    let json = if report {
        serde_json::to_string_pretty(&ReportOutput {
            summary: summary_lines(results.len(), spec),
            rows: results.iter().map(ReportRow::from_record).collect(),
        })?
    } else {
        serde_json::to_string_pretty(results)?
    };
    Ok(json)
}
