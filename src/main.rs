use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::{info, warn};

use tender_scout::app::{PageView, TenderDashboard};
use tender_scout::clash::ClashResult;
use tender_scout::common::constants::{
    CLASH_TABLE_COLUMNS, DEFAULT_TABLE_COLUMNS, FILTERABLE_COLUMNS, SEARCHABLE_FIELDS,
};
use tender_scout::common::types::{FieldName, SelectOption};
use tender_scout::config::Config;
use tender_scout::display;
use tender_scout::infra::ReqwestTenderService;
use tender_scout::observability;
use tender_scout::query::{ColumnToggle, OptionLoad, ScopeLevel};

#[derive(Parser)]
#[command(name = "tender_scout")]
#[command(about = "Find public-works tenders by area and check scheduling clashes")]
#[command(version)]
struct Cli {
    /// Override the tender service base URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every tender
    List {
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Let the service search and filter tenders
    Filter {
        /// Field to search in
        #[arg(long, value_parser = parse_searchable)]
        search_by: Option<FieldName>,
        /// Text to search for
        #[arg(long, default_value = "")]
        term: String,
        /// Column to include (repeatable, at most five are kept)
        #[arg(long = "column", value_parser = parse_filterable)]
        columns: Vec<FieldName>,
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Show area options for a pincode, or local-area options for an area
    Options {
        #[arg(long)]
        pincode: String,
        #[arg(long)]
        area: Option<String>,
        /// Only options containing this text
        #[arg(long, default_value = "")]
        input: String,
    },
    /// Accepted tenders in one local area
    Search {
        #[arg(long)]
        pincode: String,
        #[arg(long)]
        area: String,
        #[arg(long)]
        local_area: String,
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Tenders whose schedules clash within a pincode, highest priority first
    Clashes {
        #[arg(long)]
        pincode: String,
    },
}

fn parse_field(s: &str, allowed: &[FieldName]) -> std::result::Result<FieldName, String> {
    match s.parse::<FieldName>() {
        Ok(field) if allowed.contains(&field) => Ok(field),
        _ => Err(format!(
            "expected one of: {}",
            allowed.iter().map(|f| f.as_str()).collect::<Vec<_>>().join(", ")
        )),
    }
}

fn parse_searchable(s: &str) -> std::result::Result<FieldName, String> {
    parse_field(s, &SEARCHABLE_FIELDS)
}

fn parse_filterable(s: &str) -> std::result::Result<FieldName, String> {
    parse_field(s, &FILTERABLE_COLUMNS)
}

fn print_page(columns: &[FieldName], view: &PageView) {
    if view.total == 0 {
        println!("No tenders found");
        return;
    }
    println!("{}", display::render_records(columns, &view.records));
    println!(
        "\nPage {} of {} ({} tenders)",
        view.page, view.page_count, view.total
    );
}

/// Picks the option matching `wanted` (case-insensitive) from a lookup
fn choose(load: OptionLoad, wanted: &str, what: &str) -> Result<SelectOption> {
    let options = load.into_options();
    if let Some(option) = options
        .iter()
        .find(|o| o.value.eq_ignore_ascii_case(wanted.trim()))
    {
        return Ok(option.clone());
    }
    let known: Vec<&str> = options.iter().map(|o| o.label.as_str()).collect();
    if known.is_empty() {
        bail!("no {} named '{}'", what, wanted);
    }
    bail!("no {} named '{}'; available: {}", what, wanted, known.join(", "))
}

async fn option_failure(dashboard: &TenderDashboard, level: ScopeLevel) -> Result<()> {
    if let Some(err) = dashboard.option_error(level).await {
        bail!(err.message);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load().context("loading configuration")?;
    if let Some(url) = &cli.base_url {
        config.service.base_url = url.clone();
        config.validate()?;
    }
    observability::init_logging(&config.logging);

    let service = Arc::new(ReqwestTenderService::new(&config.service)?);
    info!(base_url = service.base_url(), "using tender service");
    let dashboard = TenderDashboard::new(service);

    match cli.command {
        Commands::List { page } => {
            dashboard.load_all_tenders().await?;
            dashboard.go_to_page(page).await;
            print_page(&DEFAULT_TABLE_COLUMNS, &dashboard.current_page().await);
        }
        Commands::Filter { search_by, term, columns, page } => {
            dashboard.set_search_by(search_by).await;
            dashboard.set_search_term(&term).await;
            for column in columns {
                if dashboard.toggle_column(column).await == ColumnToggle::Refused {
                    warn!(column = %column, "at most five columns can be selected; ignoring");
                }
            }
            dashboard.search_and_filter().await?;
            dashboard.go_to_page(page).await;

            let selected = dashboard.filter_spec().await.columns;
            let shown: &[FieldName] = if selected.is_empty() {
                &DEFAULT_TABLE_COLUMNS
            } else {
                &selected
            };
            print_page(shown, &dashboard.current_page().await);
        }
        Commands::Options { pincode, area, input } => {
            dashboard.set_postal_code(&pincode).await;
            let (level, load) = match area {
                Some(area) => {
                    dashboard.set_area(SelectOption::new(area.trim())).await?;
                    (ScopeLevel::LocalArea, dashboard.local_area_options(&input).await)
                }
                None => (ScopeLevel::Area, dashboard.area_options(&input).await),
            };
            option_failure(&dashboard, level).await?;
            let options = load.into_options();
            if options.is_empty() {
                println!("No options found");
            }
            for option in options {
                println!("{}", option.label);
            }
        }
        Commands::Search { pincode, area, local_area, page } => {
            dashboard.set_postal_code(&pincode).await;

            let areas = dashboard.area_options(&area).await;
            option_failure(&dashboard, ScopeLevel::Area).await?;
            dashboard.set_area(choose(areas, &area, "area")?).await?;

            let locals = dashboard.local_area_options(&local_area).await;
            option_failure(&dashboard, ScopeLevel::LocalArea).await?;
            dashboard
                .set_local_area(choose(locals, &local_area, "local area")?)
                .await?;

            dashboard.submit_search().await?;
            dashboard.go_to_page(page).await;
            print_page(&DEFAULT_TABLE_COLUMNS, &dashboard.current_page().await);
        }
        Commands::Clashes { pincode } => {
            dashboard.check_clashes(&pincode).await?;
            match dashboard.clash_result().await {
                Some(ClashResult::Clashes(entries)) => {
                    let headers: Vec<String> = CLASH_TABLE_COLUMNS.iter().map(|c| c.label()).collect();
                    let rows: Vec<Vec<String>> = entries.iter().map(display::clash_cells).collect();
                    println!("{}", display::render_table(&headers, &rows));
                }
                _ => println!("No clashes found"),
            }
        }
    }
    Ok(())
}
