use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};
use foundation::bounds::Viewport;
use indicators::Direction;
use members::{Dataset, MemberFilter, statistics};
use serde::Serialize;
use tools::AppConfig;
use tools::report::{groups_report, hidden_report, navigate_report, render_target, select_members};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Inspect a member map dataset")]
struct Args {
    /// Dataset directory with alumni.json and countries.json (overrides config)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(flatten)]
    filter: FilterArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(ClapArgs, Debug, Default)]
struct FilterArgs {
    /// Keep members of this graduation year
    #[arg(long, global = true)]
    year: Option<i32>,

    /// Keep members living in this country
    #[arg(long, global = true)]
    country: Option<String>,

    /// Keep members of this promotion type
    #[arg(long, global = true)]
    promotion: Option<String>,

    /// Case-insensitive text search over names, places and jobs
    #[arg(long, global = true)]
    search: Option<String>,
}

impl FilterArgs {
    fn to_filter(&self) -> MemberFilter {
        MemberFilter {
            graduation_year: self.year,
            country: self.country.clone(),
            promotion_type: self.promotion.clone(),
        }
    }
}

#[derive(ClapArgs, Debug)]
struct ViewportArgs {
    #[arg(long, allow_negative_numbers = true)]
    north: f64,

    #[arg(long, allow_negative_numbers = true)]
    south: f64,

    #[arg(long, allow_negative_numbers = true)]
    east: f64,

    #[arg(long, allow_negative_numbers = true)]
    west: f64,

    /// Map zoom level
    #[arg(long, default_value_t = 5.0)]
    zoom: f64,
}

impl ViewportArgs {
    fn viewport(&self) -> Result<Viewport, String> {
        let vp = Viewport::new(self.north, self.south, self.east, self.west);
        if !vp.is_valid() {
            return Err(format!(
                "invalid viewport: south {} must not exceed north {}",
                self.south, self.north
            ));
        }
        Ok(vp)
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Dataset statistics
    Summary,

    /// Counters or clusters shown at a zoom level
    Groups {
        #[arg(long)]
        zoom: f64,
    },

    /// Members hidden outside a viewport, per direction
    Hidden {
        #[command(flatten)]
        view: ViewportArgs,
    },

    /// Camera target for a directional bubble click
    Navigate {
        /// north, south, east or west
        direction: Direction,

        #[command(flatten)]
        view: ViewportArgs,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), String> {
    let args = Args::parse();

    let mut config = AppConfig::load(args.config.as_deref()).map_err(|e| e.to_string())?;
    if let Some(dir) = args.data.clone() {
        config.data_dir = dir;
    }

    let dataset = Dataset::load_dir(&config.data_dir).map_err(|e| e.to_string())?;
    let members = select_members(
        &dataset.members,
        &args.filter.to_filter(),
        args.filter.search.as_deref(),
    );
    info!(
        selected = members.len(),
        total = dataset.members.len(),
        "members selected"
    );

    match args.command {
        Command::Summary => {
            let stats = statistics(&members);
            if args.json {
                return print_json(&stats);
            }
            println!("members:   {}", stats.total_members);
            println!("countries: {}", stats.countries_count);
            println!("companies: {}", stats.companies_count);
            if let Some((lo, hi)) = stats.graduation_years_range {
                println!("years:     {lo}-{hi}");
            }
        }
        Command::Groups { zoom } => {
            let report = groups_report(&members, &dataset.countries, &config.regions, zoom);
            if args.json {
                return print_json(&report);
            }
            print!("{}", report.render_text());
        }
        Command::Hidden { view } => {
            let report = hidden_report(members, &config.indicators, view.viewport()?, view.zoom);
            if args.json {
                return print_json(&report);
            }
            print!("{}", report.render_text());
        }
        Command::Navigate { direction, view } => {
            let viewport = view.viewport()?;
            let target =
                navigate_report(members, &config.indicators, viewport, view.zoom, direction)
                    .ok_or_else(|| format!("no members to the {direction}"))?;
            if args.json {
                return print_json(&target);
            }
            print!("{}", render_target(&target));
        }
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    let text = serde_json::to_string_pretty(value).map_err(|e| format!("encode json: {e}"))?;
    println!("{text}");
    Ok(())
}
