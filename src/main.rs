use std::error::Error;
use std::path::PathBuf;

use chrono::{Local, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use tracing_subscriber::EnvFilter;

use playtime_dashboard::config::{DashboardConfig, resolve_config_path, resolve_records_path};
use playtime_dashboard::domain::WEEKDAY_LABELS;
use playtime_dashboard::{Dashboard, DateRange, JsonlRecordSource, assign_color};

#[derive(Debug, Parser)]
#[command(name = "playtime-dashboard", about = "Game-session timeline and weekly histogram data")]
struct Cli {
	/// JSON Lines export of session records
	#[arg(long, global = true)]
	records: Option<PathBuf>,
	#[arg(long, global = true)]
	config: Option<PathBuf>,
	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
	/// Categories, timeline and weekly series in one document
	Dashboard {
		#[arg(long)]
		day: Option<String>,
	},
	Timeline {
		#[arg(long, conflicts_with_all = ["from", "to"])]
		day: Option<String>,
		#[arg(long, requires = "to")]
		from: Option<String>,
		#[arg(long, requires = "from")]
		to: Option<String>,
	},
	Weekly,
	Categories,
	/// Print the color assigned to each name
	Color {
		#[arg(required = true)]
		names: Vec<String>,
	},
}

fn main() {
	if let Err(err) = run() {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn run() -> Result<(), Box<dyn Error>> {
	let cli = Cli::parse();

	let config = DashboardConfig::load(&resolve_config_path(cli.config))?;
	init_logging(config.log_filter());

	if let Some(Command::Color { names }) = &cli.command {
		let rows = names
			.iter()
			.map(|name| json!({ "name": name, "color": assign_color(name) }))
			.collect::<Vec<_>>();
		return print_json(&rows);
	}

	let records_path = resolve_records_path(cli.records, &config)?;
	let fallback = config.fallback_color()?;
	let source = JsonlRecordSource::new(records_path);
	let today = DateRange::single_day(Local::now().date_naive());
	let mut dashboard = Dashboard::new(source, fallback, today);

	match cli.command.unwrap_or(Command::Dashboard { day: None }) {
		Command::Dashboard { day } => {
			let range = parse_range(day.as_deref(), None, None)?;
			dashboard.refresh_categories();
			dashboard.refresh_records(range, Utc::now());
			dashboard.refresh_weekly();
			print_json(&dashboard.view())?;
		}
		Command::Timeline { day, from, to } => {
			let range = parse_range(day.as_deref(), from.as_deref(), to.as_deref())?;
			dashboard.refresh_categories();
			dashboard.refresh_records(range, Utc::now());
			print_json(&json!({
				"range": dashboard.range(),
				"timeline": dashboard.timeline(),
			}))?;
		}
		Command::Weekly => {
			dashboard.refresh_categories();
			dashboard.refresh_weekly();
			print_json(&json!({
				"weekday_labels": WEEKDAY_LABELS,
				"weekly": dashboard.weekly(),
			}))?;
		}
		Command::Categories => {
			dashboard.refresh_categories();
			print_json(&dashboard.palette().categories())?;
		}
		Command::Color { .. } => {}
	}

	Ok(())
}

fn init_logging(default_filter: &str) {
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_target(false)
		.with_writer(std::io::stderr)
		.init();
}

fn parse_range(
	day: Option<&str>,
	from: Option<&str>,
	to: Option<&str>,
) -> Result<DateRange, Box<dyn Error>> {
	if let (Some(from), Some(to)) = (from, to) {
		return Ok(DateRange::new(parse_day(from)?, parse_day(to)?)?);
	}

	let day = match day {
		Some(raw) => parse_day(raw)?,
		None => Local::now().date_naive(),
	};
	Ok(DateRange::single_day(day))
}

fn parse_day(input: &str) -> Result<NaiveDate, Box<dyn Error>> {
	Ok(NaiveDate::parse_from_str(input, "%Y-%m-%d")?)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), Box<dyn Error>> {
	println!("{}", serde_json::to_string_pretty(value)?);
	Ok(())
}
