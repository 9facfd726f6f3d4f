use clap::{Parser, ValueEnum};
use csv_adapter::CsvReportWriter;
use pipeline_core::application::{PipelinePlan, PipelineService};
use pipeline_core::ports::{ReportWriter, SalesRepository};
use pipeline_core::reports::MonthlySalesStrategy;
use sqlite_adapter::SqliteSalesRepository;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;
use tracing::{error, info};

mod logging;
mod settings;

use logging::LoggingContext;
use settings::{load_settings, Settings, DEFAULT_CONFIG_PATH};

/// Directory holding the reports whose file names are not configurable
const DATA_DIR: &str = "data";

/// CLI tool to extract sales reports from the Chinook SQLite database into CSV files
#[derive(Parser, Debug)]
#[command(name = "sales-pipeline")]
#[command(about = "Runs the sales aggregation reports and saves each one as CSV")]
struct Cli {
    /// Path to the YAML settings document
    #[arg(short = 'c', long = "config", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Year of the annual sales-by-month report
    #[arg(long = "year", default_value_t = 2012, value_parser = clap::value_parser!(i32).range(1000..=9999))]
    year: i32,

    /// Number of artists in the top artists report
    #[arg(long = "top-artists", default_value_t = 7, value_parser = clap::value_parser!(u64).range(1..))]
    top_artists: u64,

    /// Where the sales-by-month report is aggregated
    #[arg(long = "month-strategy", value_enum, default_value_t = MonthStrategy::Sql)]
    month_strategy: MonthStrategy,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum MonthStrategy {
    /// Group inside SQLite
    Sql,
    /// Group in this process
    Host,
}

impl From<MonthStrategy> for MonthlySalesStrategy {
    fn from(strategy: MonthStrategy) -> Self {
        match strategy {
            MonthStrategy::Sql => MonthlySalesStrategy::Sql,
            MonthStrategy::Host => MonthlySalesStrategy::Host,
        }
    }
}

fn build_plan(cli: &Cli, settings: &Settings) -> PipelinePlan {
    let files = &settings.extract_files;
    PipelinePlan {
        sales_by_month: files
            .sales_by_month_file_path
            .clone()
            .map(|path| (cli.month_strategy.into(), path)),
        sales_by_artist_path: files.sales_by_artist_file_path.clone(),
        tracks_by_genre_path: files.tracks_by_genre_file_path.clone(),
        sales_by_quarter_path: files.sales_by_quarter_file_path.clone(),
        sales_by_year_path: files.sales_by_year_file_path.clone(),
        data_dir: PathBuf::from(DATA_DIR),
        year: cli.year,
        // more artists than exist just yields every artist
        top_artists: usize::try_from(cli.top_artists).unwrap_or(usize::MAX),
    }
}

fn main() -> ExitCode {
    let started = Instant::now();
    let cli = Cli::parse();

    // Logging does not exist yet, so configuration problems go to stderr
    let settings = match load_settings(&cli.config) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error loading {}: {}", cli.config.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let _logging = match LoggingContext::init(&settings.logging.file_path) {
        Ok(context) => context,
        Err(e) => {
            eprintln!("Error configuring logging: {}", e);
            return ExitCode::FAILURE;
        }
    };

    info!("Starting data pipeline process");

    // The repository logs its own failure before returning it
    let repository: Box<dyn SalesRepository> =
        match SqliteSalesRepository::open(&settings.db.file_path) {
            Ok(repository) => Box::new(repository),
            Err(_) => return ExitCode::FAILURE,
        };

    let report_writer: Box<dyn ReportWriter> = Box::new(CsvReportWriter::new());

    let service = PipelineService::new(repository, report_writer, build_plan(&cli, &settings));

    match service.run() {
        Ok(reports) => {
            info!(
                "Pipeline completed in {:.2} seconds ({} reports)",
                started.elapsed().as_secs_f64(),
                reports
            );
            info!("Finishing data pipeline process");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Data pipeline aborted: {}", e);
            ExitCode::FAILURE
        }
    }
}
