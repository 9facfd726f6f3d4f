use crate::domain::ReportTable;
use crate::ports::{ReportWriter, Result, SalesRepository};
use crate::reports::{self, MonthlySalesStrategy};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::info;

/// Number of artists in the configured sales-by-artist report
pub const HEADLINE_ARTIST_COUNT: usize = 10;

/// Fixed location of the annual sales-by-month report
pub fn annual_sales_path(data_dir: &Path, year: i32) -> PathBuf {
    data_dir.join(format!("sales_by_month_{}.csv", year))
}

/// Fixed location of the top-N artists report
pub fn top_artists_path(data_dir: &Path, limit: usize) -> PathBuf {
    data_dir.join(format!("top_{}_artists_by_sales.csv", limit))
}

/// One extract-and-save unit of the pipeline
#[derive(Debug, Clone, PartialEq)]
pub enum ReportStep {
    SalesByMonth {
        strategy: MonthlySalesStrategy,
        path: PathBuf,
    },
    TopArtists {
        limit: usize,
        path: PathBuf,
    },
    TracksByGenre {
        path: PathBuf,
    },
    AnnualSalesByMonth {
        year: i32,
        path: PathBuf,
    },
    SalesByQuarter {
        path: PathBuf,
    },
    SalesByYear {
        path: PathBuf,
    },
}

impl ReportStep {
    pub fn path(&self) -> &Path {
        match self {
            ReportStep::SalesByMonth { path, .. }
            | ReportStep::TopArtists { path, .. }
            | ReportStep::TracksByGenre { path }
            | ReportStep::AnnualSalesByMonth { path, .. }
            | ReportStep::SalesByQuarter { path }
            | ReportStep::SalesByYear { path } => path.as_path(),
        }
    }

    fn extract(&self, repository: &dyn SalesRepository) -> Result<ReportTable> {
        match self {
            ReportStep::SalesByMonth { strategy, .. } => {
                reports::sales_by_month(repository, *strategy)
            }
            ReportStep::TopArtists { limit, .. } => {
                reports::top_artists_by_sales(repository, *limit)
            }
            ReportStep::TracksByGenre { .. } => reports::tracks_by_genre(repository),
            ReportStep::AnnualSalesByMonth { year, .. } => {
                reports::annual_sales_by_month(repository, *year)
            }
            ReportStep::SalesByQuarter { .. } => reports::sales_by_quarter(repository),
            ReportStep::SalesByYear { .. } => reports::sales_by_year(repository),
        }
    }
}

impl fmt::Display for ReportStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportStep::SalesByMonth { strategy, .. } => {
                write!(f, "sales by month ({} aggregation)", strategy)
            }
            ReportStep::TopArtists { limit, .. } => write!(f, "top {} artists by sales", limit),
            ReportStep::TracksByGenre { .. } => write!(f, "tracks by genre"),
            ReportStep::AnnualSalesByMonth { year, .. } => write!(f, "sales by month for {}", year),
            ReportStep::SalesByQuarter { .. } => write!(f, "sales by quarter"),
            ReportStep::SalesByYear { .. } => write!(f, "sales by year"),
        }
    }
}

/// Everything the pipeline needs to know about one run
#[derive(Debug, Clone)]
pub struct PipelinePlan {
    /// Runs first when set; the other reports always run
    pub sales_by_month: Option<(MonthlySalesStrategy, PathBuf)>,
    pub sales_by_artist_path: PathBuf,
    pub tracks_by_genre_path: PathBuf,
    pub sales_by_quarter_path: PathBuf,
    pub sales_by_year_path: PathBuf,
    /// Directory holding the fixed-name reports
    pub data_dir: PathBuf,
    pub year: i32,
    pub top_artists: usize,
}

impl PipelinePlan {
    /// Checks the scalar parameters before anything is extracted or written
    pub fn validate(&self) -> Result<()> {
        reports::check_year(self.year)?;
        reports::check_limit(self.top_artists)
    }

    /// Steps in the order they execute
    pub fn steps(&self) -> Vec<ReportStep> {
        let mut steps = Vec::with_capacity(7);
        if let Some((strategy, path)) = &self.sales_by_month {
            steps.push(ReportStep::SalesByMonth {
                strategy: *strategy,
                path: path.clone(),
            });
        }
        steps.push(ReportStep::TopArtists {
            limit: HEADLINE_ARTIST_COUNT,
            path: self.sales_by_artist_path.clone(),
        });
        steps.push(ReportStep::TracksByGenre {
            path: self.tracks_by_genre_path.clone(),
        });
        steps.push(ReportStep::AnnualSalesByMonth {
            year: self.year,
            path: annual_sales_path(&self.data_dir, self.year),
        });
        steps.push(ReportStep::SalesByQuarter {
            path: self.sales_by_quarter_path.clone(),
        });
        steps.push(ReportStep::TopArtists {
            limit: self.top_artists,
            path: top_artists_path(&self.data_dir, self.top_artists),
        });
        steps.push(ReportStep::SalesByYear {
            path: self.sales_by_year_path.clone(),
        });
        steps
    }
}

/// Application service that runs every report against one open repository
pub struct PipelineService {
    repository: Box<dyn SalesRepository>,
    report_writer: Box<dyn ReportWriter>,
    plan: PipelinePlan,
}

impl PipelineService {
    /// Creates a new PipelineService with the given dependencies
    pub fn new(
        repository: Box<dyn SalesRepository>,
        report_writer: Box<dyn ReportWriter>,
        plan: PipelinePlan,
    ) -> Self {
        Self {
            repository,
            report_writer,
            plan,
        }
    }

    /// Executes every step in order, then closes the repository.
    ///
    /// An invalid plan is rejected before the first step. The first failing
    /// step aborts the run; the repository is released when `self` drops on
    /// that path.
    pub fn run(self) -> Result<usize> {
        self.plan.validate()?;
        let steps = self.plan.steps();

        for step in &steps {
            info!("Extracting {}", step);
            let table = step.extract(self.repository.as_ref())?;

            info!("Saving {} as CSV", step);
            self.report_writer.write(&table, step.path())?;
            info!("Saved {} rows to {}", table.len(), step.path().display());
        }

        self.repository.close()?;
        info!("Database connection closed");
        Ok(steps.len())
    }
}
