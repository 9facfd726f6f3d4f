use crate::domain::{ArtistLineItem, GenreTrackCount, LineItem, PeriodSales, ReportTable};
use crate::error::PipelineError;
use std::path::Path;

pub type Result<T> = std::result::Result<T, PipelineError>;

/// Read-only access to the sales store. Every method is one query and
/// none of them mutate the store.
pub trait SalesRepository {
    /// Sales grouped by `YYYY-MM`, aggregated inside the store
    fn sales_by_month(&self) -> Result<Vec<PeriodSales>>;

    /// Raw line items with their invoice date, for host-side grouping
    fn invoice_line_items(&self) -> Result<Vec<LineItem>>;

    /// Raw line items joined to their artist, ordered by invoice date
    fn artist_line_items(&self) -> Result<Vec<ArtistLineItem>>;

    fn tracks_by_genre(&self) -> Result<Vec<GenreTrackCount>>;

    /// Sales of one year grouped by month of year (`01`..`12`)
    fn annual_sales_by_month(&self, year: i32) -> Result<Vec<PeriodSales>>;

    fn sales_by_quarter(&self) -> Result<Vec<PeriodSales>>;

    fn sales_by_year(&self) -> Result<Vec<PeriodSales>>;

    /// Releases the underlying handle. Dropping the repository releases it too.
    fn close(self: Box<Self>) -> Result<()>;
}

/// Trait for persisting a finished report table
/// This is a port (interface) that defines how the core communicates with output adapters
pub trait ReportWriter: Send + Sync {
    fn write(&self, table: &ReportTable, path: &Path) -> Result<()>;
}
