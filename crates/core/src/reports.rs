use crate::aggregate;
use crate::domain::ReportTable;
use crate::error::PipelineError;
use crate::ports::{Result, SalesRepository};
use std::fmt;

/// Where the monthly grouping happens.
///
/// Both strategies yield the same (Month, Quantity, TotalSales) triples but
/// callers should not rely on the two producing the same key text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthlySalesStrategy {
    /// Group and sum inside the store's query language
    Sql,
    /// Fetch raw line items and group in this process
    Host,
}

impl fmt::Display for MonthlySalesStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthlySalesStrategy::Sql => write!(f, "sql"),
            MonthlySalesStrategy::Host => write!(f, "host"),
        }
    }
}

/// Rejects a top-artists limit of zero
pub fn check_limit(limit: usize) -> Result<()> {
    if limit == 0 {
        return Err(PipelineError::InvalidParameter(
            "number of artists must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// Rejects a year that does not have exactly four digits
pub fn check_year(year: i32) -> Result<()> {
    if !(1000..=9999).contains(&year) {
        return Err(PipelineError::InvalidParameter(format!(
            "year must have four digits, got {}",
            year
        )));
    }
    Ok(())
}

/// Builds the sales-by-month table with the grouping done where `strategy` says
pub fn sales_by_month(
    repository: &dyn SalesRepository,
    strategy: MonthlySalesStrategy,
) -> Result<ReportTable> {
    let rows = match strategy {
        MonthlySalesStrategy::Sql => repository.sales_by_month()?,
        MonthlySalesStrategy::Host => aggregate::sales_by_month(&repository.invoice_line_items()?)?,
    };
    Ok(ReportTable::from_period_sales("sales by month", "Month", &rows))
}

pub fn top_artists_by_sales(repository: &dyn SalesRepository, limit: usize) -> Result<ReportTable> {
    check_limit(limit)?;
    let rows = aggregate::top_artists(&repository.artist_line_items()?, limit)?;
    Ok(ReportTable::from_artist_sales(
        &format!("top {} artists by sales", limit),
        &rows,
    ))
}

pub fn tracks_by_genre(repository: &dyn SalesRepository) -> Result<ReportTable> {
    let rows = repository.tracks_by_genre()?;
    Ok(ReportTable::from_genre_counts("tracks by genre", &rows))
}

pub fn annual_sales_by_month(repository: &dyn SalesRepository, year: i32) -> Result<ReportTable> {
    check_year(year)?;
    let rows = repository.annual_sales_by_month(year)?;
    Ok(ReportTable::from_period_sales(
        &format!("sales by month for {}", year),
        "Month",
        &rows,
    ))
}

pub fn sales_by_quarter(repository: &dyn SalesRepository) -> Result<ReportTable> {
    let rows = repository.sales_by_quarter()?;
    Ok(ReportTable::from_period_sales("sales by quarter", "Quarter", &rows))
}

pub fn sales_by_year(repository: &dyn SalesRepository) -> Result<ReportTable> {
    let rows = repository.sales_by_year()?;
    Ok(ReportTable::from_period_sales("sales by year", "Year", &rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ArtistLineItem, Cell, GenreTrackCount, LineItem, PeriodSales};

    /// In-memory repository backed by fixed line items.
    struct StubRepository {
        items: Vec<ArtistLineItem>,
    }

    impl StubRepository {
        fn sample() -> Self {
            let rows = [
                ("Queen", "2009-01-03 00:00:00", 0.99, 2),
                ("U2", "2009-01-19 00:00:00", 1.99, 1),
                ("Queen", "2009-02-05 00:00:00", 0.99, 1),
                ("Metallica", "2010-11-30 00:00:00", 0.99, 2),
            ];
            Self {
                items: rows
                    .iter()
                    .map(|(artist, date, price, qty)| ArtistLineItem {
                        artist_name: artist.to_string(),
                        invoice_date: date.to_string(),
                        unit_price: *price,
                        quantity: *qty,
                    })
                    .collect(),
            }
        }
    }

    impl SalesRepository for StubRepository {
        fn sales_by_month(&self) -> Result<Vec<PeriodSales>> {
            // what the store would answer for `sample()`
            Ok(vec![
                PeriodSales {
                    period: "2009-01".to_string(),
                    quantity: 3,
                    total_sales: 3.97,
                },
                PeriodSales {
                    period: "2009-02".to_string(),
                    quantity: 1,
                    total_sales: 0.99,
                },
                PeriodSales {
                    period: "2010-11".to_string(),
                    quantity: 2,
                    total_sales: 1.98,
                },
            ])
        }

        fn invoice_line_items(&self) -> Result<Vec<LineItem>> {
            Ok(self
                .items
                .iter()
                .map(|i| LineItem {
                    invoice_date: i.invoice_date.clone(),
                    unit_price: i.unit_price,
                    quantity: i.quantity,
                })
                .collect())
        }

        fn artist_line_items(&self) -> Result<Vec<ArtistLineItem>> {
            Ok(self.items.clone())
        }

        fn tracks_by_genre(&self) -> Result<Vec<GenreTrackCount>> {
            Ok(vec![GenreTrackCount {
                genre: "Rock".to_string(),
                num_tracks: 2,
            }])
        }

        fn annual_sales_by_month(&self, _year: i32) -> Result<Vec<PeriodSales>> {
            Ok(Vec::new())
        }

        fn sales_by_quarter(&self) -> Result<Vec<PeriodSales>> {
            Ok(Vec::new())
        }

        fn sales_by_year(&self) -> Result<Vec<PeriodSales>> {
            Ok(Vec::new())
        }

        fn close(self: Box<Self>) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_month_strategies_agree() {
        let repository = StubRepository::sample();

        let sql = sales_by_month(&repository, MonthlySalesStrategy::Sql).unwrap();
        let host = sales_by_month(&repository, MonthlySalesStrategy::Host).unwrap();

        assert_eq!(sql.columns, host.columns);
        assert_eq!(sql.rows, host.rows);
    }

    #[test]
    fn test_top_artists_report() {
        let repository = StubRepository::sample();

        let table = top_artists_by_sales(&repository, 2).unwrap();

        assert_eq!(table.name, "top 2 artists by sales");
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0][0], Cell::Text("Queen".to_string()));
        assert_eq!(table.rows[0][1], Cell::Money(2.97));
        assert_eq!(table.rows[1][0], Cell::Text("U2".to_string()));
    }

    #[test]
    fn test_top_artists_rejects_zero() {
        let repository = StubRepository::sample();
        let err = top_artists_by_sales(&repository, 0).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidParameter(_)));
    }

    #[test]
    fn test_annual_sales_rejects_short_year() {
        let repository = StubRepository::sample();
        assert!(annual_sales_by_month(&repository, 12).is_err());
        assert!(annual_sales_by_month(&repository, 2012).is_ok());
    }

    #[test]
    fn test_check_year_bounds() {
        assert!(check_year(1000).is_ok());
        assert!(check_year(9999).is_ok());
        assert!(check_year(999).is_err());
        assert!(check_year(10000).is_err());
        assert!(check_year(-2012).is_err());
    }

    #[test]
    fn test_strategy_display() {
        assert_eq!(MonthlySalesStrategy::Host.to_string(), "host");
        assert_eq!(MonthlySalesStrategy::Sql.to_string(), "sql");
    }
}
