use pipeline_core::domain::{ArtistLineItem, GenreTrackCount, LineItem, PeriodSales};
use pipeline_core::ports::{Result, SalesRepository};
use pipeline_core::utils::quarter_label;
use pipeline_core::PipelineError;
use rusqlite::{params, Connection, OpenFlags, Params, Row};
use std::path::Path;
use tracing::{error, info};

/// SQLite implementation of the SalesRepository trait
pub struct SqliteSalesRepository {
    conn: Connection,
}

impl SqliteSalesRepository {
    /// Opens the database at `db_path` read-only.
    ///
    /// A missing file or an open failure is logged at ERROR and returned;
    /// no handle is produced in either case.
    pub fn open(db_path: &Path) -> Result<Self> {
        if !db_path.exists() {
            error!("database file not found: {}", db_path.display());
            return Err(PipelineError::DatabaseNotFound(db_path.to_path_buf()));
        }

        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(db_path, flags).map_err(|e| {
            error!("failed to open database {}: {}", db_path.display(), e);
            PipelineError::connection(db_path, e)
        })?;

        info!("Connected to database {}", db_path.display());
        Ok(Self { conn })
    }

    /// Wraps an already open connection
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    fn period_sales<P: Params>(&self, sql: &str, params: P) -> Result<Vec<PeriodSales>> {
        collect_rows(&self.conn, sql, params, |row: &Row| {
            Ok(PeriodSales {
                period: row.get(0)?,
                quantity: row.get(1)?,
                total_sales: row.get(2)?,
            })
        })
        .map_err(PipelineError::query)
    }
}

fn collect_rows<T, P, F>(conn: &Connection, sql: &str, params: P, map: F) -> rusqlite::Result<Vec<T>>
where
    P: Params,
    F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
{
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params, map)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

impl SalesRepository for SqliteSalesRepository {
    fn sales_by_month(&self) -> Result<Vec<PeriodSales>> {
        self.period_sales(
            r#"
            SELECT strftime('%Y-%m', i.InvoiceDate) AS Month,
                SUM(ii.Quantity) AS Quantity,
                ROUND(SUM(ii.UnitPrice * ii.Quantity), 2) AS TotalSales
            FROM invoice_items ii
            INNER JOIN invoices i ON i.InvoiceId = ii.InvoiceId
            GROUP BY Month
            ORDER BY Month
            "#,
            params![],
        )
    }

    fn invoice_line_items(&self) -> Result<Vec<LineItem>> {
        collect_rows(
            &self.conn,
            r#"
            SELECT i.InvoiceDate, ii.UnitPrice, ii.Quantity
            FROM invoice_items ii
            INNER JOIN invoices i ON i.InvoiceId = ii.InvoiceId
            ORDER BY i.InvoiceDate, ii.InvoiceLineId
            "#,
            params![],
            |row: &Row| {
                Ok(LineItem {
                    invoice_date: row.get(0)?,
                    unit_price: row.get(1)?,
                    quantity: row.get(2)?,
                })
            },
        )
        .map_err(PipelineError::query)
    }

    fn artist_line_items(&self) -> Result<Vec<ArtistLineItem>> {
        collect_rows(
            &self.conn,
            r#"
            SELECT ar.Name, i.InvoiceDate, ii.UnitPrice, ii.Quantity
            FROM invoice_items ii
            INNER JOIN invoices i ON i.InvoiceId = ii.InvoiceId
            INNER JOIN tracks t ON t.TrackId = ii.TrackId
            INNER JOIN albums al ON al.AlbumId = t.AlbumId
            INNER JOIN artists ar ON ar.ArtistId = al.ArtistId
            ORDER BY i.InvoiceDate, ii.InvoiceLineId
            "#,
            params![],
            |row: &Row| {
                Ok(ArtistLineItem {
                    artist_name: row.get(0)?,
                    invoice_date: row.get(1)?,
                    unit_price: row.get(2)?,
                    quantity: row.get(3)?,
                })
            },
        )
        .map_err(PipelineError::query)
    }

    fn tracks_by_genre(&self) -> Result<Vec<GenreTrackCount>> {
        collect_rows(
            &self.conn,
            r#"
            SELECT g.Name AS Genre, COUNT(t.TrackId) AS NumTracks
            FROM genres g
            INNER JOIN tracks t ON t.GenreId = g.GenreId
            GROUP BY g.GenreId, g.Name
            ORDER BY NumTracks DESC, Genre ASC
            "#,
            params![],
            |row: &Row| {
                Ok(GenreTrackCount {
                    genre: row.get(0)?,
                    num_tracks: row.get(1)?,
                })
            },
        )
        .map_err(PipelineError::query)
    }

    fn annual_sales_by_month(&self, year: i32) -> Result<Vec<PeriodSales>> {
        let year = format!("{:04}", year);
        self.period_sales(
            r#"
            SELECT strftime('%m', i.InvoiceDate) AS Month,
                SUM(ii.Quantity) AS Quantity,
                ROUND(SUM(ii.UnitPrice * ii.Quantity), 2) AS TotalSales
            FROM invoice_items ii
            INNER JOIN invoices i ON i.InvoiceId = ii.InvoiceId
            WHERE strftime('%Y', i.InvoiceDate) = ?1
            GROUP BY Month
            ORDER BY Month
            "#,
            params![year],
        )
    }

    fn sales_by_quarter(&self) -> Result<Vec<PeriodSales>> {
        collect_rows(
            &self.conn,
            r#"
            SELECT strftime('%Y', i.InvoiceDate) AS Year,
                (CAST(strftime('%m', i.InvoiceDate) AS INTEGER) + 2) / 3 AS Quarter,
                SUM(ii.Quantity) AS Quantity,
                ROUND(SUM(ii.UnitPrice * ii.Quantity), 2) AS TotalSales
            FROM invoice_items ii
            INNER JOIN invoices i ON i.InvoiceId = ii.InvoiceId
            GROUP BY Year, Quarter
            ORDER BY Year, Quarter
            "#,
            params![],
            |row: &Row| {
                let year: String = row.get(0)?;
                let quarter: u32 = row.get(1)?;
                Ok(PeriodSales {
                    period: quarter_label(&year, quarter),
                    quantity: row.get(2)?,
                    total_sales: row.get(3)?,
                })
            },
        )
        .map_err(PipelineError::query)
    }

    fn sales_by_year(&self) -> Result<Vec<PeriodSales>> {
        self.period_sales(
            r#"
            SELECT strftime('%Y', i.InvoiceDate) AS Year,
                SUM(ii.Quantity) AS Quantity,
                ROUND(SUM(ii.UnitPrice * ii.Quantity), 2) AS TotalSales
            FROM invoice_items ii
            INNER JOIN invoices i ON i.InvoiceId = ii.InvoiceId
            GROUP BY Year
            ORDER BY Year
            "#,
            params![],
        )
    }

    fn close(self: Box<Self>) -> Result<()> {
        self.conn.close().map_err(|(_, e)| close_failed(e))?;
        Ok(())
    }
}

fn close_failed(e: rusqlite::Error) -> PipelineError {
    error!("failed to close database: {}", e);
    PipelineError::close(e)
}
