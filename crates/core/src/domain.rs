use std::fmt;

/// One invoice line joined to its invoice date.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub invoice_date: String,
    pub unit_price: f64,
    pub quantity: i64,
}

/// One invoice line joined through tracks and albums to its artist.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtistLineItem {
    pub artist_name: String,
    pub invoice_date: String,
    pub unit_price: f64,
    pub quantity: i64,
}

/// Aggregated sales for one period key (a month, quarter or year).
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodSales {
    pub period: String,
    pub quantity: i64,
    pub total_sales: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArtistSales {
    pub artist_name: String,
    pub total_sales: f64,
    pub quantity: i64,
    /// Year-month of the first line item seen for the artist
    pub month: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenreTrackCount {
    pub genre: String,
    pub num_tracks: i64,
}

/// A single typed value in a report table
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Integer(i64),
    /// Monetary amount, always rendered with two decimals
    Money(f64),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(value) => write!(f, "{}", value),
            Cell::Integer(value) => write!(f, "{}", value),
            Cell::Money(value) => write!(f, "{:.2}", value),
        }
    }
}

/// Ordered rows under named columns, the output of one report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportTable {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl ReportTable {
    /// Builds a `<key>,Quantity,TotalSales` table from period aggregates
    pub fn from_period_sales(name: &str, key_column: &str, rows: &[PeriodSales]) -> Self {
        Self {
            name: name.to_string(),
            columns: vec![
                key_column.to_string(),
                "Quantity".to_string(),
                "TotalSales".to_string(),
            ],
            rows: rows
                .iter()
                .map(|row| {
                    vec![
                        Cell::Text(row.period.clone()),
                        Cell::Integer(row.quantity),
                        Cell::Money(row.total_sales),
                    ]
                })
                .collect(),
        }
    }

    pub fn from_artist_sales(name: &str, rows: &[ArtistSales]) -> Self {
        Self {
            name: name.to_string(),
            columns: vec![
                "ArtistName".to_string(),
                "TotalSales".to_string(),
                "Quantity".to_string(),
                "Month".to_string(),
            ],
            rows: rows
                .iter()
                .map(|row| {
                    vec![
                        Cell::Text(row.artist_name.clone()),
                        Cell::Money(row.total_sales),
                        Cell::Integer(row.quantity),
                        Cell::Text(row.month.clone()),
                    ]
                })
                .collect(),
        }
    }

    pub fn from_genre_counts(name: &str, rows: &[GenreTrackCount]) -> Self {
        Self {
            name: name.to_string(),
            columns: vec!["Genre".to_string(), "NumTracks".to_string()],
            rows: rows
                .iter()
                .map(|row| vec![Cell::Text(row.genre.clone()), Cell::Integer(row.num_tracks)])
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
