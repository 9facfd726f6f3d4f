use crate::domain::{ArtistLineItem, ArtistSales, LineItem, PeriodSales};
use crate::ports::Result;
use crate::utils::{line_amount, round_money, year_month};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};

/// Groups line items by the year-month of their invoice date, in this process.
/// Output is ordered by month.
pub fn sales_by_month(items: &[LineItem]) -> Result<Vec<PeriodSales>> {
    let mut grouped: BTreeMap<String, (i64, Decimal)> = BTreeMap::new();

    for item in items {
        let month = year_month(&item.invoice_date)?;
        let entry = grouped.entry(month).or_insert((0, Decimal::ZERO));
        entry.0 += item.quantity;
        entry.1 += line_amount(item.unit_price, item.quantity);
    }

    Ok(grouped
        .into_iter()
        .map(|(period, (quantity, total))| PeriodSales {
            period,
            quantity,
            total_sales: round_money(total),
        })
        .collect())
}

/// Groups line items per artist, sorts by total sales descending and keeps
/// the first `limit` artists. Ties are broken by artist name.
pub fn top_artists(items: &[ArtistLineItem], limit: usize) -> Result<Vec<ArtistSales>> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut grouped: Vec<(ArtistSales, Decimal)> = Vec::new();

    for item in items {
        let line_total = line_amount(item.unit_price, item.quantity);
        match index.get(item.artist_name.as_str()) {
            Some(&position) => {
                let (sales, total) = &mut grouped[position];
                sales.quantity += item.quantity;
                *total += line_total;
            }
            None => {
                // month of the first line item seen for this artist
                let month = year_month(&item.invoice_date)?;
                index.insert(item.artist_name.as_str(), grouped.len());
                grouped.push((
                    ArtistSales {
                        artist_name: item.artist_name.clone(),
                        total_sales: 0.0,
                        quantity: item.quantity,
                        month,
                    },
                    line_total,
                ));
            }
        }
    }

    let mut artists: Vec<ArtistSales> = grouped
        .into_iter()
        .map(|(mut sales, total)| {
            sales.total_sales = round_money(total);
            sales
        })
        .collect();

    artists.sort_by(|a, b| {
        b.total_sales
            .total_cmp(&a.total_sales)
            .then_with(|| a.artist_name.cmp(&b.artist_name))
    });
    artists.truncate(limit);

    Ok(artists)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(date: &str, unit_price: f64, quantity: i64) -> LineItem {
        LineItem {
            invoice_date: date.to_string(),
            unit_price,
            quantity,
        }
    }

    fn artist_item(artist: &str, date: &str, unit_price: f64, quantity: i64) -> ArtistLineItem {
        ArtistLineItem {
            artist_name: artist.to_string(),
            invoice_date: date.to_string(),
            unit_price,
            quantity,
        }
    }

    #[test]
    fn test_sales_by_month_groups_and_sums() {
        let items = vec![
            item("2009-02-01 00:00:00", 0.99, 1),
            item("2009-01-01 00:00:00", 0.99, 2),
            item("2009-01-11 00:00:00", 1.99, 1),
        ];

        let months = sales_by_month(&items).unwrap();

        assert_eq!(
            months,
            vec![
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
            ]
        );
    }

    #[test]
    fn test_sales_by_month_preserves_total_quantity() {
        let items = vec![
            item("2010-03-01 00:00:00", 0.99, 1),
            item("2010-04-01 00:00:00", 0.99, 4),
            item("2011-03-01 00:00:00", 1.99, 2),
            item("2011-03-09 00:00:00", 0.99, 1),
        ];

        let months = sales_by_month(&items).unwrap();
        let grouped: i64 = months.iter().map(|m| m.quantity).sum();
        let raw: i64 = items.iter().map(|i| i.quantity).sum();

        assert_eq!(grouped, raw);
        assert_eq!(months.len(), 3);
    }

    #[test]
    fn test_sales_by_month_empty() {
        assert!(sales_by_month(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_sales_by_month_rejects_bad_date() {
        let items = vec![item("yesterday-ish", 0.99, 1)];
        assert!(sales_by_month(&items).is_err());
    }

    #[test]
    fn test_top_artists_orders_descending_and_limits() {
        let items = vec![
            artist_item("D", "2009-01-01 00:00:00", 100.0, 1),
            artist_item("A", "2009-01-01 00:00:00", 250.0, 2),
            artist_item("C", "2009-02-01 00:00:00", 200.0, 1),
            artist_item("B", "2009-03-01 00:00:00", 300.0, 1),
        ];

        let top = top_artists(&items, 3).unwrap();
        let names: Vec<&str> = top.iter().map(|a| a.artist_name.as_str()).collect();

        assert_eq!(names, vec!["A", "B", "C"]);
        assert_eq!(top[0].total_sales, 500.0);
        assert!(top.windows(2).all(|w| w[0].total_sales >= w[1].total_sales));
    }

    #[test]
    fn test_top_artists_limit_larger_than_artist_count() {
        let items = vec![
            artist_item("A", "2009-01-01 00:00:00", 0.99, 1),
            artist_item("B", "2009-01-01 00:00:00", 0.99, 1),
        ];

        let top = top_artists(&items, 10).unwrap();

        assert_eq!(top.len(), 2);
        // equal totals fall back to name order
        assert_eq!(top[0].artist_name, "A");
    }

    #[test]
    fn test_top_artists_keeps_first_month_and_sums_quantity() {
        let items = vec![
            artist_item("AC/DC", "2009-05-01 00:00:00", 0.99, 1),
            artist_item("AC/DC", "2010-02-01 00:00:00", 0.99, 2),
        ];

        let top = top_artists(&items, 1).unwrap();

        assert_eq!(top[0].month, "2009-05");
        assert_eq!(top[0].quantity, 3);
        assert_eq!(top[0].total_sales, 2.97);
    }
}
