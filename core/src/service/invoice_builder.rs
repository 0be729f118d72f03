use rust_decimal::Decimal;
use tracing::info;

use crate::error::ValidationError;
use crate::model::booking::{BookingRecord, BookingRow, Invoice, InvoiceOutcome};
use crate::money::{parse_price, round_price, PriceError};
use crate::time::{date_range_label, parse_date};

/// Validates the active rows in slot order and sums their rounded prices.
///
/// Stops at the first invalid field. Inactive rows are skipped; with no active
/// row at all the outcome is [`InvoiceOutcome::NoSelection`].
pub fn build(rows: &[BookingRow]) -> Result<InvoiceOutcome, ValidationError> {
    let mut records = Vec::new();
    let mut total = Decimal::ZERO;

    for (index, row) in rows.iter().enumerate() {
        if !row.active {
            continue;
        }
        let record = to_record(index + 1, row)?;
        total = total
            .checked_add(record.price)
            .ok_or(ValidationError::InvalidPrice { row: index + 1 })?;
        records.push(record);
    }

    if records.is_empty() {
        return Ok(InvoiceOutcome::NoSelection);
    }

    info!(lines = records.len(), %total, "invoice built");
    Ok(InvoiceOutcome::Ready(Invoice { records, total }))
}

fn to_record(row: usize, booking: &BookingRow) -> Result<BookingRecord, ValidationError> {
    let category = booking
        .category
        .ok_or(ValidationError::MissingCategory { row })?;
    let start = parse_date(&booking.start_date)
        .map_err(|_| ValidationError::InvalidStartDate { row })?;
    let end = parse_date(&booking.end_date)
        .map_err(|_| ValidationError::InvalidEndDate { row })?;
    if end <= start {
        return Err(ValidationError::InvalidDateOrder { row });
    }
    let price = parse_price(&booking.price).map_err(|e| match e {
        PriceError::Negative => ValidationError::NegativePrice { row },
        PriceError::Invalid(_) | PriceError::TooLarge => ValidationError::InvalidPrice { row },
    })?;

    Ok(BookingRecord {
        category,
        date_range_label: date_range_label(start, end),
        price: round_price(price),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::booking::Category;
    use crate::money::format_currency;
    use std::str::FromStr;

    fn row(category: Option<Category>, start: &str, end: &str, price: &str) -> BookingRow {
        BookingRow {
            active: true,
            category,
            start_date: start.to_string(),
            end_date: end.to_string(),
            price: price.to_string(),
        }
    }

    fn ready(outcome: InvoiceOutcome) -> Invoice {
        match outcome {
            InvoiceOutcome::Ready(invoice) => invoice,
            InvoiceOutcome::NoSelection => panic!("expected an invoice"),
        }
    }

    #[test]
    fn test_single_row_example() {
        let rows = vec![row(Some(Category::FullBoard), "01.03.2024", "05.03.2024", "99,5")];

        let invoice = ready(build(&rows).unwrap());

        assert_eq!(invoice.records.len(), 1);
        let record = &invoice.records[0];
        assert_eq!(record.category.label(), "Vollpension");
        assert_eq!(record.date_range_label, "01.03.2024–05.03.2024");
        assert_eq!(format_currency(record.price), "99,50");
        assert_eq!(format_currency(invoice.total), "99,50");
    }

    #[test]
    fn test_total_is_sum_of_rounded_prices() {
        let rows = vec![
            row(Some(Category::FullBoard), "01.03.2024", "05.03.2024", "10,00"),
            row(Some(Category::HalfBoard), "05.03.2024", "06.03.2024", "5,005"),
        ];

        let invoice = ready(build(&rows).unwrap());

        assert_eq!(format_currency(invoice.records[1].price), "5,01");
        assert_eq!(invoice.total, Decimal::from_str("15.01").unwrap());
        assert_eq!(format_currency(invoice.total), "15,01");
    }

    #[test]
    fn test_rounding_happens_per_line() {
        // 0,004 + 0,004 would round to 0,01 when summed raw
        let rows = vec![
            row(Some(Category::Special), "01.01.2024", "02.01.2024", "0,004"),
            row(Some(Category::Special), "01.01.2024", "02.01.2024", "0,004"),
        ];

        let invoice = ready(build(&rows).unwrap());

        assert_eq!(format_currency(invoice.total), "0,00");
    }

    #[test]
    fn test_no_active_rows() {
        let rows = vec![BookingRow::default(); 3];
        assert_eq!(build(&rows).unwrap(), InvoiceOutcome::NoSelection);
    }

    #[test]
    fn test_inactive_rows_are_skipped() {
        let mut inactive = row(None, "garbage", "", "x");
        inactive.active = false;
        let rows = vec![
            row(Some(Category::HalfBoard), "01.03.2024", "02.03.2024", "1"),
            inactive,
        ];

        let invoice = ready(build(&rows).unwrap());
        assert_eq!(invoice.records.len(), 1);
    }

    #[test]
    fn test_category_checked_before_dates() {
        let rows = vec![row(None, "not a date", "31.02.2024", "abc")];
        assert_eq!(build(&rows), Err(ValidationError::MissingCategory { row: 1 }));
    }

    #[test]
    fn test_validation_order_per_field() {
        let cat = Some(Category::FullBoard);
        assert_eq!(
            build(&[row(cat, "", "", "x")]),
            Err(ValidationError::InvalidStartDate { row: 1 })
        );
        assert_eq!(
            build(&[row(cat, "01.03.2024", "05.13.2024", "x")]),
            Err(ValidationError::InvalidEndDate { row: 1 })
        );
        assert_eq!(
            build(&[row(cat, "05.03.2024", "01.03.2024", "x")]),
            Err(ValidationError::InvalidDateOrder { row: 1 })
        );
        assert_eq!(
            build(&[row(cat, "01.03.2024", "05.03.2024", "x")]),
            Err(ValidationError::InvalidPrice { row: 1 })
        );
        assert_eq!(
            build(&[row(cat, "01.03.2024", "05.03.2024", "-3")]),
            Err(ValidationError::NegativePrice { row: 1 })
        );
    }

    #[test]
    fn test_equal_dates_rejected() {
        let rows = vec![row(Some(Category::FullBoard), "01.03.2024", "01.03.2024", "10")];
        assert_eq!(build(&rows), Err(ValidationError::InvalidDateOrder { row: 1 }));
    }

    #[test]
    fn test_first_failing_row_is_reported() {
        let rows = vec![
            row(Some(Category::FullBoard), "01.03.2024", "02.03.2024", "10"),
            row(Some(Category::FullBoard), "01.03.2024", "02.03.2024", "zehn"),
            row(None, "", "", ""),
        ];
        assert_eq!(build(&rows), Err(ValidationError::InvalidPrice { row: 2 }));
    }

    #[test]
    fn test_huge_prices_are_rejected_not_summed() {
        let max = "79228162514264337593543950335";
        let rows = vec![
            row(Some(Category::FullBoard), "01.03.2024", "02.03.2024", max),
            row(Some(Category::FullBoard), "01.03.2024", "02.03.2024", max),
        ];
        assert_eq!(build(&rows), Err(ValidationError::InvalidPrice { row: 1 }));
    }

    #[test]
    fn test_largest_prices_still_add_up() {
        let rows = vec![
            row(Some(Category::FullBoard), "01.03.2024", "02.03.2024", "999999999,99"),
            row(Some(Category::HalfBoard), "01.03.2024", "02.03.2024", "999999999,99"),
            row(Some(Category::Special), "01.03.2024", "02.03.2024", "999999999,99"),
        ];

        let invoice = ready(build(&rows).unwrap());
        assert_eq!(format_currency(invoice.total), "2999999999,97");
    }
}
