use serde::{Deserialize, Serialize};

use crate::model::booking::Invoice;
use crate::money::format_currency;

/// One invoice line with every value already formatted for display.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct InvoiceLineDto {
    pub category: String,
    pub period: String,
    pub amount: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct InvoiceDto {
    pub lines: Vec<InvoiceLineDto>,
    pub total: String,
}

impl InvoiceDto {
    pub fn from_invoice(invoice: &Invoice) -> Self {
        let lines = invoice
            .records
            .iter()
            .map(|r| InvoiceLineDto {
                category: r.category.label().to_string(),
                period: r.date_range_label.clone(),
                amount: format_currency(r.price),
            })
            .collect();

        Self {
            lines,
            total: format_currency(invoice.total),
        }
    }

    pub fn total_line(&self) -> String {
        format!("Gesamtbetrag (Euro): {}", self.total)
    }
}
