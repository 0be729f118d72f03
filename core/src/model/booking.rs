use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::input::expand_key;

pub const DEFAULT_PRICE: &str = "0,00";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    FullBoard,
    HalfBoard,
    Special,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::FullBoard, Category::HalfBoard, Category::Special];

    pub fn label(&self) -> &'static str {
        match self {
            Category::FullBoard => "Vollpension",
            Category::HalfBoard => "Halbpension",
            Category::Special => "Spezialangebot",
        }
    }

    /// Next option in selector order, wrapping around. `None` starts at the first option.
    pub fn cycle(current: Option<Category>) -> Category {
        match current {
            None | Some(Category::Special) => Category::FullBoard,
            Some(Category::FullBoard) => Category::HalfBoard,
            Some(Category::HalfBoard) => Category::Special,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = anyhow::Error;

    /// Accepts the label or any unambiguous prefix of it, ignoring case.
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        if wanted.is_empty() {
            return Err(anyhow!("Empty category"));
        }
        let labels: Vec<String> = Category::ALL.iter().map(|c| c.label().to_lowercase()).collect();
        let candidates: Vec<&str> = labels.iter().map(String::as_str).collect();
        let matched = expand_key(&wanted, &candidates)?;

        Category::ALL
            .into_iter()
            .find(|c| c.label().to_lowercase() == matched)
            .ok_or_else(|| anyhow!("Unknown category: '{}'", s))
    }
}

/// One slot of the booking form. Dates and price hold the raw field text.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BookingRow {
    pub active: bool,
    pub category: Option<Category>,
    pub start_date: String,
    pub end_date: String,
    pub price: String,
}

impl Default for BookingRow {
    fn default() -> Self {
        Self {
            active: false,
            category: None,
            start_date: String::new(),
            end_date: String::new(),
            price: DEFAULT_PRICE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    StartDate,
    EndDate,
    Price,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    Start,
    End,
}

impl From<DateField> for TextField {
    fn from(field: DateField) -> Self {
        match field {
            DateField::Start => TextField::StartDate,
            DateField::End => TextField::EndDate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRecord {
    pub category: Category,
    pub date_range_label: String,
    /// Already rounded to two decimal places.
    pub price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invoice {
    pub records: Vec<BookingRecord>,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvoiceOutcome {
    Ready(Invoice),
    NoSelection,
}
