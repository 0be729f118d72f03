use thiserror::Error;

/// Field of a row a validation error points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Category,
    StartDate,
    EndDate,
    Price,
}

/// First problem found while building an invoice. `row` is 1-indexed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Bitte Art in Zeile {row} wählen.")]
    MissingCategory { row: usize },
    #[error("Ungültiges Startdatum in Zeile {row}.")]
    InvalidStartDate { row: usize },
    #[error("Ungültiges Enddatum in Zeile {row}.")]
    InvalidEndDate { row: usize },
    #[error("Enddatum muss nach dem Anfangsdatum liegen (Zeile {row}).")]
    InvalidDateOrder { row: usize },
    #[error("Ungültiger Preis in Zeile {row}.")]
    InvalidPrice { row: usize },
    #[error("Preis muss mindestens 0,00 sein (Zeile {row}).")]
    NegativePrice { row: usize },
}

impl ValidationError {
    pub fn row(&self) -> usize {
        match self {
            ValidationError::MissingCategory { row }
            | ValidationError::InvalidStartDate { row }
            | ValidationError::InvalidEndDate { row }
            | ValidationError::InvalidDateOrder { row }
            | ValidationError::InvalidPrice { row }
            | ValidationError::NegativePrice { row } => *row,
        }
    }

    pub fn field(&self) -> Field {
        match self {
            ValidationError::MissingCategory { .. } => Field::Category,
            ValidationError::InvalidStartDate { .. } => Field::StartDate,
            ValidationError::InvalidEndDate { .. } | ValidationError::InvalidDateOrder { .. } => {
                Field::EndDate
            }
            ValidationError::InvalidPrice { .. } | ValidationError::NegativePrice { .. } => {
                Field::Price
            }
        }
    }
}

/// Rejected row-state change. Indices are 0-based slot positions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    #[error("row {index} does not exist (form has {capacity} rows)")]
    OutOfRange { index: usize, capacity: usize },
    #[error("row {0} cannot be activated before the rows above it")]
    NotEnabled(usize),
    #[error("row {0} is not active")]
    RowDisabled(usize),
}
