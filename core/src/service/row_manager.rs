use tracing::debug;

use crate::error::RowError;
use crate::model::booking::{BookingRow, Category, TextField};

pub const DEFAULT_CAPACITY: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Activated,
    Deactivated,
}

/// Length of the leading run of active rows.
pub fn active_len(rows: &[BookingRow]) -> usize {
    rows.iter().take_while(|r| r.active).count()
}

/// Row 0 always accepts its checkbox; any other row only up to one past the last active row.
pub fn enabled_for_activation(rows: &[BookingRow], index: usize) -> bool {
    if index >= rows.len() {
        return false;
    }
    if index == 0 {
        return true;
    }
    match rows.iter().rposition(|r| r.active) {
        Some(last) => index <= last + 1,
        None => false,
    }
}

/// State transition for a checkbox press on `index`.
///
/// Activating only flips the flag and is only allowed for the first inactive
/// row. Deactivating removes the row and shifts every later row up one slot;
/// the freed last slot is reset to defaults.
pub fn toggle_rows(rows: &[BookingRow], index: usize) -> Result<Vec<BookingRow>, RowError> {
    if index >= rows.len() {
        return Err(RowError::OutOfRange {
            index,
            capacity: rows.len(),
        });
    }

    let mut next = rows.to_vec();
    if rows[index].active {
        next.remove(index);
        next.push(BookingRow::default());
    } else {
        if index != active_len(rows) {
            return Err(RowError::NotEnabled(index));
        }
        next[index].active = true;
    }
    Ok(next)
}

/// Fixed-capacity list of booking rows with a contiguous active prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowManager {
    rows: Vec<BookingRow>,
}

impl Default for RowManager {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl RowManager {
    pub fn new(capacity: usize) -> Self {
        Self {
            rows: vec![BookingRow::default(); capacity.max(1)],
        }
    }

    pub fn capacity(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[BookingRow] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&BookingRow> {
        self.rows.get(index)
    }

    pub fn active_len(&self) -> usize {
        active_len(&self.rows)
    }

    pub fn enabled_for_activation(&self, index: usize) -> bool {
        enabled_for_activation(&self.rows, index)
    }

    /// Category, date, picker and price controls follow the checkbox.
    pub fn fields_enabled(&self, index: usize) -> bool {
        self.rows.get(index).is_some_and(|r| r.active)
    }

    pub fn toggle(&mut self, index: usize) -> Result<Toggle, RowError> {
        let next = toggle_rows(&self.rows, index)?;
        let outcome = if self.rows[index].active {
            Toggle::Deactivated
        } else {
            Toggle::Activated
        };
        self.rows = next;
        debug!(index, ?outcome, active = self.active_len(), "row toggled");
        Ok(outcome)
    }

    pub fn set_category(&mut self, index: usize, category: Option<Category>) -> Result<(), RowError> {
        let row = self.editable_row(index)?;
        row.category = category;
        Ok(())
    }

    pub fn set_text(&mut self, index: usize, field: TextField, value: impl Into<String>) -> Result<(), RowError> {
        let row = self.editable_row(index)?;
        let slot = match field {
            TextField::StartDate => &mut row.start_date,
            TextField::EndDate => &mut row.end_date,
            TextField::Price => &mut row.price,
        };
        *slot = value.into();
        Ok(())
    }

    pub fn text(&self, index: usize, field: TextField) -> Option<&str> {
        self.rows.get(index).map(|row| match field {
            TextField::StartDate => row.start_date.as_str(),
            TextField::EndDate => row.end_date.as_str(),
            TextField::Price => row.price.as_str(),
        })
    }

    /// Resets every slot to its empty default.
    pub fn clear_all(&mut self) {
        self.rows.iter_mut().for_each(|r| *r = BookingRow::default());
    }

    pub fn snapshot(&self) -> Vec<BookingRow> {
        self.rows.clone()
    }

    /// Replaces all rows with a snapshot taken from this manager.
    pub fn restore(&mut self, mut rows: Vec<BookingRow>) {
        rows.resize(self.capacity(), BookingRow::default());
        self.rows = rows;
    }

    fn editable_row(&mut self, index: usize) -> Result<&mut BookingRow, RowError> {
        let capacity = self.rows.len();
        match self.rows.get_mut(index) {
            None => Err(RowError::OutOfRange { index, capacity }),
            Some(row) if !row.active => Err(RowError::RowDisabled(index)),
            Some(row) => Ok(row),
        }
    }
}
