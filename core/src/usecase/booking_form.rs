use chrono::NaiveDate;
use tracing::{debug, info};

use crate::error::{RowError, ValidationError};
use crate::model::booking::{BookingRow, Category, DateField, InvoiceOutcome, TextField};
use crate::model::color::Rgb;
use crate::service::invoice_builder;
use crate::service::row_manager::{RowManager, Toggle};
use crate::time::{format_date, parse_date};

pub const CLEAR_LABEL: &str = "Clear";
pub const BACK_LABEL: &str = "Zurück";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearState {
    /// Rows hold the user's data; the button offers "Clear".
    Editing,
    /// Rows were cleared and a snapshot is held; the button offers "Zurück".
    Cleared,
}

/// Application state handed to every UI handler.
#[derive(Debug, Clone)]
pub struct BookingForm {
    rows: RowManager,
    backup: Option<Vec<BookingRow>>,
    background: Rgb,
}

impl BookingForm {
    pub fn new(capacity: usize, background: Rgb) -> Self {
        Self {
            rows: RowManager::new(capacity),
            backup: None,
            background,
        }
    }

    pub fn rows(&self) -> &RowManager {
        &self.rows
    }

    pub fn toggle(&mut self, index: usize) -> Result<Toggle, RowError> {
        self.rows.toggle(index)
    }

    pub fn set_category(&mut self, index: usize, category: Option<Category>) -> Result<(), RowError> {
        self.rows.set_category(index, category)
    }

    pub fn set_text(&mut self, index: usize, field: TextField, value: impl Into<String>) -> Result<(), RowError> {
        self.rows.set_text(index, field, value)
    }

    /// First press snapshots and clears every row, second press restores the snapshot.
    pub fn clear_or_restore(&mut self) -> ClearState {
        match self.backup.take() {
            None => {
                self.backup = Some(self.rows.snapshot());
                self.rows.clear_all();
                info!("form cleared, snapshot held");
                ClearState::Cleared
            }
            Some(rows) => {
                self.rows.restore(rows);
                info!(active = self.rows.active_len(), "form restored from snapshot");
                ClearState::Editing
            }
        }
    }

    pub fn clear_state(&self) -> ClearState {
        if self.backup.is_some() {
            ClearState::Cleared
        } else {
            ClearState::Editing
        }
    }

    pub fn is_cleared(&self) -> bool {
        self.clear_state() == ClearState::Cleared
    }

    pub fn clear_button_label(&self) -> &'static str {
        match self.clear_state() {
            ClearState::Editing => CLEAR_LABEL,
            ClearState::Cleared => BACK_LABEL,
        }
    }

    pub fn show_invoice(&self) -> Result<InvoiceOutcome, ValidationError> {
        invoice_builder::build(self.rows.rows())
    }

    /// Date the picker opens on: the typed date if it parses, otherwise `today`.
    pub fn picker_seed(&self, index: usize, field: DateField, today: NaiveDate) -> Result<NaiveDate, RowError> {
        if !self.rows.fields_enabled(index) {
            return Err(self.disabled_error(index));
        }
        let typed = self.rows.text(index, field.into()).unwrap_or_default();
        Ok(parse_date(typed).unwrap_or(today))
    }

    /// Writes the picked date into the field; a cancelled pick leaves it unchanged.
    pub fn apply_picked_date(&mut self, index: usize, field: DateField, picked: Option<NaiveDate>) -> Result<(), RowError> {
        match picked {
            Some(date) => {
                debug!(index, ?field, %date, "date picked");
                self.rows.set_text(index, field.into(), format_date(date))
            }
            None => Ok(()),
        }
    }

    pub fn background(&self) -> Rgb {
        self.background
    }

    pub fn set_background(&mut self, color: Rgb) {
        debug!(color = %color, "background changed");
        self.background = color;
    }

    fn disabled_error(&self, index: usize) -> RowError {
        if index >= self.rows.capacity() {
            RowError::OutOfRange {
                index,
                capacity: self.rows.capacity(),
            }
        } else {
            RowError::RowDisabled(index)
        }
    }
}
