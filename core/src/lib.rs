pub mod error;
pub mod input;
pub mod model;
pub mod money;
pub mod service;
pub mod time;
pub mod usecase;

pub use error::{Field, RowError, ValidationError};
pub use input::{expand_key, parse_args, parse_row_spec, ParsedInput, RowSpec};
pub use model::booking::{
    BookingRecord, BookingRow, Category, DateField, Invoice, InvoiceOutcome, TextField,
};
pub use model::color::Rgb;
pub use money::{format_currency, parse_price, round_price, PriceError, MAX_PRICE};
pub use service::dto::{InvoiceDto, InvoiceLineDto};
pub use service::invoice_builder::build;
pub use service::row_manager::{toggle_rows, RowManager, Toggle, DEFAULT_CAPACITY};
pub use time::{date_range_label, format_date, parse_date};
pub use usecase::booking_form::{BookingForm, ClearState};
