use anyhow::{bail, Context, Result};
use booking_core::{parse_row_spec, BookingForm, InvoiceDto, InvoiceOutcome, RowSpec, TextField};
use tabled::settings::object::{Columns, Rows};
use tabled::settings::{Alignment, Color, Modify, Style};
use tabled::{Table, Tabled};
use tracing::info;

use crate::tui::app::NO_SELECTION_NOTICE;

#[derive(Tabled)]
struct InvoiceRow {
    #[tabled(rename = "Art")]
    category: String,
    #[tabled(rename = "Zeitraum")]
    period: String,
    #[tabled(rename = "Betrag in €")]
    amount: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Report {
    Invoice(String),
    Notice(String),
    Invalid(String),
}

/// Activates one row per spec, in order, and fills it in.
pub fn fill_form(form: &mut BookingForm, specs: &[RowSpec]) -> Result<()> {
    let capacity = form.rows().capacity();
    if specs.len() > capacity {
        bail!("{} rows given but the form only has {} slots", specs.len(), capacity);
    }

    for (index, spec) in specs.iter().enumerate() {
        form.toggle(index)?;
        form.set_category(index, spec.category)?;
        form.set_text(index, TextField::StartDate, spec.start_date.as_str())?;
        form.set_text(index, TextField::EndDate, spec.end_date.as_str())?;
        if let Some(price) = &spec.price {
            form.set_text(index, TextField::Price, price.as_str())?;
        }
    }
    Ok(())
}

pub fn report(form: &BookingForm, json: bool) -> Result<Report> {
    let invoice = match form.show_invoice() {
        Ok(InvoiceOutcome::Ready(invoice)) => invoice,
        Ok(InvoiceOutcome::NoSelection) => return Ok(Report::Notice(NO_SELECTION_NOTICE.to_string())),
        Err(e) => return Ok(Report::Invalid(e.to_string())),
    };

    let dto = InvoiceDto::from_invoice(&invoice);
    let text = if json {
        serde_json::to_string_pretty(&dto).context("Failed to serialize invoice")?
    } else {
        render_table(&dto)
    };
    Ok(Report::Invoice(text))
}

fn render_table(dto: &InvoiceDto) -> String {
    let rows: Vec<InvoiceRow> = dto
        .lines
        .iter()
        .map(|line| InvoiceRow {
            category: line.category.clone(),
            period: line.period.clone(),
            amount: line.amount.clone(),
        })
        .collect();

    let mut table = Table::new(rows);
    table
        .with(Style::modern())
        .with(Modify::new(Columns::last()).with(Alignment::right()))
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN));

    format!("{}\n{}", table, dto.total_line())
}

/// Returns `false` when the rows did not validate.
pub fn run(mut form: BookingForm, args: &[String], json: bool) -> Result<bool> {
    let specs = args
        .iter()
        .map(|arg| parse_row_spec(arg).with_context(|| format!("Invalid row '{}'", arg)))
        .collect::<Result<Vec<_>>>()?;
    fill_form(&mut form, &specs)?;
    info!(rows = specs.len(), json, "quick invoice requested");

    match report(&form, json)? {
        Report::Invoice(text) | Report::Notice(text) => {
            println!("{}", text);
            Ok(true)
        }
        Report::Invalid(message) => {
            eprintln!("Fehler: {}", message);
            Ok(false)
        }
    }
}
