use booking_core::{InvoiceDto, Rgb};
use chrono::{Datelike, NaiveDate};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, Clear, Paragraph, Row, Table},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::tui::app::{App, Button, Column, Focus, Message, Mode};
use crate::tui::picker::{CalendarState, Channel, ColorPickerState, WEEKDAY_HEADER};

const COLUMN_WIDTHS: [u16; 7] = [3, 18, 12, 3, 12, 3, 13];
const COLUMN_HEADERS: [&str; 7] = ["", "Art", "Vom", "", "Bis", "", "Preis in Euro"];

/// Every widget is drawn on the user's background colour.
struct Theme {
    base: Style,
    muted: Style,
    accent: Style,
    bg: Color,
}

impl Theme {
    fn from_background(rgb: Rgb) -> Self {
        let bg = Color::Rgb(rgb.r, rgb.g, rgb.b);
        let (fg, muted, accent) = if rgb.is_light() {
            (Color::Black, Color::Gray, Color::Blue)
        } else {
            (Color::White, Color::DarkGray, Color::Cyan)
        };
        Self {
            base: Style::default().bg(bg).fg(fg),
            muted: Style::default().bg(bg).fg(muted),
            accent: Style::default().bg(bg).fg(accent).add_modifier(Modifier::BOLD),
            bg,
        }
    }

    fn block(&self, title: &str) -> Block<'static> {
        Block::default()
            .title(format!(" {} ", title))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .style(self.base)
    }
}

pub fn draw(f: &mut Frame, app: &App) {
    let theme = Theme::from_background(app.form.background());
    let size = f.area();
    f.render_widget(Block::default().style(theme.base), size);

    let form_height = app.form.rows().capacity() as u16 + 3;
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),           // Menu
            Constraint::Length(3),           // Title
            Constraint::Length(form_height), // Rows
            Constraint::Length(3),           // Buttons
            Constraint::Min(0),
            Constraint::Length(1), // Footer/Help
        ])
        .split(size);

    let menu = Paragraph::new(Line::from(vec![
        Span::styled(" Einstellungen ", theme.accent),
        Span::styled("F2: Farbschema…", theme.base),
    ]))
    .style(theme.base);
    f.render_widget(menu, main_chunks[0]);

    let header = Paragraph::new("Buchungsabrechnung")
        .style(theme.accent)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded).style(theme.base));
    f.render_widget(header, main_chunks[1]);

    draw_rows(f, app, &theme, main_chunks[2]);
    draw_buttons(f, app, &theme, main_chunks[3]);

    let footer = Paragraph::new(help_text(&app.mode))
        .style(theme.muted)
        .alignment(Alignment::Center);
    f.render_widget(footer, main_chunks[5]);

    match &app.mode {
        Mode::Message(message) => draw_message(f, message, &theme),
        Mode::Invoice(invoice) => draw_invoice(f, invoice, &theme),
        Mode::PickDate { calendar, .. } => draw_calendar(f, calendar, app.today, &theme),
        Mode::PickColor(picker) => draw_color_picker(f, picker, &theme),
        Mode::Normal | Mode::Editing { .. } => {}
    }
}

fn help_text(mode: &Mode) -> &'static str {
    match mode {
        Mode::Normal => "↑↓←→: Navigieren | Enter: Auswählen | 1-3: Art | c: Clear/Zurück | r: Rechnung | F2: Farbe | q: Beenden",
        Mode::Editing { .. } => "Enter: Übernehmen | Esc: Abbrechen",
        Mode::Message(_) | Mode::Invoice(_) => "Enter/Esc: Schließen",
        Mode::PickDate { .. } => "←→↑↓: Tag | PgUp/PgDn: Monat | Enter: OK | Esc: Abbrechen",
        Mode::PickColor(_) => "←→: Kanal | ↑↓: ±1 | PgUp/PgDn: ±16 | Enter: OK | Esc: Abbrechen",
    }
}

fn column_layout(area: Rect) -> std::rc::Rc<[Rect]> {
    let mut constraints: Vec<Constraint> = COLUMN_WIDTHS.iter().map(|w| Constraint::Length(*w)).collect();
    constraints.push(Constraint::Min(0));
    Layout::default()
        .direction(Direction::Horizontal)
        .spacing(1)
        .constraints(constraints)
        .split(area)
}

fn draw_rows(f: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let block = theme.block("Buchungen");
    let inner = block.inner(area);
    f.render_widget(block, area);
    if inner.height == 0 {
        return;
    }

    let header_cells = column_layout(Rect { height: 1, ..inner });
    for (rect, label) in header_cells.iter().zip(COLUMN_HEADERS) {
        f.render_widget(Paragraph::new(label).style(theme.accent), *rect);
    }

    let manager = app.form.rows();
    for (index, row) in manager.rows().iter().enumerate() {
        let y = inner.y + 1 + index as u16;
        if y >= inner.y + inner.height {
            break;
        }
        let cells = column_layout(Rect { y, height: 1, ..inner });

        for (rect, column) in cells.iter().zip(Column::ALL) {
            let enabled = match column {
                Column::Check => manager.enabled_for_activation(index),
                _ => manager.fields_enabled(index),
            };
            let editing = matches!(
                app.mode,
                Mode::Editing { row, field } if row == index && column.text_field() == Some(field)
            );

            let text = if editing {
                app.input.clone()
            } else {
                match column {
                    Column::Check => if row.active { "[x]" } else { "[ ]" }.to_string(),
                    Column::Category => {
                        let label = row.category.map(|c| c.label()).unwrap_or("");
                        format!("{:<16}▾", label)
                    }
                    Column::StartDate => row.start_date.clone(),
                    Column::EndDate => row.end_date.clone(),
                    Column::Price => row.price.clone(),
                    Column::StartPicker | Column::EndPicker => "…".to_string(),
                }
            };

            let mut style = if enabled { theme.base } else { theme.muted };
            if column.text_field().is_some() {
                style = style.add_modifier(Modifier::UNDERLINED);
            }
            if app.focus == (Focus::Cell { row: index, column }) {
                style = style.add_modifier(Modifier::REVERSED);
            }
            if editing {
                style = theme.base.add_modifier(Modifier::BOLD);
                let offset = app.input_before_cursor().width() as u16;
                f.set_cursor_position((rect.x + offset.min(rect.width.saturating_sub(1)), rect.y));
            }

            f.render_widget(Paragraph::new(text).style(style), *rect);
        }
    }
}

fn draw_buttons(f: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(14),
            Constraint::Length(22),
            Constraint::Length(14),
            Constraint::Min(0),
        ])
        .split(area);

    for (rect, button) in chunks.iter().zip(Button::ALL) {
        let label = match button {
            Button::Clear => app.form.clear_button_label(),
            Button::Invoice => "Rechnung anzeigen",
            Button::Quit => "Beenden",
        };
        let mut style = theme.base;
        if app.focus == Focus::Button(button) {
            style = style.add_modifier(Modifier::REVERSED);
        }
        let widget = Paragraph::new(label)
            .style(style)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded).style(theme.base));
        f.render_widget(widget, *rect);
    }
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn draw_message(f: &mut Frame, message: &Message, theme: &Theme) {
    let width = (message.text.width() as u16 + 6).max(30);
    let area = centered_rect(width, 7, f.area());
    f.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(message.text.as_str()),
        Line::from(""),
        Line::from(Span::styled("[ OK ]", theme.base.add_modifier(Modifier::REVERSED))),
    ];
    let widget = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(theme.block(message.kind.title()));
    f.render_widget(widget, area);
}

fn draw_invoice(f: &mut Frame, invoice: &InvoiceDto, theme: &Theme) {
    let height = invoice.lines.len() as u16 + 8;
    let area = centered_rect(64, height, f.area());
    f.render_widget(Clear, area);

    let block = theme.block("Rechnung");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(invoice.lines.len() as u16 + 2), // Table
            Constraint::Length(1),                              // Total
            Constraint::Length(1),
            Constraint::Length(1), // Close
            Constraint::Min(0),
        ])
        .split(inner);

    let rows: Vec<Row> = invoice
        .lines
        .iter()
        .map(|line| {
            Row::new(vec![
                Cell::from(line.category.clone()),
                Cell::from(line.period.clone()),
                Cell::from(Line::from(line.amount.clone()).alignment(Alignment::Right)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(18), // Art
            Constraint::Length(25), // Zeitraum
            Constraint::Length(12), // Betrag
        ],
    )
    .header(
        Row::new(vec![
            Cell::from("Art"),
            Cell::from("Zeitraum"),
            Cell::from(Line::from("Betrag in €").alignment(Alignment::Right)),
        ])
        .style(theme.accent)
        .bottom_margin(1),
    )
    .style(theme.base);
    f.render_widget(table, chunks[0]);

    let total = Paragraph::new(invoice.total_line())
        .style(theme.base.add_modifier(Modifier::BOLD))
        .alignment(Alignment::Right);
    f.render_widget(total, chunks[1]);

    let close = Paragraph::new(Span::styled("[ Schließen ]", theme.base.add_modifier(Modifier::REVERSED)))
        .alignment(Alignment::Center)
        .style(theme.base);
    f.render_widget(close, chunks[3]);
}

fn draw_calendar(f: &mut Frame, calendar: &CalendarState, today: NaiveDate, theme: &Theme) {
    let weeks = calendar.weeks();
    let area = centered_rect(28, weeks.len() as u16 + 6, f.area());
    f.render_widget(Clear, area);

    let mut lines = vec![
        Line::from(Span::styled(calendar.title(), theme.accent)),
        Line::from(WEEKDAY_HEADER.join(" ")),
    ];

    for week in &weeks {
        let mut spans = Vec::new();
        for (i, day) in week.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" "));
            }
            let Some(day) = day else {
                spans.push(Span::raw("  "));
                continue;
            };
            let date = NaiveDate::from_ymd_opt(calendar.selected.year(), calendar.selected.month(), *day);
            let mut style = theme.base;
            if date == Some(today) {
                style = style.add_modifier(Modifier::UNDERLINED);
            }
            if *day == calendar.selected.day() {
                style = style.add_modifier(Modifier::REVERSED | Modifier::BOLD);
            }
            spans.push(Span::styled(format!("{:>2}", day), style));
        }
        lines.push(Line::from(spans));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Enter: OK  Esc: Abbrechen", theme.muted)));

    let widget = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(theme.block("Datum wählen"));
    f.render_widget(widget, area);
}

fn draw_color_picker(f: &mut Frame, picker: &ColorPickerState, theme: &Theme) {
    let area = centered_rect(40, 10, f.area());
    f.render_widget(Clear, area);

    const BAR_WIDTH: usize = 16;
    let mut lines = vec![Line::from("")];
    for channel in Channel::ALL {
        let value = picker.value(channel);
        let filled = value as usize * BAR_WIDTH / 255;
        let marker = if channel == picker.channel { "▶ " } else { "  " };
        let style = if channel == picker.channel {
            theme.base.add_modifier(Modifier::BOLD)
        } else {
            theme.base
        };
        lines.push(Line::from(vec![
            Span::styled(marker, theme.accent),
            Span::styled(format!("{:<5}", channel.label()), style),
            Span::styled("█".repeat(filled), style),
            Span::styled("░".repeat(BAR_WIDTH - filled), theme.muted),
            Span::styled(format!(" {:>3}", value), style),
        ]));
    }

    let c = picker.color;
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("        ", Style::default().bg(Color::Rgb(c.r, c.g, c.b))),
        Span::styled(format!("  {}", c.to_hex()), theme.base),
    ]));

    let widget = Paragraph::new(lines)
        .style(Style::default().bg(theme.bg))
        .block(theme.block("Farbschema wählen"));
    f.render_widget(widget, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use booking_core::{BookingForm, Category, TextField};
    use ratatui::{backend::TestBackend, Terminal};

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    fn app() -> App {
        App::new(
            BookingForm::new(3, Rgb::default()),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        )
    }

    #[test]
    fn test_main_screen() {
        let screen = render(&app());
        assert!(screen.contains("Buchungsabrechnung"));
        assert!(screen.contains("Preis in Euro"));
        assert!(screen.contains("0,00"));
        assert!(screen.contains("Rechnung anzeigen"));
        assert!(screen.contains("Beenden"));
        assert!(screen.contains("Clear"));
    }

    #[test]
    fn test_invoice_modal() {
        let mut app = app();
        app.form.toggle(0).unwrap();
        app.form.set_category(0, Some(Category::FullBoard)).unwrap();
        app.form.set_text(0, TextField::StartDate, "01.03.2024").unwrap();
        app.form.set_text(0, TextField::EndDate, "05.03.2024").unwrap();
        app.form.set_text(0, TextField::Price, "99,5").unwrap();
        app.press(Button::Invoice);

        let screen = render(&app);
        assert!(screen.contains("Rechnung"));
        assert!(screen.contains("01.03.2024–05.03.2024"));
        assert!(screen.contains("Gesamtbetrag (Euro): 99,50"));
        assert!(screen.contains("Schließen"));
    }

    #[test]
    fn test_calendar_modal() {
        let mut app = app();
        app.mode = Mode::PickDate {
            row: 0,
            field: booking_core::DateField::Start,
            calendar: CalendarState::new(NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()),
        };
        let screen = render(&app);
        assert!(screen.contains("März 2024"));
        assert!(screen.contains("Mo Di Mi Do Fr Sa So"));
    }

    #[test]
    fn test_small_terminal_does_not_panic() {
        let mut terminal = Terminal::new(TestBackend::new(20, 5)).unwrap();
        let mut app = app();
        app.press(Button::Invoice);
        terminal.draw(|f| draw(f, &app)).unwrap();
    }
}
