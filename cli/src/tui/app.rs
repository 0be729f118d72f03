use booking_core::{
    BookingForm, Category, DateField, Field, InvoiceDto, InvoiceOutcome, TextField,
};
use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent};
use tracing::debug;

use crate::tui::picker::{CalendarState, ColorPickerState, PickerAction};

pub const NO_SELECTION_NOTICE: &str = "Es wurde keine Buchung ausgewählt.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Check,
    Category,
    StartDate,
    StartPicker,
    EndDate,
    EndPicker,
    Price,
}

impl Column {
    pub const ALL: [Column; 7] = [
        Column::Check,
        Column::Category,
        Column::StartDate,
        Column::StartPicker,
        Column::EndDate,
        Column::EndPicker,
        Column::Price,
    ];

    pub fn text_field(self) -> Option<TextField> {
        match self {
            Column::StartDate => Some(TextField::StartDate),
            Column::EndDate => Some(TextField::EndDate),
            Column::Price => Some(TextField::Price),
            _ => None,
        }
    }

    pub fn picker_field(self) -> Option<DateField> {
        match self {
            Column::StartPicker => Some(DateField::Start),
            Column::EndPicker => Some(DateField::End),
            _ => None,
        }
    }

    fn for_field(field: Field) -> Self {
        match field {
            Field::Category => Column::Category,
            Field::StartDate => Column::StartDate,
            Field::EndDate => Column::EndDate,
            Field::Price => Column::Price,
        }
    }

    fn position(self) -> usize {
        Column::ALL.iter().position(|c| *c == self).unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Clear,
    Invoice,
    Quit,
}

impl Button {
    pub const ALL: [Button; 3] = [Button::Clear, Button::Invoice, Button::Quit];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Cell { row: usize, column: Column },
    Button(Button),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Error,
    Info,
}

impl MessageKind {
    pub fn title(&self) -> &'static str {
        match self {
            MessageKind::Error => "Fehler",
            MessageKind::Info => "Hinweis",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub kind: MessageKind,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Normal,
    Editing { row: usize, field: TextField },
    Message(Message),
    Invoice(InvoiceDto),
    PickDate { row: usize, field: DateField, calendar: CalendarState },
    PickColor(ColorPickerState),
}

pub struct App {
    pub form: BookingForm,
    pub focus: Focus,
    pub mode: Mode,
    pub input: String,
    pub cursor_position: usize,
    pub should_quit: bool,
    pub today: NaiveDate,
}

impl App {
    pub fn new(form: BookingForm, today: NaiveDate) -> App {
        App {
            form,
            focus: Focus::Cell { row: 0, column: Column::Check },
            mode: Mode::Normal,
            input: String::new(),
            cursor_position: 0,
            should_quit: false,
            today,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match self.mode {
            Mode::Normal => self.handle_normal_key(key.code),
            Mode::Editing { .. } => self.handle_editing_key(key.code),
            Mode::Message(_) | Mode::Invoice(_) => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                    self.mode = Mode::Normal;
                }
            }
            Mode::PickDate { .. } => self.handle_date_key(key.code),
            Mode::PickColor(_) => self.handle_color_key(key.code),
        }
    }

    fn handle_normal_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Down | KeyCode::Char('j') => self.next_row(),
            KeyCode::Up | KeyCode::Char('k') => self.previous_row(),
            KeyCode::Right | KeyCode::Tab | KeyCode::Char('l') => self.next_column(),
            KeyCode::Left | KeyCode::BackTab | KeyCode::Char('h') => self.previous_column(),
            KeyCode::Enter | KeyCode::Char(' ') => self.activate(),
            KeyCode::Char('c') => self.press(Button::Clear),
            KeyCode::Char('r') => self.press(Button::Invoice),
            KeyCode::F(2) => self.open_color_picker(),
            KeyCode::Char(c @ '1'..='3') => self.choose_category(c),
            _ => {}
        }
    }

    // ── Navigation ──────────────────────────────────────────────────────────

    pub fn next_row(&mut self) {
        let last_row = self.form.rows().capacity() - 1;
        self.focus = match self.focus {
            Focus::Cell { row, column } if row < last_row => Focus::Cell { row: row + 1, column },
            Focus::Cell { .. } => Focus::Button(Button::Clear),
            Focus::Button(_) => Focus::Cell { row: 0, column: Column::Check },
        };
    }

    pub fn previous_row(&mut self) {
        let last_row = self.form.rows().capacity() - 1;
        self.focus = match self.focus {
            Focus::Cell { row: 0, .. } => Focus::Button(Button::Clear),
            Focus::Cell { row, column } => Focus::Cell { row: row - 1, column },
            Focus::Button(_) => Focus::Cell { row: last_row, column: Column::Check },
        };
    }

    pub fn next_column(&mut self) {
        self.focus = match self.focus {
            Focus::Cell { row, column } => {
                let next = (column.position() + 1) % Column::ALL.len();
                Focus::Cell { row, column: Column::ALL[next] }
            }
            Focus::Button(button) => {
                let index = Button::ALL.iter().position(|b| *b == button).unwrap_or(0);
                Focus::Button(Button::ALL[(index + 1) % Button::ALL.len()])
            }
        };
    }

    pub fn previous_column(&mut self) {
        self.focus = match self.focus {
            Focus::Cell { row, column } => {
                let len = Column::ALL.len();
                let prev = (column.position() + len - 1) % len;
                Focus::Cell { row, column: Column::ALL[prev] }
            }
            Focus::Button(button) => {
                let len = Button::ALL.len();
                let index = Button::ALL.iter().position(|b| *b == button).unwrap_or(0);
                Focus::Button(Button::ALL[(index + len - 1) % len])
            }
        };
    }

    // ── Actions ─────────────────────────────────────────────────────────────

    fn activate(&mut self) {
        match self.focus {
            Focus::Button(button) => self.press(button),
            Focus::Cell { row, column } => self.activate_cell(row, column),
        }
    }

    fn activate_cell(&mut self, row: usize, column: Column) {
        if column == Column::Check {
            // A disabled checkbox just ignores the press.
            if let Err(e) = self.form.toggle(row) {
                debug!(error = %e, "toggle ignored");
            }
            return;
        }
        if !self.form.rows().fields_enabled(row) {
            return;
        }

        if column == Column::Category {
            let current = self.form.rows().row(row).and_then(|r| r.category);
            if let Err(e) = self.form.set_category(row, Some(Category::cycle(current))) {
                debug!(error = %e, "category change ignored");
            }
        } else if let Some(field) = column.text_field() {
            self.enter_edit_mode(row, field);
        } else if let Some(field) = column.picker_field() {
            if let Ok(seed) = self.form.picker_seed(row, field, self.today) {
                self.mode = Mode::PickDate {
                    row,
                    field,
                    calendar: CalendarState::new(seed),
                };
            }
        }
    }

    fn choose_category(&mut self, key: char) {
        let Focus::Cell { row, column: Column::Category } = self.focus else {
            return;
        };
        let index = key as usize - '1' as usize;
        if let Some(category) = Category::ALL.get(index) {
            if let Err(e) = self.form.set_category(row, Some(*category)) {
                debug!(error = %e, "category change ignored");
            }
        }
    }

    pub fn press(&mut self, button: Button) {
        match button {
            Button::Clear => {
                self.form.clear_or_restore();
            }
            Button::Invoice => self.show_invoice(),
            Button::Quit => self.should_quit = true,
        }
    }

    fn show_invoice(&mut self) {
        self.mode = match self.form.show_invoice() {
            Ok(InvoiceOutcome::Ready(invoice)) => Mode::Invoice(InvoiceDto::from_invoice(&invoice)),
            Ok(InvoiceOutcome::NoSelection) => Mode::Message(Message {
                kind: MessageKind::Info,
                text: NO_SELECTION_NOTICE.to_string(),
            }),
            Err(e) => {
                self.focus = Focus::Cell {
                    row: e.row() - 1,
                    column: Column::for_field(e.field()),
                };
                Mode::Message(Message {
                    kind: MessageKind::Error,
                    text: e.to_string(),
                })
            }
        };
    }

    fn open_color_picker(&mut self) {
        self.mode = Mode::PickColor(ColorPickerState::new(self.form.background()));
    }

    // ── Modal pickers ───────────────────────────────────────────────────────

    fn handle_date_key(&mut self, code: KeyCode) {
        let Mode::PickDate { row, field, calendar } = &mut self.mode else {
            return;
        };
        let (row, field) = (*row, *field);
        let picked = match calendar.handle_key(code) {
            PickerAction::Pending => return,
            PickerAction::Confirm(date) => Some(date),
            PickerAction::Cancel => None,
        };
        if let Err(e) = self.form.apply_picked_date(row, field, picked) {
            debug!(error = %e, "picked date ignored");
        }
        self.mode = Mode::Normal;
    }

    fn handle_color_key(&mut self, code: KeyCode) {
        let Mode::PickColor(picker) = &mut self.mode else {
            return;
        };
        match picker.handle_key(code) {
            PickerAction::Pending => return,
            PickerAction::Confirm(color) => self.form.set_background(color),
            PickerAction::Cancel => {}
        }
        self.mode = Mode::Normal;
    }

    // ── Text editing ────────────────────────────────────────────────────────

    fn handle_editing_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Enter => self.submit_edit(),
            KeyCode::Esc => self.exit_input_mode(),
            KeyCode::Char(c) => self.input_char(c),
            KeyCode::Backspace => self.delete_char(),
            KeyCode::Left => self.move_cursor_left(),
            KeyCode::Right => self.move_cursor_right(),
            KeyCode::Home => self.cursor_position = 0,
            KeyCode::End => self.cursor_position = self.input.chars().count(),
            _ => {}
        }
    }

    fn enter_edit_mode(&mut self, row: usize, field: TextField) {
        self.input = self.form.rows().text(row, field).unwrap_or_default().to_string();
        self.cursor_position = self.input.chars().count();
        self.mode = Mode::Editing { row, field };
    }

    pub fn exit_input_mode(&mut self) {
        self.mode = Mode::Normal;
        self.input.clear();
        self.cursor_position = 0;
    }

    fn submit_edit(&mut self) {
        if let Mode::Editing { row, field } = self.mode {
            if let Err(e) = self.form.set_text(row, field, self.input.clone()) {
                debug!(error = %e, "edit ignored");
            }
        }
        self.exit_input_mode();
    }

    pub fn input_char(&mut self, c: char) {
        let byte_index = self.byte_index(self.cursor_position);
        self.input.insert(byte_index, c);
        self.cursor_position += 1;
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position > 0 {
            let byte_index = self.byte_index(self.cursor_position - 1);
            self.input.remove(byte_index);
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.input.chars().count() {
            self.cursor_position += 1;
        }
    }

    /// Text before the cursor, for placing the terminal cursor.
    pub fn input_before_cursor(&self) -> &str {
        &self.input[..self.byte_index(self.cursor_position)]
    }

    fn byte_index(&self, chars: usize) -> usize {
        self.input.chars().take(chars).map(|c| c.len_utf8()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use booking_core::Rgb;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    fn app() -> App {
        App::new(BookingForm::new(3, Rgb::default()), today())
    }

    fn press_all(app: &mut App, codes: &[KeyCode]) {
        for code in codes {
            app.handle_key(key(*code));
        }
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_checkbox_toggles_row() {
        let mut app = app();
        app.handle_key(key(KeyCode::Enter));
        assert!(app.form.rows().fields_enabled(0));

        app.handle_key(key(KeyCode::Char(' ')));
        assert!(!app.form.rows().fields_enabled(0));
    }

    #[test]
    fn test_disabled_checkbox_is_ignored() {
        let mut app = app();
        press_all(&mut app, &[KeyCode::Down, KeyCode::Down, KeyCode::Enter]);
        assert_eq!(app.focus, Focus::Cell { row: 2, column: Column::Check });
        assert_eq!(app.form.rows().active_len(), 0);
        assert_eq!(app.mode, Mode::Normal);
    }

    #[test]
    fn test_edit_price() {
        let mut app = app();
        app.handle_key(key(KeyCode::Enter));
        app.focus = Focus::Cell { row: 0, column: Column::Price };

        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.mode, Mode::Editing { row: 0, field: TextField::Price });
        assert_eq!(app.input, "0,00");

        press_all(&mut app, &[KeyCode::Backspace; 4]);
        type_text(&mut app, "12,5");
        app.handle_key(key(KeyCode::Enter));

        assert_eq!(app.mode, Mode::Normal);
        assert_eq!(app.form.rows().text(0, TextField::Price), Some("12,5"));
    }

    #[test]
    fn test_escape_discards_edit() {
        let mut app = app();
        app.handle_key(key(KeyCode::Enter));
        app.focus = Focus::Cell { row: 0, column: Column::StartDate };
        app.handle_key(key(KeyCode::Enter));
        type_text(&mut app, "01.01.2024");
        app.handle_key(key(KeyCode::Esc));

        assert_eq!(app.form.rows().text(0, TextField::StartDate), Some(""));
    }

    #[test]
    fn test_cursor_editing_with_umlauts() {
        let mut app = app();
        app.mode = Mode::Editing { row: 0, field: TextField::Price };
        type_text(&mut app, "äb");
        app.handle_key(key(KeyCode::Left));
        app.handle_key(key(KeyCode::Char('x')));
        assert_eq!(app.input, "äxb");
        assert_eq!(app.input_before_cursor(), "äx");
        app.handle_key(key(KeyCode::Home));
        app.handle_key(key(KeyCode::Backspace));
        assert_eq!(app.input, "äxb");
    }

    #[test]
    fn test_inactive_fields_cannot_be_edited() {
        let mut app = app();
        app.focus = Focus::Cell { row: 0, column: Column::Price };
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.mode, Mode::Normal);

        app.focus = Focus::Cell { row: 0, column: Column::StartPicker };
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.mode, Mode::Normal);
    }

    #[test]
    fn test_category_selector() {
        let mut app = app();
        app.handle_key(key(KeyCode::Enter));
        app.handle_key(key(KeyCode::Right));
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.form.rows().row(0).unwrap().category, Some(Category::FullBoard));
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.form.rows().row(0).unwrap().category, Some(Category::HalfBoard));
        app.handle_key(key(KeyCode::Char('3')));
        assert_eq!(app.form.rows().row(0).unwrap().category, Some(Category::Special));
    }

    #[test]
    fn test_category_key_on_inactive_row_is_ignored() {
        let mut app = app();
        app.focus = Focus::Cell { row: 0, column: Column::Category };
        app.handle_key(key(KeyCode::Char('2')));

        assert_eq!(app.form.rows().row(0).unwrap().category, None);
        assert_eq!(app.mode, Mode::Normal);
    }

    #[test]
    fn test_negative_price_message() {
        let mut app = app();
        app.handle_key(key(KeyCode::Enter));
        app.form.set_category(0, Some(Category::HalfBoard)).unwrap();
        app.form.set_text(0, TextField::StartDate, "01.03.2024").unwrap();
        app.form.set_text(0, TextField::EndDate, "02.03.2024").unwrap();
        app.form.set_text(0, TextField::Price, "-5").unwrap();

        app.press(Button::Invoice);

        match &app.mode {
            Mode::Message(message) => {
                assert_eq!(message.text, "Preis muss mindestens 0,00 sein (Zeile 1).");
            }
            other => panic!("unexpected mode {:?}", other),
        }
        assert_eq!(app.focus, Focus::Cell { row: 0, column: Column::Price });
    }

    #[test]
    fn test_invoice_without_rows_is_a_notice() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('r')));
        assert_eq!(
            app.mode,
            Mode::Message(Message {
                kind: MessageKind::Info,
                text: NO_SELECTION_NOTICE.to_string(),
            })
        );
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.mode, Mode::Normal);
    }

    #[test]
    fn test_validation_error_focuses_field() {
        let mut app = app();
        app.handle_key(key(KeyCode::Enter));
        app.form.set_category(0, Some(Category::FullBoard)).unwrap();

        app.handle_key(key(KeyCode::Char('r')));

        match &app.mode {
            Mode::Message(message) => {
                assert_eq!(message.kind, MessageKind::Error);
                assert_eq!(message.text, "Ungültiges Startdatum in Zeile 1.");
            }
            other => panic!("unexpected mode {:?}", other),
        }
        assert_eq!(app.focus, Focus::Cell { row: 0, column: Column::StartDate });
    }

    #[test]
    fn test_invoice_modal() {
        let mut app = app();
        app.handle_key(key(KeyCode::Enter));
        app.form.set_category(0, Some(Category::FullBoard)).unwrap();
        app.form.set_text(0, TextField::StartDate, "01.03.2024").unwrap();
        app.form.set_text(0, TextField::EndDate, "05.03.2024").unwrap();
        app.form.set_text(0, TextField::Price, "99,5").unwrap();

        app.press(Button::Invoice);

        match &app.mode {
            Mode::Invoice(dto) => {
                assert_eq!(dto.lines[0].period, "01.03.2024–05.03.2024");
                assert_eq!(dto.total, "99,50");
            }
            other => panic!("unexpected mode {:?}", other),
        }
        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.mode, Mode::Normal);
    }

    #[test]
    fn test_date_picker_writes_field() {
        let mut app = app();
        app.handle_key(key(KeyCode::Enter));
        app.focus = Focus::Cell { row: 0, column: Column::EndPicker };

        app.handle_key(key(KeyCode::Enter));
        assert!(matches!(app.mode, Mode::PickDate { row: 0, field: DateField::End, .. }));

        // While the picker is open, keys never reach the form.
        press_all(&mut app, &[KeyCode::Right, KeyCode::Char('q'), KeyCode::Enter]);

        assert_eq!(app.mode, Mode::Normal);
        assert!(!app.should_quit);
        assert_eq!(app.form.rows().text(0, TextField::EndDate), Some("17.10.2026"));
    }

    #[test]
    fn test_date_picker_cancel_keeps_text() {
        let mut app = app();
        app.handle_key(key(KeyCode::Enter));
        app.form.set_text(0, TextField::StartDate, "kaputt").unwrap();
        app.focus = Focus::Cell { row: 0, column: Column::StartPicker };

        press_all(&mut app, &[KeyCode::Enter, KeyCode::Left, KeyCode::Esc]);

        assert_eq!(app.form.rows().text(0, TextField::StartDate), Some("kaputt"));
    }

    #[test]
    fn test_color_picker_applies_background() {
        let mut app = App::new(BookingForm::new(3, Rgb::new(0, 0, 0)), today());
        press_all(&mut app, &[KeyCode::F(2), KeyCode::Up, KeyCode::Up, KeyCode::Enter]);
        assert_eq!(app.form.background(), Rgb::new(2, 0, 0));

        press_all(&mut app, &[KeyCode::F(2), KeyCode::Up, KeyCode::Esc]);
        assert_eq!(app.form.background(), Rgb::new(2, 0, 0));
    }

    #[test]
    fn test_clear_and_back() {
        let mut app = app();
        app.handle_key(key(KeyCode::Enter));
        app.handle_key(key(KeyCode::Char('c')));
        assert_eq!(app.form.clear_button_label(), "Zurück");
        assert_eq!(app.form.rows().active_len(), 0);

        app.handle_key(key(KeyCode::Char('c')));
        assert_eq!(app.form.clear_button_label(), "Clear");
        assert_eq!(app.form.rows().active_len(), 1);
    }

    #[test]
    fn test_focus_wraps_through_buttons() {
        let mut app = app();
        press_all(&mut app, &[KeyCode::Down, KeyCode::Down, KeyCode::Down]);
        assert_eq!(app.focus, Focus::Button(Button::Clear));
        press_all(&mut app, &[KeyCode::Right, KeyCode::Right]);
        assert_eq!(app.focus, Focus::Button(Button::Quit));
        app.handle_key(key(KeyCode::Enter));
        assert!(app.should_quit);
    }

    #[test]
    fn test_quit_key() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('q')));
        assert!(app.should_quit);
    }
}
