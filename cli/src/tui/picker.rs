use booking_core::Rgb;
use chrono::{Datelike, Duration, NaiveDate};
use crossterm::event::KeyCode;

/// Result of feeding one key to a modal picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerAction<T> {
    Pending,
    Confirm(T),
    Cancel,
}

// ── Calendar ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarState {
    pub selected: NaiveDate,
}

impl CalendarState {
    pub fn new(initial: NaiveDate) -> Self {
        Self { selected: initial }
    }

    pub fn handle_key(&mut self, code: KeyCode) -> PickerAction<NaiveDate> {
        match code {
            KeyCode::Left | KeyCode::Char('h') => self.move_days(-1),
            KeyCode::Right | KeyCode::Char('l') => self.move_days(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_days(-7),
            KeyCode::Down | KeyCode::Char('j') => self.move_days(7),
            KeyCode::PageUp | KeyCode::Char('p') => self.move_months(-1),
            KeyCode::PageDown | KeyCode::Char('n') => self.move_months(1),
            KeyCode::Enter => return PickerAction::Confirm(self.selected),
            KeyCode::Esc => return PickerAction::Cancel,
            _ => {}
        }
        PickerAction::Pending
    }

    pub fn move_days(&mut self, days: i64) {
        if let Some(date) = self.selected.checked_add_signed(Duration::days(days)) {
            self.selected = date;
        }
    }

    pub fn move_months(&mut self, months: i32) {
        self.selected = add_months(self.selected, months);
    }

    pub fn title(&self) -> String {
        format!("{} {}", month_name(self.selected.month()), self.selected.year())
    }

    /// Weeks of the selected month, Monday first. `None` pads days outside the month.
    pub fn weeks(&self) -> Vec<[Option<u32>; 7]> {
        let year = self.selected.year();
        let month = self.selected.month();
        let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
            return Vec::new();
        };
        let offset = first.weekday().num_days_from_monday() as usize;
        let days = days_in_month(year, month);

        let mut weeks = Vec::new();
        let mut week = [None; 7];
        let mut col = offset;
        for day in 1..=days {
            week[col] = Some(day);
            col += 1;
            if col == 7 {
                weeks.push(week);
                week = [None; 7];
                col = 0;
            }
        }
        if col > 0 {
            weeks.push(week);
        }
        weeks
    }
}

pub const WEEKDAY_HEADER: [&str; 7] = ["Mo", "Di", "Mi", "Do", "Fr", "Sa", "So"];

pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "Januar",
        2 => "Februar",
        3 => "März",
        4 => "April",
        5 => "Mai",
        6 => "Juni",
        7 => "Juli",
        8 => "August",
        9 => "September",
        10 => "Oktober",
        11 => "November",
        12 => "Dezember",
        _ => "",
    }
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    match (
        NaiveDate::from_ymd_opt(next_year, next_month, 1),
        NaiveDate::from_ymd_opt(year, month, 1),
    ) {
        (Some(next), Some(first)) => next.signed_duration_since(first).num_days() as u32,
        _ => 31,
    }
}

/// Shifts by whole months, clamping the day to the target month's length.
pub fn add_months(date: NaiveDate, months: i32) -> NaiveDate {
    let total = date.month0() as i32 + months;
    let year = date.year() + total.div_euclid(12);
    let month = total.rem_euclid(12) as u32 + 1;
    let day = date.day().min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(date)
}

// ── Colour ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Red, Channel::Green, Channel::Blue];

    pub fn label(&self) -> &'static str {
        match self {
            Channel::Red => "Rot",
            Channel::Green => "Grün",
            Channel::Blue => "Blau",
        }
    }

    fn next(self) -> Self {
        match self {
            Channel::Red => Channel::Green,
            Channel::Green => Channel::Blue,
            Channel::Blue => Channel::Red,
        }
    }

    fn previous(self) -> Self {
        match self {
            Channel::Red => Channel::Blue,
            Channel::Green => Channel::Red,
            Channel::Blue => Channel::Green,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorPickerState {
    pub color: Rgb,
    pub channel: Channel,
}

impl ColorPickerState {
    pub fn new(initial: Rgb) -> Self {
        Self {
            color: initial,
            channel: Channel::Red,
        }
    }

    pub fn handle_key(&mut self, code: KeyCode) -> PickerAction<Rgb> {
        match code {
            KeyCode::Left | KeyCode::BackTab | KeyCode::Char('h') => self.channel = self.channel.previous(),
            KeyCode::Right | KeyCode::Tab | KeyCode::Char('l') => self.channel = self.channel.next(),
            KeyCode::Up | KeyCode::Char('+') | KeyCode::Char('k') => self.adjust(1),
            KeyCode::Down | KeyCode::Char('-') | KeyCode::Char('j') => self.adjust(-1),
            KeyCode::PageUp => self.adjust(16),
            KeyCode::PageDown => self.adjust(-16),
            KeyCode::Enter => return PickerAction::Confirm(self.color),
            KeyCode::Esc => return PickerAction::Cancel,
            _ => {}
        }
        PickerAction::Pending
    }

    pub fn value(&self, channel: Channel) -> u8 {
        match channel {
            Channel::Red => self.color.r,
            Channel::Green => self.color.g,
            Channel::Blue => self.color.b,
        }
    }

    fn adjust(&mut self, delta: i16) {
        let value = (self.value(self.channel) as i16 + delta).clamp(0, 255) as u8;
        match self.channel {
            Channel::Red => self.color.r = value,
            Channel::Green => self.color.g = value,
            Channel::Blue => self.color.b = value,
        }
    }
}
