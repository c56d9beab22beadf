//! Date entry rules and long-form date rendering.

use chrono::{Datelike, Local, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use shared::error::SchedulingError;

/// Source of "today", injectable so tests and the earliest pickable date are
/// deterministic.
pub trait Clock: Send {
    fn today(&self) -> NaiveDate;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DateLocale {
    #[default]
    #[serde(rename = "en-US")]
    EnUs,
    #[serde(rename = "pt-BR")]
    PtBr,
}

/// Accepts weekdays only. The check runs once, at entry.
pub fn validate_weekday(date: NaiveDate) -> Result<NaiveDate, SchedulingError> {
    match date.weekday() {
        weekday @ (Weekday::Sat | Weekday::Sun) => {
            Err(SchedulingError::WeekendDate { date, weekday })
        }
        _ => Ok(date),
    }
}

pub fn format_long_date(date: NaiveDate, locale: DateLocale) -> String {
    match locale {
        DateLocale::EnUs => date.format("%A, %B %-d, %Y").to_string(),
        DateLocale::PtBr => format!(
            "{}, {} de {} de {}",
            pt_br_weekday(date.weekday()),
            date.day(),
            PT_BR_MONTHS[date.month0() as usize],
            date.year()
        ),
    }
}

const PT_BR_MONTHS: [&str; 12] = [
    "janeiro",
    "fevereiro",
    "março",
    "abril",
    "maio",
    "junho",
    "julho",
    "agosto",
    "setembro",
    "outubro",
    "novembro",
    "dezembro",
];

fn pt_br_weekday(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "segunda-feira",
        Weekday::Tue => "terça-feira",
        Weekday::Wed => "quarta-feira",
        Weekday::Thu => "quinta-feira",
        Weekday::Fri => "sexta-feira",
        Weekday::Sat => "sábado",
        Weekday::Sun => "domingo",
    }
}
