use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{DoctorId, DraftField, SlotTime};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeCode {
    WeekendDate,
    SlotUnavailable,
}

/// Blocking, alert-style message for the person filling the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub code: NoticeCode,
    pub message: String,
}

impl Notice {
    pub fn new(code: NoticeCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulingError {
    #[error("the clinic is closed on weekends ({date} is a {weekday})")]
    WeekendDate { date: NaiveDate, weekday: Weekday },
    #[error("slot {slot} is no longer available")]
    SlotUnavailable { slot: SlotTime },
    #[error("slot {slot} is occupied")]
    SlotOccupied { slot: SlotTime },
    #[error("slot {0} is not part of the schedule")]
    UnknownSlot(SlotTime),
    #[error("unknown doctor {}", .0 .0)]
    UnknownDoctor(DoctorId),
    #[error("doctor {} is hidden by the specialty filter", .0 .0)]
    DoctorHidden(DoctorId),
    #[error("draft is incomplete; missing {}", join_fields(.missing))]
    DraftIncomplete { missing: Vec<DraftField> },
    #[error("a submission is already in flight")]
    SubmissionInFlight,
    #[error("appointment already confirmed; dismiss the confirmation first")]
    AlreadyConfirmed,
    #[error("there is no confirmation to dismiss")]
    NothingToDismiss,
    #[error("no confirmed appointment to send a reminder for")]
    NoConfirmedAppointment,
    #[error("notification not delivered: {0}")]
    Notification(String),
    #[error("invalid slot time '{0}', expected HH:MM")]
    InvalidSlotTime(String),
    #[error("unknown specialty '{0}'")]
    UnknownSpecialty(String),
    #[error("no patient matches '{query}'")]
    PatientNotFound { query: String },
    #[error("'{query}' matches {matches} patients")]
    AmbiguousPatient { query: String, matches: usize },
    #[error("transport failure: {0}")]
    Transport(String),
}

impl SchedulingError {
    /// Returns the alert shown to the user, if this failure is user-facing.
    pub fn notice(&self) -> Option<Notice> {
        match self {
            Self::WeekendDate { .. } => Some(Notice::new(
                NoticeCode::WeekendDate,
                "The clinic does not open on weekends. Please choose a date between Monday and Friday.",
            )),
            Self::SlotUnavailable { slot } => Some(Notice::new(
                NoticeCode::SlotUnavailable,
                format!("Sorry, the {slot} slot is no longer available. Please choose another time."),
            )),
            _ => None,
        }
    }
}

fn join_fields(fields: &[DraftField]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
