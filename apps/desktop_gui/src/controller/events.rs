//! UI intents raised while rendering, and their translation to form inputs.

use chrono::NaiveDate;
use shared::{
    domain::{DoctorId, SlotTime, Specialty},
    protocol::FormInput,
};

pub const DATE_INPUT_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    PatientQueryEdited(String),
    SpecialtyPicked(Option<Specialty>),
    DoctorPicked(Option<DoctorId>),
    DateCommitted(String),
    SlotPressed(SlotTime),
    SubmitPressed,
    ReminderPressed,
    ConfirmationClosed,
    ClearPressed,
    NoticeAcknowledged,
}

/// What the app should do with an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    Forward(FormInput),
    /// Input rejected before reaching the form, with the message to show inline.
    InlineError(String),
    SendReminder,
    AcknowledgeNotice,
}

impl UiEvent {
    pub fn into_action(self, min_date: NaiveDate) -> UiAction {
        match self {
            Self::PatientQueryEdited(query) => {
                UiAction::Forward(FormInput::PatientQueryChanged { query })
            }
            Self::SpecialtyPicked(specialty) => {
                UiAction::Forward(FormInput::SpecialtyFiltered { specialty })
            }
            Self::DoctorPicked(doctor_id) => {
                UiAction::Forward(FormInput::DoctorSelected { doctor_id })
            }
            Self::DateCommitted(raw) => match parse_date_input(&raw, min_date) {
                Ok(date) => UiAction::Forward(FormInput::DateEntered { date }),
                Err(message) => UiAction::InlineError(message),
            },
            Self::SlotPressed(slot) => UiAction::Forward(FormInput::SlotClicked { slot }),
            Self::SubmitPressed => UiAction::Forward(FormInput::Submit),
            Self::ReminderPressed => UiAction::SendReminder,
            Self::ConfirmationClosed => UiAction::Forward(FormInput::DismissConfirmation),
            Self::ClearPressed => UiAction::Forward(FormInput::Clear),
            Self::NoticeAcknowledged => UiAction::AcknowledgeNotice,
        }
    }
}

/// Parses the date field. Empty text clears the date; dates before
/// `min_date` are refused the way a picker with a minimum would.
pub fn parse_date_input(raw: &str, min_date: NaiveDate) -> Result<Option<NaiveDate>, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let date = NaiveDate::parse_from_str(raw, DATE_INPUT_FORMAT)
        .map_err(|_| format!("'{raw}' is not a date; use YYYY-MM-DD"))?;
    if date < min_date {
        return Err(format!("Pick a date on or after {min_date}"));
    }
    Ok(Some(date))
}
