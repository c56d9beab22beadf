//! Appointment booking form logic: the draft state machine behind the
//! scheduling page, independent of any UI toolkit.

pub mod calendar;
pub mod config;
mod controller;
pub mod directory;
pub mod draft;
pub mod lookup;
pub mod notify;
pub mod slots;
pub mod submission;

pub use calendar::{Clock, DateLocale, FixedClock, SystemClock};
pub use config::{load_settings, BookingSettings, SettingsError};
pub use controller::AppointmentController;
pub use directory::DoctorDirectory;
pub use draft::{BookingRequest, Draft, DraftDoctor};
pub use lookup::{CannedPatientLookup, PatientLookup};
pub use notify::{
    AppointmentMessage, MessageKind, Notifier, NotifyError, RecordingNotifier, TracingNotifier,
};
pub use submission::{
    AvailabilityCheck, ConfirmationToken, FixedAvailability, RandomAvailabilityCheck,
    RandomTokenIssuer, SubmissionOutcome, SubmissionPhase, TokenIssuer,
};
