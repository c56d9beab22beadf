//! Appointment draft controller: applies form inputs to the draft and derives
//! the view the presentation layer renders.

use chrono::NaiveDate;
use shared::{
    domain::{DoctorId, SlotTime, Specialty},
    error::{Notice, SchedulingError},
    protocol::{ConfirmationView, FormInput, FormView},
};
use tracing::{debug, info, warn};

use crate::{
    calendar::{validate_weekday, Clock, DateLocale, SystemClock},
    config::{BookingSettings, SettingsError},
    directory::DoctorDirectory,
    draft::{Draft, DraftDoctor},
    lookup::{CannedPatientLookup, PatientLookup},
    notify::{AppointmentMessage, Notifier, TracingNotifier},
    slots::SlotBoard,
    submission::{
        AvailabilityCheck, RandomAvailabilityCheck, RandomTokenIssuer, Submission,
        SubmissionOutcome, SubmissionPhase, TokenIssuer,
    },
};

pub struct AppointmentController {
    locale: DateLocale,
    directory: DoctorDirectory,
    board: SlotBoard,
    draft: Draft,
    patient_query: String,
    specialty_filter: Option<Specialty>,
    lookup: Box<dyn PatientLookup>,
    submission: Submission,
    notifier: Box<dyn Notifier>,
    clock: Box<dyn Clock>,
}

impl AppointmentController {
    /// Controller with the simulated collaborators described by `settings`.
    /// Settings that fail validation are refused.
    pub fn new(settings: &BookingSettings) -> Result<Self, SettingsError> {
        settings.validate()?;
        Ok(Self {
            locale: settings.locale,
            directory: DoctorDirectory::builtin(),
            board: SlotBoard::standard(&settings.closed_slots),
            draft: Draft::default(),
            patient_query: String::new(),
            specialty_filter: None,
            lookup: Box::new(CannedPatientLookup::new(settings.min_query_len)),
            submission: Submission::new(
                Box::new(RandomAvailabilityCheck::new(
                    settings.success_probability,
                    settings.rng_seed,
                )?),
                Box::new(RandomTokenIssuer::new(
                    settings.token_prefix.clone(),
                    settings.rng_seed,
                )),
            ),
            notifier: Box::new(TracingNotifier::new(settings.locale)),
            clock: Box::new(SystemClock),
        })
    }

    pub fn with_directory(mut self, directory: DoctorDirectory) -> Self {
        self.directory = directory;
        self
    }

    pub fn with_patient_lookup(mut self, lookup: impl PatientLookup + 'static) -> Self {
        self.lookup = Box::new(lookup);
        self
    }

    pub fn with_availability_check(mut self, check: impl AvailabilityCheck + 'static) -> Self {
        self.submission.set_availability_check(Box::new(check));
        self
    }

    pub fn with_token_issuer(mut self, issuer: impl TokenIssuer + 'static) -> Self {
        self.submission.set_token_issuer(Box::new(issuer));
        self
    }

    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Box::new(notifier);
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn phase(&self) -> &SubmissionPhase {
        self.submission.phase()
    }

    pub fn is_complete(&self) -> bool {
        self.draft.is_complete()
    }

    /// Dispatches one input. Returns the blocking notice to show, if any.
    /// Misuse the form itself prevents (clicking an occupied slot, submitting
    /// an incomplete draft) is logged and dropped.
    pub fn apply(&mut self, input: FormInput) -> Option<Notice> {
        debug!(?input, "applying form input");
        let result = match input {
            FormInput::PatientQueryChanged { query } => self.set_patient_query(query),
            FormInput::SpecialtyFiltered { specialty } => self.filter_specialty(specialty),
            FormInput::DoctorSelected { doctor_id } => self.select_doctor(doctor_id),
            FormInput::DateEntered { date } => self.enter_date(date),
            FormInput::SlotClicked { slot } => self.select_slot(slot),
            FormInput::Submit => self.submit().and_then(|outcome| match outcome {
                SubmissionOutcome::Confirmed(_) => Ok(()),
                SubmissionOutcome::Rejected { slot } => {
                    Err(SchedulingError::SlotUnavailable { slot })
                }
            }),
            FormInput::SendReminder => self.send_reminder().map(|_| ()),
            FormInput::DismissConfirmation => self.dismiss_confirmation(),
            FormInput::Clear => {
                self.clear();
                Ok(())
            }
        };

        match result {
            Ok(()) => None,
            Err(err) => {
                let notice = err.notice();
                if notice.is_none() {
                    warn!(error = %err, "ignored form input");
                }
                notice
            }
        }
    }

    pub fn set_patient_query(&mut self, query: impl Into<String>) -> Result<(), SchedulingError> {
        self.ensure_editable()?;
        self.patient_query = query.into();
        self.draft.patient = match self.lookup.lookup(&self.patient_query) {
            Ok(patient) => patient,
            Err(err) => {
                warn!(error = %err, "patient lookup failed");
                None
            }
        };
        debug!(found = self.draft.patient.is_some(), "patient lookup resolved");
        Ok(())
    }

    /// Narrows the doctor list. A selected doctor hidden by the new filter is
    /// deselected and slot availability recomputed.
    pub fn filter_specialty(&mut self, specialty: Option<Specialty>) -> Result<(), SchedulingError> {
        self.ensure_editable()?;
        self.specialty_filter = specialty;
        let hidden = self.draft.doctor.as_ref().is_some_and(|doctor| {
            !self.directory.is_visible(doctor.doctor_id, specialty)
        });
        if hidden {
            debug!(?specialty, "selected doctor filtered out");
            self.set_doctor(None);
        }
        Ok(())
    }

    pub fn select_doctor(&mut self, doctor_id: Option<DoctorId>) -> Result<(), SchedulingError> {
        self.ensure_editable()?;
        if let Some(doctor_id) = doctor_id {
            if self.directory.get(doctor_id).is_none() {
                return Err(SchedulingError::UnknownDoctor(doctor_id));
            }
            if !self.directory.is_visible(doctor_id, self.specialty_filter) {
                return Err(SchedulingError::DoctorHidden(doctor_id));
            }
        }
        self.set_doctor(doctor_id);
        Ok(())
    }

    /// Stores a weekday, rejects a weekend. Any entry drops the current slot
    /// selection first.
    pub fn enter_date(&mut self, date: Option<NaiveDate>) -> Result<(), SchedulingError> {
        self.ensure_editable()?;
        if let Some(previous) = self.board.clear_selection() {
            debug!(slot = %previous, "date changed, slot selection cleared");
        }
        self.draft.slot = None;
        self.draft.date = None;

        let Some(date) = date else {
            return Ok(());
        };
        match validate_weekday(date) {
            Ok(date) => {
                self.draft.date = Some(date);
                Ok(())
            }
            Err(err) => {
                warn!(%date, "weekend date rejected");
                Err(err)
            }
        }
    }

    pub fn select_slot(&mut self, slot: SlotTime) -> Result<(), SchedulingError> {
        self.ensure_editable()?;
        let previous = self.board.select(slot)?;
        self.draft.slot = Some(slot);
        debug!(%slot, previous = ?previous, "slot selected");
        Ok(())
    }

    /// Runs the submission. A confirmed booking is announced through the
    /// notifier; a failed delivery is logged and the booking stands.
    pub fn submit(&mut self) -> Result<SubmissionOutcome, SchedulingError> {
        let request = self.draft.to_request()?;
        let today = self.clock.today();
        let outcome = self.submission.submit(request.clone(), today)?;
        if let SubmissionOutcome::Confirmed(token) = &outcome {
            let message = AppointmentMessage::confirmation(token.clone(), request, today);
            if let Err(err) = self.notifier.deliver(&message) {
                warn!(%token, error = %err, "confirmation message not delivered");
            }
        }
        Ok(outcome)
    }

    /// Sends a reminder for the booking the open confirmation holds.
    pub fn send_reminder(&mut self) -> Result<AppointmentMessage, SchedulingError> {
        let SubmissionPhase::Confirmed { token, request } = self.submission.phase() else {
            return Err(SchedulingError::NoConfirmedAppointment);
        };
        let message =
            AppointmentMessage::reminder(token.clone(), request.clone(), self.clock.today());
        self.notifier
            .deliver(&message)
            .map_err(|err| SchedulingError::Notification(err.to_string()))?;
        info!(token = %message.token, "reminder sent");
        Ok(message)
    }

    /// Closes the confirmation and tears the whole form down.
    pub fn dismiss_confirmation(&mut self) -> Result<(), SchedulingError> {
        let (token, _) = self.submission.dismiss()?;
        info!(%token, "confirmation dismissed");
        self.clear();
        Ok(())
    }

    pub fn clear(&mut self) {
        self.draft.clear();
        self.patient_query.clear();
        self.specialty_filter = None;
        self.board.reset();
        self.submission.reset();
        debug!("form cleared");
    }

    pub fn view(&self) -> FormView {
        let confirmation = match self.submission.phase() {
            SubmissionPhase::Confirmed { token, request } => Some(ConfirmationView {
                token: token.to_string(),
                summary: request.summary(self.locale),
            }),
            _ => None,
        };

        FormView {
            patient_query: self.patient_query.clone(),
            patient: self.draft.patient.clone(),
            specialty_filter: self.specialty_filter,
            doctor_options: self.directory.filter(self.specialty_filter),
            selected_doctor: self.draft.doctor.as_ref().map(|doctor| doctor.doctor_id),
            date: self.draft.date,
            min_date: self.clock.today(),
            slots: self.board.views(),
            submit_enabled: self.draft.is_complete() && self.submission.is_idle(),
            summary: self.draft.summary(self.locale),
            confirmation,
        }
    }

    fn ensure_editable(&self) -> Result<(), SchedulingError> {
        match self.submission.phase() {
            SubmissionPhase::Idle => Ok(()),
            SubmissionPhase::Confirming => Err(SchedulingError::SubmissionInFlight),
            SubmissionPhase::Confirmed { .. } => Err(SchedulingError::AlreadyConfirmed),
        }
    }

    fn set_doctor(&mut self, doctor_id: Option<DoctorId>) {
        self.draft.doctor = doctor_id
            .and_then(|doctor_id| self.directory.get(doctor_id))
            .map(|entry| DraftDoctor {
                doctor_id: entry.summary.doctor_id,
                label: entry.summary.label.clone(),
            });

        let occupied = doctor_id
            .map(|doctor_id| self.directory.occupied_slots(doctor_id))
            .unwrap_or_default();
        let kept = self.board.apply_availability(occupied);
        if self.draft.slot.is_some() && kept.is_none() {
            debug!(?doctor_id, "slot selection no longer valid for doctor");
        }
        self.draft.slot = kept;
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
