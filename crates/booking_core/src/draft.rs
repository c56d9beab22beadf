//! The in-progress appointment record and its derived projections.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::{
    domain::{DoctorId, DraftField, PatientRecord, SlotTime},
    error::SchedulingError,
    protocol::AppointmentSummary,
};

use crate::calendar::{format_long_date, DateLocale};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftDoctor {
    pub doctor_id: DoctorId,
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    pub patient: Option<PatientRecord>,
    pub doctor: Option<DraftDoctor>,
    pub date: Option<NaiveDate>,
    pub slot: Option<SlotTime>,
}

/// A draft with every field set, as handed to the final availability check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub patient: PatientRecord,
    pub doctor: DraftDoctor,
    pub date: NaiveDate,
    pub slot: SlotTime,
}

impl Draft {
    pub fn missing_fields(&self) -> Vec<DraftField> {
        let mut missing = Vec::new();
        if self.patient.is_none() {
            missing.push(DraftField::Patient);
        }
        if self.doctor.is_none() {
            missing.push(DraftField::Doctor);
        }
        if self.date.is_none() {
            missing.push(DraftField::Date);
        }
        if self.slot.is_none() {
            missing.push(DraftField::Slot);
        }
        missing
    }

    pub fn is_complete(&self) -> bool {
        self.patient.is_some() && self.doctor.is_some() && self.date.is_some() && self.slot.is_some()
    }

    pub fn to_request(&self) -> Result<BookingRequest, SchedulingError> {
        match (&self.patient, &self.doctor, self.date, self.slot) {
            (Some(patient), Some(doctor), Some(date), Some(slot)) => Ok(BookingRequest {
                patient: patient.clone(),
                doctor: doctor.clone(),
                date,
                slot,
            }),
            _ => Err(SchedulingError::DraftIncomplete {
                missing: self.missing_fields(),
            }),
        }
    }

    /// Human-readable projection; `None` whenever the draft is incomplete.
    pub fn summary(&self, locale: DateLocale) -> Option<AppointmentSummary> {
        self.to_request()
            .ok()
            .map(|request| request.summary(locale))
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

impl BookingRequest {
    pub fn summary(&self, locale: DateLocale) -> AppointmentSummary {
        AppointmentSummary {
            patient_name: self.patient.name.clone(),
            doctor_label: self.doctor.label.clone(),
            date_long: format_long_date(self.date, locale),
            slot_label: self.slot.label(),
        }
    }
}
