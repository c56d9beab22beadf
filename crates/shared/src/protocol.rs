use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{DoctorId, DoctorSummary, PatientRecord, SlotState, SlotTime, Specialty};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum FormInput {
    PatientQueryChanged {
        query: String,
    },
    SpecialtyFiltered {
        #[serde(default)]
        specialty: Option<Specialty>,
    },
    DoctorSelected {
        #[serde(default)]
        doctor_id: Option<DoctorId>,
    },
    DateEntered {
        #[serde(default)]
        date: Option<NaiveDate>,
    },
    SlotClicked {
        slot: SlotTime,
    },
    Submit,
    SendReminder,
    DismissConfirmation,
    Clear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotView {
    pub slot: SlotTime,
    pub state: SlotState,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentSummary {
    pub patient_name: String,
    pub doctor_label: String,
    pub date_long: String,
    pub slot_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmationView {
    pub token: String,
    pub summary: AppointmentSummary,
}

/// Everything the presentation layer renders, derived from the draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormView {
    pub patient_query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient: Option<PatientRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialty_filter: Option<Specialty>,
    pub doctor_options: Vec<DoctorSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_doctor: Option<DoctorId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    pub min_date: NaiveDate,
    pub slots: Vec<SlotView>,
    pub submit_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<AppointmentSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmation: Option<ConfirmationView>,
}

impl FormView {
    pub fn patient_found(&self) -> bool {
        self.patient.is_some()
    }

    pub fn selected_slot(&self) -> Option<SlotTime> {
        self.slots
            .iter()
            .find(|view| view.state == SlotState::Selected)
            .map(|view| view.slot)
    }

    pub fn slots_in_state(&self, state: SlotState) -> Vec<SlotTime> {
        self.slots
            .iter()
            .filter(|view| view.state == state)
            .map(|view| view.slot)
            .collect()
    }
}
