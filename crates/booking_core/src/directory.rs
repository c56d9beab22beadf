//! Doctor directory: selection list, specialty filter and per-doctor
//! occupied slots.

use shared::domain::{DoctorId, DoctorSummary, SlotTime, Specialty};

#[derive(Debug, Clone)]
pub struct DoctorEntry {
    pub summary: DoctorSummary,
    pub occupied: Vec<SlotTime>,
}

#[derive(Debug, Clone)]
pub struct DoctorDirectory {
    doctors: Vec<DoctorEntry>,
}

const BUILTIN_DOCTORS: &[(i64, &str, Specialty, &[(u8, u8)])] = &[
    (
        1,
        "Dr. João Oliveira - Cardiology",
        Specialty::Cardiology,
        &[(8, 30), (10, 30), (15, 30)],
    ),
    (
        2,
        "Dra. Maria Costa - Dermatology",
        Specialty::Dermatology,
        &[(9, 0), (11, 0), (16, 0)],
    ),
    (
        3,
        "Dr. Pedro Almeida - Orthopedics",
        Specialty::Orthopedics,
        &[(7, 30), (14, 0), (17, 0)],
    ),
    (
        4,
        "Dra. Ana Souza - Pediatrics",
        Specialty::Pediatrics,
        &[(8, 0), (10, 0), (15, 0)],
    ),
];

impl DoctorDirectory {
    pub fn new(doctors: Vec<DoctorEntry>) -> Self {
        Self { doctors }
    }

    /// The clinic's static roster and occupancy table.
    pub fn builtin() -> Self {
        let doctors = BUILTIN_DOCTORS
            .iter()
            .map(|(id, label, specialty, occupied)| DoctorEntry {
                summary: DoctorSummary {
                    doctor_id: DoctorId(*id),
                    label: (*label).to_string(),
                    specialty: *specialty,
                },
                occupied: occupied
                    .iter()
                    .filter_map(|(hour, minute)| SlotTime::new(*hour, *minute))
                    .collect(),
            })
            .collect();
        Self { doctors }
    }

    pub fn get(&self, doctor_id: DoctorId) -> Option<&DoctorEntry> {
        self.doctors
            .iter()
            .find(|entry| entry.summary.doctor_id == doctor_id)
    }

    /// Doctors matching `specialty`, or every doctor when no filter is set.
    pub fn filter(&self, specialty: Option<Specialty>) -> Vec<DoctorSummary> {
        self.doctors
            .iter()
            .filter(|entry| Self::matches(entry, specialty))
            .map(|entry| entry.summary.clone())
            .collect()
    }

    pub fn is_visible(&self, doctor_id: DoctorId, specialty: Option<Specialty>) -> bool {
        self.get(doctor_id)
            .is_some_and(|entry| Self::matches(entry, specialty))
    }

    /// Slots the doctor cannot take. Unknown doctors have none.
    pub fn occupied_slots(&self, doctor_id: DoctorId) -> &[SlotTime] {
        self.get(doctor_id)
            .map(|entry| entry.occupied.as_slice())
            .unwrap_or_default()
    }

    fn matches(entry: &DoctorEntry, specialty: Option<Specialty>) -> bool {
        specialty.map_or(true, |wanted| entry.summary.specialty == wanted)
    }
}
