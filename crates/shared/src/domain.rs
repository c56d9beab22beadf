use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::SchedulingError;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);
    };
}

id_newtype!(DoctorId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Specialty {
    Cardiology,
    Dermatology,
    Orthopedics,
    Pediatrics,
}

impl Specialty {
    pub const ALL: [Specialty; 4] = [
        Specialty::Cardiology,
        Specialty::Dermatology,
        Specialty::Orthopedics,
        Specialty::Pediatrics,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Cardiology => "Cardiology",
            Self::Dermatology => "Dermatology",
            Self::Orthopedics => "Orthopedics",
            Self::Pediatrics => "Pediatrics",
        }
    }
}

impl fmt::Display for Specialty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Specialty {
    type Err = SchedulingError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let name = raw.trim();
        Self::ALL
            .into_iter()
            .find(|specialty| specialty.label().eq_ignore_ascii_case(name))
            .ok_or_else(|| SchedulingError::UnknownSpecialty(raw.to_string()))
    }
}

/// Time of day an appointment starts at, rendered as `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SlotTime {
    hour: u8,
    minute: u8,
}

impl SlotTime {
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        (hour < 24 && minute < 60).then_some(Self { hour, minute })
    }

    pub fn hour(self) -> u8 {
        self.hour
    }

    pub fn minute(self) -> u8 {
        self.minute
    }

    pub fn minutes_since_midnight(self) -> u16 {
        u16::from(self.hour) * 60 + u16::from(self.minute)
    }

    pub fn from_minutes(minutes: u16) -> Option<Self> {
        let hour = u8::try_from(minutes / 60).ok()?;
        let minute = u8::try_from(minutes % 60).ok()?;
        Self::new(hour, minute)
    }

    pub fn label(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SlotTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for SlotTime {
    type Err = SchedulingError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || SchedulingError::InvalidSlotTime(raw.to_string());
        let (hour, minute) = raw.trim().split_once(':').ok_or_else(invalid)?;
        if hour.len() != 2 || minute.len() != 2 {
            return Err(invalid());
        }
        let hour = hour.parse::<u8>().map_err(|_| invalid())?;
        let minute = minute.parse::<u8>().map_err(|_| invalid())?;
        Self::new(hour, minute).ok_or_else(invalid)
    }
}

impl TryFrom<String> for SlotTime {
    type Error = SchedulingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SlotTime> for String {
    fn from(value: SlotTime) -> Self {
        value.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotState {
    Available,
    Selected,
    Occupied,
}

impl SlotState {
    pub fn is_selectable(self) -> bool {
        self != Self::Occupied
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientRecord {
    pub name: String,
    pub national_id: String,
    /// Contact number for appointment messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorSummary {
    pub doctor_id: DoctorId,
    pub label: String,
    pub specialty: Specialty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftField {
    Patient,
    Doctor,
    Date,
    Slot,
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Patient => "patient",
            Self::Doctor => "doctor",
            Self::Date => "date",
            Self::Slot => "slot",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_time_parses_and_renders_zero_padded() {
        let slot: SlotTime = "07:30".parse().expect("slot");
        assert_eq!(slot, SlotTime::new(7, 30).expect("slot"));
        assert_eq!(slot.label(), "07:30");
        assert_eq!(slot.minutes_since_midnight(), 450);
    }

    #[test]
    fn slot_time_rejects_malformed_input() {
        for raw in ["7:30", "07-30", "24:00", "10:60", "", "ab:cd"] {
            assert!(raw.parse::<SlotTime>().is_err(), "{raw} should not parse");
        }
    }

    #[test]
    fn slot_time_serializes_as_label() {
        let slot = SlotTime::new(16, 0).expect("slot");
        let json = serde_json::to_string(&slot).expect("serialize");
        assert_eq!(json, "\"16:00\"");
        let back: SlotTime = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, slot);
    }

    #[test]
    fn specialty_parses_case_insensitively() {
        assert_eq!(
            "dermatology".parse::<Specialty>().expect("specialty"),
            Specialty::Dermatology
        );
        assert_eq!(
            " PEDIATRICS ".parse::<Specialty>().expect("specialty"),
            Specialty::Pediatrics
        );
        assert_eq!(
            "neurology".parse::<Specialty>(),
            Err(SchedulingError::UnknownSpecialty("neurology".to_string()))
        );
    }
}
