use shared::{domain::PatientRecord, error::SchedulingError};

pub const DEFAULT_MIN_QUERY_LEN: usize = 3;

/// Resolves the free-text patient query. `Ok(None)` means "no patient yet";
/// a real directory would also return `PatientNotFound` or `AmbiguousPatient`.
pub trait PatientLookup: Send {
    fn lookup(&self, query: &str) -> Result<Option<PatientRecord>, SchedulingError>;
}

/// Demo lookup: any query of at least `min_query_len` characters matches the
/// same canned patient.
#[derive(Debug, Clone)]
pub struct CannedPatientLookup {
    min_query_len: usize,
    patient: PatientRecord,
}

impl CannedPatientLookup {
    pub fn new(min_query_len: usize) -> Self {
        Self {
            min_query_len,
            patient: canned_patient(),
        }
    }

    pub fn with_patient(mut self, patient: PatientRecord) -> Self {
        self.patient = patient;
        self
    }
}

impl Default for CannedPatientLookup {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_QUERY_LEN)
    }
}

impl PatientLookup for CannedPatientLookup {
    fn lookup(&self, query: &str) -> Result<Option<PatientRecord>, SchedulingError> {
        if query.chars().count() >= self.min_query_len {
            Ok(Some(self.patient.clone()))
        } else {
            Ok(None)
        }
    }
}

pub fn canned_patient() -> PatientRecord {
    PatientRecord {
        name: "Maria Silva Santos".to_string(),
        national_id: "123.456.789-00".to_string(),
        phone: Some("(11) 99999-9999".to_string()),
    }
}
