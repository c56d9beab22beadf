//! Submission flow: final availability check and confirmation token.
//!
//! `Idle -> Confirming -> {Confirmed, Rejected}`. A rejection drops straight
//! back to `Idle`; a confirmation holds until it is dismissed.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use rand::{distributions::Bernoulli, rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use shared::{domain::SlotTime, error::SchedulingError};
use tracing::{debug, info, warn};

use crate::{config::SettingsError, draft::BookingRequest};

pub const DEFAULT_SUCCESS_PROBABILITY: f64 = 0.95;
pub const DEFAULT_TOKEN_PREFIX: &str = "AG";
const TOKEN_SERIAL_MAX: u16 = 9999;

/// Last-moment check that the slot was not taken between selection and submit.
pub trait AvailabilityCheck: Send {
    fn still_available(&mut self, request: &BookingRequest) -> bool;
}

pub trait TokenIssuer: Send {
    fn issue(&mut self, request: &BookingRequest, today: NaiveDate) -> ConfirmationToken;
}

/// Simulated server race: succeeds with a fixed probability.
pub struct RandomAvailabilityCheck {
    success: Bernoulli,
    rng: StdRng,
}

impl RandomAvailabilityCheck {
    /// Fails unless `success_probability` is a number within `[0, 1]`.
    pub fn new(success_probability: f64, seed: Option<u64>) -> Result<Self, SettingsError> {
        let success = Bernoulli::new(success_probability)
            .map_err(|_| SettingsError::SuccessProbability(success_probability))?;
        Ok(Self {
            success,
            rng: seeded_rng(seed),
        })
    }
}

impl AvailabilityCheck for RandomAvailabilityCheck {
    fn still_available(&mut self, _request: &BookingRequest) -> bool {
        self.rng.sample(self.success)
    }
}

/// Always answers the same way.
#[derive(Debug, Clone, Copy)]
pub struct FixedAvailability(pub bool);

impl AvailabilityCheck for FixedAvailability {
    fn still_available(&mut self, _request: &BookingRequest) -> bool {
        self.0
    }
}

/// `#<prefix><year><serial>` with a random serial in 1..=9999.
///
/// Serials are not checked for collisions; two bookings can share a token.
pub struct RandomTokenIssuer {
    prefix: String,
    rng: StdRng,
}

impl RandomTokenIssuer {
    pub fn new(prefix: impl Into<String>, seed: Option<u64>) -> Self {
        Self {
            prefix: prefix.into(),
            // Offset keeps the serial stream independent of the availability draws.
            rng: seeded_rng(seed.map(|seed| seed.wrapping_add(1))),
        }
    }
}

impl TokenIssuer for RandomTokenIssuer {
    fn issue(&mut self, _request: &BookingRequest, today: NaiveDate) -> ConfirmationToken {
        let serial = self.rng.gen_range(1..=TOKEN_SERIAL_MAX);
        ConfirmationToken::compose(&self.prefix, today.year(), serial)
    }
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConfirmationToken(String);

impl ConfirmationToken {
    pub fn compose(prefix: &str, year: i32, serial: u16) -> Self {
        Self(format!("#{prefix}{year:04}{serial:04}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `#<prefix>` followed by exactly eight digits.
    pub fn is_well_formed(&self, prefix: &str) -> bool {
        self.0
            .strip_prefix('#')
            .and_then(|rest| rest.strip_prefix(prefix))
            .is_some_and(|digits| digits.len() == 8 && digits.bytes().all(|b| b.is_ascii_digit()))
    }
}

impl fmt::Display for ConfirmationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionPhase {
    Idle,
    Confirming,
    Confirmed {
        token: ConfirmationToken,
        request: BookingRequest,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Confirmed(ConfirmationToken),
    Rejected { slot: SlotTime },
}

pub struct Submission {
    phase: SubmissionPhase,
    availability: Box<dyn AvailabilityCheck>,
    issuer: Box<dyn TokenIssuer>,
}

impl Submission {
    pub fn new(availability: Box<dyn AvailabilityCheck>, issuer: Box<dyn TokenIssuer>) -> Self {
        Self {
            phase: SubmissionPhase::Idle,
            availability,
            issuer,
        }
    }

    pub fn phase(&self) -> &SubmissionPhase {
        &self.phase
    }

    pub fn is_idle(&self) -> bool {
        self.phase == SubmissionPhase::Idle
    }

    pub fn set_availability_check(&mut self, availability: Box<dyn AvailabilityCheck>) {
        self.availability = availability;
    }

    pub fn set_token_issuer(&mut self, issuer: Box<dyn TokenIssuer>) {
        self.issuer = issuer;
    }

    /// Runs the flow for a complete draft. Refuses to start unless idle, so a
    /// second submit cannot race the first.
    pub fn submit(
        &mut self,
        request: BookingRequest,
        today: NaiveDate,
    ) -> Result<SubmissionOutcome, SchedulingError> {
        match self.phase {
            SubmissionPhase::Idle => {}
            SubmissionPhase::Confirming => return Err(SchedulingError::SubmissionInFlight),
            SubmissionPhase::Confirmed { .. } => return Err(SchedulingError::AlreadyConfirmed),
        }

        self.phase = SubmissionPhase::Confirming;
        debug!(slot = %request.slot, date = %request.date, "running final availability check");

        if !self.availability.still_available(&request) {
            warn!(slot = %request.slot, date = %request.date, "slot taken before confirmation");
            self.phase = SubmissionPhase::Idle;
            return Ok(SubmissionOutcome::Rejected { slot: request.slot });
        }

        let token = self.issuer.issue(&request, today);
        info!(
            token = %token,
            patient = %request.patient.name,
            doctor = %request.doctor.label,
            date = %request.date,
            slot = %request.slot,
            "appointment confirmed"
        );
        self.phase = SubmissionPhase::Confirmed {
            token: token.clone(),
            request,
        };
        Ok(SubmissionOutcome::Confirmed(token))
    }

    /// Closes a confirmation and returns the booking it held.
    pub fn dismiss(&mut self) -> Result<(ConfirmationToken, BookingRequest), SchedulingError> {
        match std::mem::replace(&mut self.phase, SubmissionPhase::Idle) {
            SubmissionPhase::Confirmed { token, request } => Ok((token, request)),
            other => {
                self.phase = other;
                Err(SchedulingError::NothingToDismiss)
            }
        }
    }

    pub fn reset(&mut self) {
        self.phase = SubmissionPhase::Idle;
    }
}

#[cfg(test)]
#[path = "tests/submission_tests.rs"]
mod tests;
