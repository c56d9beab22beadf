//! Appointment messages: the confirmation sent when a booking goes through
//! and the reminder sent ahead of the visit.

use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::{
    calendar::{format_long_date, DateLocale},
    draft::BookingRequest,
    submission::ConfirmationToken,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Confirmation,
    Reminder,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentMessage {
    pub kind: MessageKind,
    pub token: ConfirmationToken,
    pub request: BookingRequest,
    pub sent_on: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotifyError {
    #[error("patient {0} has no phone on record")]
    NoContact(String),
    #[error("delivery failed: {0}")]
    Delivery(String),
}

/// Delivery channel for appointment messages.
pub trait Notifier: Send {
    fn deliver(&mut self, message: &AppointmentMessage) -> Result<(), NotifyError>;
}

struct Labels {
    confirmation_title: &'static str,
    reminder_title: &'static str,
    greeting: &'static str,
    booked: &'static str,
    patient: &'static str,
    doctor: &'static str,
    date: &'static str,
    at: &'static str,
    phone: &'static str,
    protocol: &'static str,
    sent_on: &'static str,
    arrive_early: &'static str,
}

const EN_US: Labels = Labels {
    confirmation_title: "APPOINTMENT CONFIRMATION",
    reminder_title: "APPOINTMENT REMINDER",
    greeting: "Hello",
    booked: "Your appointment has been booked.",
    patient: "Patient",
    doctor: "Doctor",
    date: "Date",
    at: "at",
    phone: "Phone",
    protocol: "Protocol",
    sent_on: "Sent on",
    arrive_early: "Please arrive 15 minutes before your appointment.",
};

const PT_BR: Labels = Labels {
    confirmation_title: "CONFIRMAÇÃO DE AGENDAMENTO",
    reminder_title: "LEMBRETE DE CONSULTA",
    greeting: "Olá",
    booked: "Sua consulta foi agendada com sucesso!",
    patient: "Paciente",
    doctor: "Médico",
    date: "Data",
    at: "às",
    phone: "Telefone",
    protocol: "Protocolo",
    sent_on: "Enviado em",
    arrive_early: "Chegue 15 minutos antes do horário.",
};

impl AppointmentMessage {
    pub fn confirmation(token: ConfirmationToken, request: BookingRequest, sent_on: NaiveDate) -> Self {
        Self {
            kind: MessageKind::Confirmation,
            token,
            request,
            sent_on,
        }
    }

    pub fn reminder(token: ConfirmationToken, request: BookingRequest, sent_on: NaiveDate) -> Self {
        Self {
            kind: MessageKind::Reminder,
            token,
            request,
            sent_on,
        }
    }

    /// Plain-text body, one line per field.
    pub fn render(&self, locale: DateLocale) -> String {
        let labels = match locale {
            DateLocale::EnUs => &EN_US,
            DateLocale::PtBr => &PT_BR,
        };
        let request = &self.request;
        let when = format!(
            "{}: {} {} {}",
            labels.date,
            format_long_date(request.date, locale),
            labels.at,
            request.slot
        );

        let mut lines = Vec::new();
        match self.kind {
            MessageKind::Confirmation => {
                lines.push(labels.confirmation_title.to_string());
                lines.push(format!("{} {},", labels.greeting, request.patient.name));
                lines.push(labels.booked.to_string());
                lines.push(format!("{}: {}", labels.doctor, request.doctor.label));
                lines.push(when);
                lines.push(format!("{}: {}", labels.protocol, self.token));
                lines.push(labels.arrive_early.to_string());
            }
            MessageKind::Reminder => {
                lines.push(labels.reminder_title.to_string());
                lines.push(format!("{}: {}", labels.patient, request.patient.name));
                lines.push(format!("{}: {}", labels.doctor, request.doctor.label));
                lines.push(when);
                if let Some(phone) = &request.patient.phone {
                    lines.push(format!("{}: {phone}", labels.phone));
                }
                lines.push(format!("{}: {}", labels.protocol, self.token));
                lines.push(format!(
                    "{}: {}",
                    labels.sent_on,
                    format_long_date(self.sent_on, locale)
                ));
            }
        }
        lines.join("\n")
    }
}

/// Writes each rendered message to the log. Reminders need a phone number
/// to go anywhere, so one without is refused.
pub struct TracingNotifier {
    locale: DateLocale,
}

impl TracingNotifier {
    pub fn new(locale: DateLocale) -> Self {
        Self { locale }
    }
}

impl Notifier for TracingNotifier {
    fn deliver(&mut self, message: &AppointmentMessage) -> Result<(), NotifyError> {
        let patient = &message.request.patient;
        if message.kind == MessageKind::Reminder && patient.phone.is_none() {
            return Err(NotifyError::NoContact(patient.name.clone()));
        }
        info!(
            kind = ?message.kind,
            token = %message.token,
            phone = patient.phone.as_deref().unwrap_or("-"),
            body = %message.render(self.locale),
            "appointment message sent"
        );
        Ok(())
    }
}

/// Keeps every delivered message; clones share the same outbox.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    outbox: Arc<Mutex<Vec<AppointmentMessage>>>,
    unreachable: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// A notifier whose every delivery fails.
    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<AppointmentMessage> {
        self.outbox
            .lock()
            .map(|outbox| outbox.clone())
            .unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn deliver(&mut self, message: &AppointmentMessage) -> Result<(), NotifyError> {
        if self.unreachable {
            return Err(NotifyError::Delivery("channel unreachable".to_string()));
        }
        self.outbox
            .lock()
            .map_err(|_| NotifyError::Delivery("outbox poisoned".to_string()))?
            .push(message.clone());
        Ok(())
    }
}
