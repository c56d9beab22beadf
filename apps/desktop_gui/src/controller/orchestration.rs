//! Applies form inputs from the UI to the appointment controller.

use booking_core::AppointmentController;
use shared::{error::Notice, protocol::FormInput};

pub fn dispatch_form_input(
    controller: &mut AppointmentController,
    input: FormInput,
    status: &mut String,
) -> Option<Notice> {
    let input_name = match &input {
        FormInput::PatientQueryChanged { .. } => "patient_query_changed",
        FormInput::SpecialtyFiltered { .. } => "specialty_filtered",
        FormInput::DoctorSelected { .. } => "doctor_selected",
        FormInput::DateEntered { .. } => "date_entered",
        FormInput::SlotClicked { .. } => "slot_clicked",
        FormInput::Submit => "submit",
        FormInput::SendReminder => "send_reminder",
        FormInput::DismissConfirmation => "dismiss_confirmation",
        FormInput::Clear => "clear",
    };

    let notice = controller.apply(input);
    match &notice {
        Some(notice) => {
            tracing::info!(input = input_name, code = ?notice.code, "form raised a notice");
        }
        None => {
            tracing::debug!(input = input_name, "applied ui->form input");
            status.clear();
        }
    }
    notice
}

/// Sends a reminder for the open confirmation and reports the result in `status`.
pub fn send_reminder(controller: &mut AppointmentController, status: &mut String) {
    match controller.send_reminder() {
        Ok(message) => {
            tracing::info!(token = %message.token, "reminder requested from the confirmation");
            *status = match &message.request.patient.phone {
                Some(phone) => format!("Reminder sent to {phone}"),
                None => "Reminder sent".to_string(),
            };
        }
        Err(err) => {
            tracing::warn!(error = %err, "reminder not sent");
            *status = format!("Reminder not sent: {err}");
        }
    }
}
