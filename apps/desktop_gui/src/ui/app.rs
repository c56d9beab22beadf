use booking_core::AppointmentController;
use eframe::egui;
use egui::{Color32, RichText};
use shared::{
    domain::{SlotState, Specialty},
    error::Notice,
    protocol::{AppointmentSummary, FormInput, FormView},
};

use crate::controller::events::{UiAction, UiEvent, DATE_INPUT_FORMAT};
use crate::controller::orchestration::{dispatch_form_input, send_reminder};

const FOUND_COLOR: Color32 = Color32::from_rgb(46, 125, 50);
const ERROR_COLOR: Color32 = Color32::from_rgb(198, 40, 40);
const SELECTED_SLOT_FILL: Color32 = Color32::from_rgb(25, 118, 210);
const OCCUPIED_SLOT_FILL: Color32 = Color32::from_rgb(120, 60, 60);

pub struct BookingApp {
    controller: AppointmentController,
    view: FormView,
    patient_query: String,
    date_text: String,
    status: String,
    notice: Option<Notice>,
    pending: Vec<UiEvent>,
}

/// Fill colour and clickability of a slot button.
fn slot_style(state: SlotState) -> (Option<Color32>, bool) {
    match state {
        SlotState::Available => (None, true),
        SlotState::Selected => (Some(SELECTED_SLOT_FILL), true),
        SlotState::Occupied => (Some(OCCUPIED_SLOT_FILL), false),
    }
}

fn date_text_for(view: &FormView) -> String {
    view.date
        .map(|date| date.format(DATE_INPUT_FORMAT).to_string())
        .unwrap_or_default()
}

fn summary_grid(ui: &mut egui::Ui, id: &str, summary: &AppointmentSummary) {
    egui::Grid::new(id)
        .num_columns(2)
        .spacing([16.0, 6.0])
        .show(ui, |ui| {
            for (label, value) in [
                ("Patient", summary.patient_name.as_str()),
                ("Doctor", summary.doctor_label.as_str()),
                ("Date", summary.date_long.as_str()),
                ("Time", summary.slot_label.as_str()),
            ] {
                ui.label(RichText::new(label).strong());
                ui.label(value);
                ui.end_row();
            }
        });
}

impl BookingApp {
    pub fn new(controller: AppointmentController) -> Self {
        let view = controller.view();
        Self {
            controller,
            view,
            patient_query: String::new(),
            date_text: String::new(),
            status: String::new(),
            notice: None,
            pending: Vec::new(),
        }
    }

    fn process_ui_events(&mut self, ctx: &egui::Context) {
        if self.pending.is_empty() {
            return;
        }

        for event in std::mem::take(&mut self.pending) {
            match event.into_action(self.view.min_date) {
                UiAction::Forward(input) => {
                    let touches_date = matches!(input, FormInput::DateEntered { .. });
                    let resets_form =
                        matches!(input, FormInput::Clear | FormInput::DismissConfirmation);

                    if let Some(notice) =
                        dispatch_form_input(&mut self.controller, input, &mut self.status)
                    {
                        self.notice = Some(notice);
                    }
                    self.view = self.controller.view();

                    if touches_date || resets_form {
                        self.date_text = date_text_for(&self.view);
                    }
                    if resets_form {
                        self.patient_query = self.view.patient_query.clone();
                    }
                }
                UiAction::InlineError(message) => {
                    tracing::debug!(%message, "date input refused");
                    self.status = message;
                }
                UiAction::SendReminder => {
                    send_reminder(&mut self.controller, &mut self.status);
                    self.view = self.controller.view();
                }
                UiAction::AcknowledgeNotice => self.notice = None,
            }
        }

        ctx.request_repaint();
    }

    fn show_form(&mut self, ctx: &egui::Context) {
        let view = self.view.clone();
        let interactive = self.notice.is_none() && view.confirmation.is_none();

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.heading("Book an appointment");
                ui.add_space(8.0);

                ui.add_enabled_ui(interactive, |ui| {
                    self.show_patient_section(ui, &view);
                    ui.separator();
                    self.show_doctor_section(ui, &view);
                    ui.separator();
                    self.show_date_section(ui, &view);
                    ui.separator();
                    self.show_slot_section(ui, &view);
                    ui.separator();
                    self.show_summary_section(ui, &view);
                    self.show_actions(ui, &view);
                });
            });
        });
    }

    fn show_patient_section(&mut self, ui: &mut egui::Ui, view: &FormView) {
        ui.label(RichText::new("Patient").strong());
        let response = ui.add(
            egui::TextEdit::singleline(&mut self.patient_query)
                .hint_text("Search by name or national id")
                .desired_width(320.0),
        );
        if response.changed() {
            self.pending
                .push(UiEvent::PatientQueryEdited(self.patient_query.clone()));
        }
        if let Some(patient) = &view.patient {
            ui.colored_label(
                FOUND_COLOR,
                format!("Patient found: {} ({})", patient.name, patient.national_id),
            );
        }
    }

    fn show_doctor_section(&mut self, ui: &mut egui::Ui, view: &FormView) {
        let mut specialty = view.specialty_filter;
        egui::ComboBox::from_label("Specialty")
            .selected_text(specialty.map_or("All specialties", Specialty::label))
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut specialty, None, "All specialties");
                for option in Specialty::ALL {
                    ui.selectable_value(&mut specialty, Some(option), option.label());
                }
            });
        if specialty != view.specialty_filter {
            self.pending.push(UiEvent::SpecialtyPicked(specialty));
        }

        let mut doctor = view.selected_doctor;
        let selected_label = view
            .doctor_options
            .iter()
            .find(|option| Some(option.doctor_id) == doctor)
            .map_or_else(|| "Select a doctor".to_string(), |option| option.label.clone());
        egui::ComboBox::from_label("Doctor")
            .selected_text(selected_label)
            .width(280.0)
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut doctor, None, "Select a doctor");
                for option in &view.doctor_options {
                    ui.selectable_value(&mut doctor, Some(option.doctor_id), option.label.as_str());
                }
            });
        if doctor != view.selected_doctor {
            self.pending.push(UiEvent::DoctorPicked(doctor));
        }
    }

    fn show_date_section(&mut self, ui: &mut egui::Ui, view: &FormView) {
        ui.horizontal(|ui| {
            ui.label(RichText::new("Date").strong());
            let response = ui.add(
                egui::TextEdit::singleline(&mut self.date_text)
                    .hint_text(format!("YYYY-MM-DD, from {}", view.min_date))
                    .desired_width(160.0),
            );
            if response.lost_focus() && self.date_text.trim() != date_text_for(view) {
                self.pending
                    .push(UiEvent::DateCommitted(self.date_text.clone()));
            }
        });
        if !self.status.is_empty() {
            ui.colored_label(ERROR_COLOR, self.status.as_str());
        }
    }

    fn show_slot_section(&mut self, ui: &mut egui::Ui, view: &FormView) {
        ui.label(RichText::new("Time").strong());
        ui.horizontal_wrapped(|ui| {
            for slot_view in &view.slots {
                let (fill, enabled) = slot_style(slot_view.state);
                let mut button = egui::Button::new(slot_view.slot.label())
                    .min_size(egui::vec2(64.0, 28.0))
                    .selected(slot_view.state == SlotState::Selected);
                if let Some(fill) = fill {
                    button = button.fill(fill);
                }
                if ui.add_enabled(enabled, button).clicked() {
                    self.pending.push(UiEvent::SlotPressed(slot_view.slot));
                }
            }
        });
    }

    fn show_summary_section(&mut self, ui: &mut egui::Ui, view: &FormView) {
        let Some(summary) = &view.summary else {
            return;
        };
        ui.label(RichText::new("Summary").strong());
        egui::Frame::group(ui.style()).show(ui, |ui| {
            summary_grid(ui, "summary_grid", summary);
        });
        ui.add_space(8.0);
    }

    fn show_actions(&mut self, ui: &mut egui::Ui, view: &FormView) {
        ui.horizontal(|ui| {
            if ui
                .add_enabled(view.submit_enabled, egui::Button::new("Confirm appointment"))
                .clicked()
            {
                self.pending.push(UiEvent::SubmitPressed);
            }
            if ui.button("Clear").clicked() {
                self.pending.push(UiEvent::ClearPressed);
            }
        });
    }

    fn show_confirmation(&mut self, ctx: &egui::Context) {
        let Some(confirmation) = self.view.confirmation.clone() else {
            return;
        };

        let mut remind = false;
        let status = self.status.as_str();
        let modal = egui::Modal::new(egui::Id::new("confirmation_modal")).show(ctx, |ui| {
            ui.set_width(380.0);
            ui.heading("Appointment confirmed");
            ui.add_space(4.0);
            ui.label(
                RichText::new(format!("Protocol {}", confirmation.token))
                    .strong()
                    .size(18.0),
            );
            ui.add_space(8.0);
            summary_grid(ui, "confirmation_grid", &confirmation.summary);
            if !status.is_empty() {
                ui.add_space(6.0);
                ui.label(status);
            }
            ui.add_space(12.0);
            ui.horizontal(|ui| {
                remind = ui.button("Send reminder").clicked();
                ui.button("Close").clicked()
            })
            .inner
        });

        if remind {
            self.pending.push(UiEvent::ReminderPressed);
        }
        // Clicking the backdrop closes the confirmation too.
        if modal.inner || modal.should_close() {
            self.pending.push(UiEvent::ConfirmationClosed);
        }
    }

    fn show_notice(&mut self, ctx: &egui::Context) {
        let Some(notice) = self.notice.clone() else {
            return;
        };

        let modal = egui::Modal::new(egui::Id::new("notice_modal")).show(ctx, |ui| {
            ui.set_width(340.0);
            ui.colored_label(ERROR_COLOR, RichText::new("Attention").strong());
            ui.add_space(4.0);
            ui.label(notice.message.as_str());
            ui.add_space(8.0);
            ui.button("OK").clicked()
        });

        if modal.inner {
            self.pending.push(UiEvent::NoticeAcknowledged);
        }
    }
}

impl eframe::App for BookingApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.show_form(ctx);
        self.show_confirmation(ctx);
        self.show_notice(ctx);
        self.process_ui_events(ctx);
    }
}
