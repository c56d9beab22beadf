use super::*;

use shared::{domain::SlotState, error::NoticeCode};

use crate::{
    calendar::FixedClock,
    draft::BookingRequest,
    lookup::canned_patient,
    notify::{MessageKind, RecordingNotifier},
    submission::{ConfirmationToken, FixedAvailability},
};

struct SequenceIssuer {
    next: u16,
}

impl TokenIssuer for SequenceIssuer {
    fn issue(&mut self, _request: &BookingRequest, today: NaiveDate) -> ConfirmationToken {
        self.next += 1;
        ConfirmationToken::compose("AG", chrono::Datelike::year(&today), self.next)
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn slot(raw: &str) -> SlotTime {
    raw.parse().expect("slot")
}

// Friday.
fn today() -> NaiveDate {
    date(2025, 10, 10)
}

fn tuesday() -> NaiveDate {
    date(2025, 10, 14)
}

fn controller(available: bool) -> AppointmentController {
    AppointmentController::new(&BookingSettings::default())
        .expect("default settings")
        .with_clock(FixedClock(today()))
        .with_availability_check(FixedAvailability(available))
        .with_token_issuer(SequenceIssuer { next: 0 })
}

fn fill(controller: &mut AppointmentController) {
    assert_eq!(
        controller.apply(FormInput::PatientQueryChanged {
            query: "Mar".to_string()
        }),
        None
    );
    assert_eq!(
        controller.apply(FormInput::DoctorSelected {
            doctor_id: Some(DoctorId(2))
        }),
        None
    );
    assert_eq!(
        controller.apply(FormInput::DateEntered {
            date: Some(tuesday())
        }),
        None
    );
    assert_eq!(
        controller.apply(FormInput::SlotClicked {
            slot: slot("10:00")
        }),
        None
    );
}

#[test]
fn starts_empty_with_every_open_slot_available() {
    let controller = controller(true);
    let view = controller.view();

    assert!(!controller.is_complete());
    assert!(!view.submit_enabled);
    assert!(view.summary.is_none());
    assert!(!view.patient_found());
    assert_eq!(view.doctor_options.len(), 4);
    assert_eq!(view.min_date, today());
    assert_eq!(
        view.slots_in_state(SlotState::Occupied),
        vec![slot("12:00"), slot("12:30")]
    );
    assert_eq!(view.selected_slot(), None);
}

#[test]
fn patient_is_set_exactly_when_query_reaches_three_characters() {
    let mut controller = controller(true);
    for (query, found) in [("M", false), ("Ma", false), ("Mar", true), ("Ma", false)] {
        controller.apply(FormInput::PatientQueryChanged {
            query: query.to_string(),
        });
        assert_eq!(controller.view().patient_found(), found, "query {query:?}");
        assert_eq!(controller.view().patient_query, query);
    }
    controller.set_patient_query("Maria").expect("editable");
    assert_eq!(controller.draft().patient, Some(canned_patient()));
}

#[test]
fn weekend_date_is_rejected_with_a_notice_and_left_unset() {
    let mut controller = controller(true);

    let notice = controller
        .apply(FormInput::DateEntered {
            date: Some(date(2025, 10, 18)),
        })
        .expect("weekend notice");

    assert_eq!(notice.code, NoticeCode::WeekendDate);
    assert_eq!(controller.draft().date, None);
    assert_eq!(controller.view().date, None);

    assert_eq!(
        controller.apply(FormInput::DateEntered {
            date: Some(date(2025, 10, 19))
        })
        .map(|notice| notice.code),
        Some(NoticeCode::WeekendDate)
    );
}

#[test]
fn weekday_date_is_stored_as_given() {
    let mut controller = controller(true);
    for day in 13..=17 {
        let weekday = date(2025, 10, day);
        assert_eq!(
            controller.apply(FormInput::DateEntered { date: Some(weekday) }),
            None
        );
        assert_eq!(controller.draft().date, Some(weekday));
    }
}

#[test]
fn weekend_entry_replaces_a_previously_accepted_date() {
    let mut controller = controller(true);
    controller
        .enter_date(Some(tuesday()))
        .expect("weekday accepted");

    let err = controller.enter_date(Some(date(2025, 10, 18)));

    assert!(matches!(err, Err(SchedulingError::WeekendDate { .. })));
    assert_eq!(controller.draft().date, None);
}

#[test]
fn date_change_clears_the_slot_selection() {
    let mut controller = controller(true);
    fill(&mut controller);
    assert!(controller.is_complete());

    controller.apply(FormInput::DateEntered {
        date: Some(date(2025, 10, 15)),
    });

    let view = controller.view();
    assert_eq!(controller.draft().slot, None);
    assert_eq!(view.selected_slot(), None);
    assert_eq!(view.slots_in_state(SlotState::Selected), Vec::<SlotTime>::new());
    assert!(!view.submit_enabled);
    assert!(view.summary.is_none());
}

#[test]
fn doctor_change_recomputes_occupied_slots() {
    let mut controller = controller(true);

    controller.apply(FormInput::DoctorSelected {
        doctor_id: Some(DoctorId(2)),
    });
    assert_eq!(
        controller.view().slots_in_state(SlotState::Occupied),
        vec![
            slot("09:00"),
            slot("11:00"),
            slot("12:00"),
            slot("12:30"),
            slot("16:00")
        ]
    );

    controller.apply(FormInput::DoctorSelected {
        doctor_id: Some(DoctorId(3)),
    });
    assert_eq!(
        controller.view().slots_in_state(SlotState::Occupied),
        vec![
            slot("07:30"),
            slot("12:00"),
            slot("12:30"),
            slot("14:00"),
            slot("17:00")
        ]
    );
}

#[test]
fn doctor_change_clears_a_slot_the_new_doctor_has_occupied() {
    let mut controller = controller(true);
    controller.select_doctor(Some(DoctorId(1))).expect("doctor 1");
    controller.select_slot(slot("09:00")).expect("09:00 free for doctor 1");

    controller.select_doctor(Some(DoctorId(2))).expect("doctor 2");

    assert_eq!(controller.draft().slot, None);
    let view = controller.view();
    assert_eq!(view.selected_slot(), None);
    assert!(view.slots_in_state(SlotState::Occupied).contains(&slot("09:00")));
}

#[test]
fn doctor_change_keeps_a_slot_that_is_still_free() {
    let mut controller = controller(true);
    controller.select_doctor(Some(DoctorId(1))).expect("doctor 1");
    controller.select_slot(slot("10:00")).expect("select");

    controller.select_doctor(Some(DoctorId(2))).expect("doctor 2");

    assert_eq!(controller.draft().slot, Some(slot("10:00")));
    assert_eq!(controller.view().selected_slot(), Some(slot("10:00")));
}

#[test]
fn specialty_filter_that_hides_the_doctor_clears_it() {
    let mut controller = controller(true);
    controller.select_doctor(Some(DoctorId(2))).expect("doctor 2");
    controller.select_slot(slot("10:30")).expect("select");

    controller.apply(FormInput::SpecialtyFiltered {
        specialty: Some(Specialty::Cardiology),
    });

    let view = controller.view();
    assert_eq!(view.selected_doctor, None);
    assert_eq!(view.doctor_options.len(), 1);
    assert_eq!(view.doctor_options[0].doctor_id, DoctorId(1));
    assert_eq!(
        view.slots_in_state(SlotState::Occupied),
        vec![slot("12:00"), slot("12:30")]
    );
    // 10:30 stays free without a doctor, so the pick survives the recompute.
    assert_eq!(view.selected_slot(), Some(slot("10:30")));
}

#[test]
fn specialty_filter_matching_the_doctor_keeps_it() {
    let mut controller = controller(true);
    controller.select_doctor(Some(DoctorId(2))).expect("doctor 2");

    controller
        .filter_specialty(Some(Specialty::Dermatology))
        .expect("editable");
    assert_eq!(controller.view().selected_doctor, Some(DoctorId(2)));

    controller.filter_specialty(None).expect("editable");
    assert_eq!(controller.view().doctor_options.len(), 4);
    assert_eq!(controller.view().selected_doctor, Some(DoctorId(2)));
}

#[test]
fn hidden_or_unknown_doctors_cannot_be_selected() {
    let mut controller = controller(true);
    controller
        .filter_specialty(Some(Specialty::Pediatrics))
        .expect("editable");

    assert_eq!(
        controller.select_doctor(Some(DoctorId(1))),
        Err(SchedulingError::DoctorHidden(DoctorId(1)))
    );
    assert_eq!(
        controller.select_doctor(Some(DoctorId(42))),
        Err(SchedulingError::UnknownDoctor(DoctorId(42)))
    );
    assert_eq!(controller.draft().doctor, None);
}

#[test]
fn occupied_slot_clicks_are_ignored() {
    let mut controller = controller(true);
    controller.select_doctor(Some(DoctorId(2))).expect("doctor");
    controller.select_slot(slot("10:00")).expect("select");

    assert_eq!(
        controller.apply(FormInput::SlotClicked {
            slot: slot("11:00")
        }),
        None
    );

    assert_eq!(controller.draft().slot, Some(slot("10:00")));
    assert_eq!(controller.view().selected_slot(), Some(slot("10:00")));
}

#[test]
fn summary_visibility_tracks_completeness() {
    let mut controller = controller(true);
    let inputs = [
        FormInput::PatientQueryChanged {
            query: "Mar".to_string(),
        },
        FormInput::DoctorSelected {
            doctor_id: Some(DoctorId(2)),
        },
        FormInput::DateEntered {
            date: Some(tuesday()),
        },
        FormInput::SlotClicked {
            slot: slot("10:00"),
        },
        FormInput::PatientQueryChanged {
            query: "Ma".to_string(),
        },
        FormInput::PatientQueryChanged {
            query: "Mari".to_string(),
        },
        FormInput::DoctorSelected { doctor_id: None },
    ];

    for input in inputs {
        controller.apply(input);
        let view = controller.view();
        assert_eq!(view.summary.is_some(), controller.is_complete());
        assert_eq!(view.submit_enabled, controller.is_complete());
    }
}

#[test]
fn complete_draft_projects_a_summary() {
    let mut controller = controller(true);
    fill(&mut controller);

    let summary = controller.view().summary.expect("summary");
    assert_eq!(summary.patient_name, "Maria Silva Santos");
    assert_eq!(summary.doctor_label, "Dra. Maria Costa - Dermatology");
    assert_eq!(summary.date_long, "Tuesday, October 14, 2025");
    assert_eq!(summary.slot_label, "10:00");
}

#[test]
fn submitting_an_incomplete_draft_does_nothing() {
    let mut controller = controller(true);
    controller.set_patient_query("Mar").expect("editable");

    assert_eq!(controller.apply(FormInput::Submit), None);
    assert!(matches!(
        controller.submit(),
        Err(SchedulingError::DraftIncomplete { .. })
    ));
    assert_eq!(controller.phase(), &SubmissionPhase::Idle);
}

#[test]
fn rejected_submission_keeps_the_draft() {
    let mut controller = controller(false);
    fill(&mut controller);
    let before = controller.draft().clone();

    let notice = controller.apply(FormInput::Submit).expect("notice");

    assert_eq!(notice.code, NoticeCode::SlotUnavailable);
    assert!(notice.message.contains("10:00"));
    assert_eq!(controller.draft(), &before);
    assert_eq!(controller.phase(), &SubmissionPhase::Idle);
    let view = controller.view();
    assert!(view.submit_enabled);
    assert!(view.confirmation.is_none());

    controller
        .select_slot(slot("10:30"))
        .expect("another slot can be picked after a rejection");
}

#[test]
fn confirmed_submission_shows_token_and_locks_the_form() {
    let mut controller = controller(true);
    fill(&mut controller);

    assert_eq!(controller.apply(FormInput::Submit), None);

    let view = controller.view();
    let confirmation = view.confirmation.expect("confirmation");
    assert_eq!(confirmation.token, "#AG20250001");
    assert_eq!(confirmation.summary.slot_label, "10:00");
    assert!(!view.submit_enabled);

    assert_eq!(controller.submit(), Err(SchedulingError::AlreadyConfirmed));
    assert_eq!(
        controller.select_slot(slot("10:30")),
        Err(SchedulingError::AlreadyConfirmed)
    );
}

#[test]
fn dismissing_the_confirmation_empties_the_draft() {
    let mut controller = controller(true);
    fill(&mut controller);
    controller.apply(FormInput::Submit);

    assert_eq!(controller.apply(FormInput::DismissConfirmation), None);

    assert!(!controller.is_complete());
    assert_eq!(controller.draft(), &Draft::default());
    let view = controller.view();
    assert!(view.confirmation.is_none());
    assert!(view.patient_query.is_empty());
    assert_eq!(view.selected_slot(), None);
    assert_eq!(controller.phase(), &SubmissionPhase::Idle);
}

#[test]
fn dismiss_without_confirmation_is_an_error() {
    let mut controller = controller(true);
    assert_eq!(
        controller.dismiss_confirmation(),
        Err(SchedulingError::NothingToDismiss)
    );
    assert_eq!(controller.apply(FormInput::DismissConfirmation), None);
}

#[test]
fn clear_resets_everything() {
    let mut controller = controller(true);
    controller
        .filter_specialty(Some(Specialty::Dermatology))
        .expect("editable");
    fill(&mut controller);

    controller.apply(FormInput::Clear);

    let fresh = self::controller(true).view();
    assert_eq!(controller.view(), fresh);
    assert_eq!(controller.draft(), &Draft::default());
}

#[test]
fn tokens_advance_across_bookings() {
    let mut controller = controller(true);
    for expected in ["#AG20250001", "#AG20250002"] {
        fill(&mut controller);
        controller.apply(FormInput::Submit);
        assert_eq!(
            controller.view().confirmation.map(|c| c.token),
            Some(expected.to_string())
        );
        controller.apply(FormInput::DismissConfirmation);
    }
}

#[test]
fn query_and_filter_are_refused_while_confirmed() {
    let mut controller = controller(true);
    fill(&mut controller);
    controller.apply(FormInput::Submit);

    assert_eq!(
        controller.set_patient_query("Jo"),
        Err(SchedulingError::AlreadyConfirmed)
    );
    assert_eq!(
        controller.filter_specialty(Some(Specialty::Cardiology)),
        Err(SchedulingError::AlreadyConfirmed)
    );
    assert_eq!(
        controller.apply(FormInput::PatientQueryChanged {
            query: "Jo".to_string()
        }),
        None
    );

    let view = controller.view();
    assert_eq!(view.patient_query, "Mar");
    assert_eq!(view.specialty_filter, None);
    assert!(view.patient_found());
}

#[test]
fn settings_that_fail_validation_are_refused() {
    for probability in [f64::NAN, 1.5] {
        let settings = BookingSettings {
            success_probability: probability,
            ..BookingSettings::default()
        };
        assert!(matches!(
            AppointmentController::new(&settings),
            Err(SettingsError::SuccessProbability(_))
        ));
    }
}

#[test]
fn confirmation_is_sent_to_the_patient() {
    let outbox = RecordingNotifier::new();
    let mut controller = controller(true).with_notifier(outbox.clone());
    fill(&mut controller);

    controller.apply(FormInput::Submit);

    let sent = outbox.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].kind, MessageKind::Confirmation);
    assert_eq!(sent[0].token.as_str(), "#AG20250001");
    assert_eq!(sent[0].request.slot, slot("10:00"));
    assert_eq!(sent[0].sent_on, today());
}

#[test]
fn rejected_submission_sends_nothing() {
    let outbox = RecordingNotifier::new();
    let mut controller = controller(false).with_notifier(outbox.clone());
    fill(&mut controller);

    controller.apply(FormInput::Submit);

    assert!(outbox.sent().is_empty());
}

#[test]
fn undeliverable_confirmation_still_books() {
    let mut controller = controller(true).with_notifier(RecordingNotifier::unreachable());
    fill(&mut controller);

    assert_eq!(controller.apply(FormInput::Submit), None);
    assert!(controller.view().confirmation.is_some());
}

#[test]
fn reminder_goes_out_for_the_open_confirmation_only() {
    let outbox = RecordingNotifier::new();
    let mut controller = controller(true).with_notifier(outbox.clone());
    assert_eq!(
        controller.send_reminder(),
        Err(SchedulingError::NoConfirmedAppointment)
    );

    fill(&mut controller);
    controller.apply(FormInput::Submit);
    assert_eq!(controller.apply(FormInput::SendReminder), None);

    let sent = outbox.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[1].kind, MessageKind::Reminder);
    assert_eq!(sent[1].token, sent[0].token);
    assert!(controller.view().confirmation.is_some());

    controller.apply(FormInput::DismissConfirmation);
    assert_eq!(
        controller.send_reminder(),
        Err(SchedulingError::NoConfirmedAppointment)
    );
}

#[test]
fn reminder_delivery_failure_is_reported() {
    let mut controller = controller(true).with_notifier(RecordingNotifier::unreachable());
    fill(&mut controller);
    controller.apply(FormInput::Submit);

    assert!(matches!(
        controller.send_reminder(),
        Err(SchedulingError::Notification(_))
    ));
}
