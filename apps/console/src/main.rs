use std::path::PathBuf;

use anyhow::{Context, Result};
use booking_core::{load_settings, AppointmentController, DateLocale, SubmissionOutcome};
use chrono::NaiveDate;
use clap::Parser;
use serde::Serialize;
use shared::{
    domain::{DoctorId, SlotTime, Specialty},
    error::Notice,
    protocol::{FormInput, FormView},
};
use tracing_subscriber::EnvFilter;

/// Fills the booking form from the command line and submits it.
#[derive(Parser, Debug)]
struct Args {
    #[arg(long)]
    config: Option<PathBuf>,
    /// Patient search text.
    #[arg(long, default_value = "Mar")]
    patient: String,
    #[arg(long)]
    specialty: Option<Specialty>,
    #[arg(long, default_value_t = 2)]
    doctor: i64,
    /// Appointment date, YYYY-MM-DD.
    #[arg(long)]
    date: NaiveDate,
    /// Slot time, HH:MM.
    #[arg(long, default_value = "10:00")]
    slot: SlotTime,
    /// Seed for the simulated availability check and token serials.
    #[arg(long)]
    seed: Option<u64>,
    /// Submissions to try before giving up on a contested slot.
    #[arg(long, default_value_t = 1)]
    attempts: u32,
    /// Send a reminder for the booking once it is confirmed.
    #[arg(long)]
    remind: bool,
    /// Print the final form view and outcome as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum Outcome {
    Incomplete,
    Confirmed { token: String, attempts: u32 },
    Rejected { attempts: u32 },
}

#[derive(Debug, Serialize)]
struct Walkthrough {
    notices: Vec<Notice>,
    outcome: Outcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    reminder: Option<String>,
    view: FormView,
}

fn script(args: &Args) -> Vec<FormInput> {
    vec![
        FormInput::PatientQueryChanged {
            query: args.patient.clone(),
        },
        FormInput::SpecialtyFiltered {
            specialty: args.specialty,
        },
        FormInput::DoctorSelected {
            doctor_id: Some(DoctorId(args.doctor)),
        },
        FormInput::DateEntered {
            date: Some(args.date),
        },
        FormInput::SlotClicked { slot: args.slot },
    ]
}

fn run_walkthrough(
    controller: &mut AppointmentController,
    inputs: Vec<FormInput>,
    attempts: u32,
    remind: Option<DateLocale>,
) -> Walkthrough {
    let mut notices: Vec<Notice> = inputs
        .into_iter()
        .filter_map(|input| controller.apply(input))
        .collect();

    let mut outcome = Outcome::Incomplete;
    for attempt in 1..=attempts.max(1) {
        if !controller.view().submit_enabled {
            break;
        }
        match controller.submit() {
            Ok(SubmissionOutcome::Confirmed(token)) => {
                outcome = Outcome::Confirmed {
                    token: token.to_string(),
                    attempts: attempt,
                };
                break;
            }
            Ok(SubmissionOutcome::Rejected { slot }) => {
                tracing::warn!(attempt, %slot, "submission rejected");
                notices.extend(shared::error::SchedulingError::SlotUnavailable { slot }.notice());
                outcome = Outcome::Rejected { attempts: attempt };
            }
            Err(err) => {
                tracing::warn!(error = %err, "submission refused");
                break;
            }
        }
    }

    let reminder = match (&outcome, remind) {
        (Outcome::Confirmed { .. }, Some(locale)) => match controller.send_reminder() {
            Ok(message) => Some(message.render(locale)),
            Err(err) => {
                tracing::warn!(error = %err, "reminder not sent");
                None
            }
        },
        _ => None,
    };

    Walkthrough {
        notices,
        outcome,
        reminder,
        view: controller.view(),
    }
}

fn print_text(walkthrough: &Walkthrough) {
    for notice in &walkthrough.notices {
        println!("! {}", notice.message);
    }
    if let Some(summary) = &walkthrough.view.summary {
        println!("patient: {}", summary.patient_name);
        println!("doctor:  {}", summary.doctor_label);
        println!("date:    {}", summary.date_long);
        println!("time:    {}", summary.slot_label);
    }
    match &walkthrough.outcome {
        Outcome::Incomplete => println!("form incomplete; nothing submitted"),
        Outcome::Confirmed { token, attempts } => {
            println!("confirmed after {attempts} attempt(s), protocol {token}")
        }
        Outcome::Rejected { attempts } => {
            println!("slot unavailable after {attempts} attempt(s)")
        }
    }
    if let Some(reminder) = &walkthrough.reminder {
        println!();
        println!("{reminder}");
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let args = Args::parse();

    let mut settings = load_settings(args.config.as_deref()).context("failed to load settings")?;
    if args.seed.is_some() {
        settings.rng_seed = args.seed;
    }

    let mut controller =
        AppointmentController::new(&settings).context("booking settings were refused")?;
    let remind = args.remind.then_some(settings.locale);
    let walkthrough = run_walkthrough(&mut controller, script(&args), args.attempts, remind);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&walkthrough)?);
    } else {
        print_text(&walkthrough);
    }

    Ok(())
}
