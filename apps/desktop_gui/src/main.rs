use std::path::PathBuf;

mod controller;
mod ui;

use anyhow::Context;
use booking_core::{load_settings, AppointmentController};
use clap::Parser;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::ui::BookingApp;

#[derive(Parser, Debug)]
#[command(about = "Clinic appointment booking form")]
struct Args {
    /// Settings file; `booking.toml` in the working directory is used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let settings = load_settings(args.config.as_deref()).context("failed to load settings")?;
    tracing::info!(locale = ?settings.locale, seeded = settings.rng_seed.is_some(), "starting booking form");
    let controller =
        AppointmentController::new(&settings).context("booking settings were refused")?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Clinic Booking")
            .with_inner_size([780.0, 760.0])
            .with_min_inner_size([560.0, 560.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Clinic Booking",
        options,
        Box::new(move |_cc| Ok(Box::new(BookingApp::new(controller)))),
    )
    .map_err(|err| anyhow::anyhow!("booking form exited with an error: {err}"))
}
