//! UI layer for the booking form: app shell, form sections and modals.

pub mod app;

pub use app::BookingApp;
