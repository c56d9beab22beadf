//! Controller layer: UI events and their dispatch to the appointment form.

pub mod events;
pub mod orchestration;
