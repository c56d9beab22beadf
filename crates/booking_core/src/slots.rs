//! Slot board: the fixed grid of appointment times and the state of each.

use shared::{
    domain::{SlotState, SlotTime},
    error::SchedulingError,
    protocol::SlotView,
};

pub const FIRST_SLOT_MINUTES: u16 = 7 * 60 + 30;
pub const LAST_SLOT_MINUTES: u16 = 17 * 60;
pub const SLOT_STEP_MINUTES: u16 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SlotEntry {
    slot: SlotTime,
    state: SlotState,
    /// Closed slots (lunch break) stay occupied whatever the doctor.
    closed: bool,
}

#[derive(Debug, Clone)]
pub struct SlotBoard {
    entries: Vec<SlotEntry>,
}

/// Every slot time on the clinic's daily grid, in order.
pub fn standard_grid() -> Vec<SlotTime> {
    (FIRST_SLOT_MINUTES..=LAST_SLOT_MINUTES)
        .step_by(usize::from(SLOT_STEP_MINUTES))
        .filter_map(SlotTime::from_minutes)
        .collect()
}

impl SlotBoard {
    pub fn new(grid: &[SlotTime], closed: &[SlotTime]) -> Self {
        let entries = grid
            .iter()
            .map(|slot| {
                let closed = closed.contains(slot);
                SlotEntry {
                    slot: *slot,
                    state: if closed {
                        SlotState::Occupied
                    } else {
                        SlotState::Available
                    },
                    closed,
                }
            })
            .collect();
        Self { entries }
    }

    pub fn standard(closed: &[SlotTime]) -> Self {
        Self::new(&standard_grid(), closed)
    }

    pub fn selected(&self) -> Option<SlotTime> {
        self.entries
            .iter()
            .find(|entry| entry.state == SlotState::Selected)
            .map(|entry| entry.slot)
    }

    pub fn state_of(&self, slot: SlotTime) -> Option<SlotState> {
        self.entry(slot).map(|entry| entry.state)
    }

    /// Full recompute for a doctor's occupied set. Open slots go back to
    /// available, then `occupied` is applied; a selection survives only if its
    /// slot is still free. Returns the surviving selection.
    pub fn apply_availability(&mut self, occupied: &[SlotTime]) -> Option<SlotTime> {
        let previous = self.selected();

        for entry in self.entries.iter_mut().filter(|entry| !entry.closed) {
            entry.state = if occupied.contains(&entry.slot) {
                SlotState::Occupied
            } else {
                SlotState::Available
            };
        }

        let kept = previous.filter(|slot| self.state_of(*slot) == Some(SlotState::Available));
        if let Some(slot) = kept {
            self.set_state(slot, SlotState::Selected);
        }
        kept
    }

    /// Marks `slot` selected after returning any previous selection to
    /// available. Returns the previous selection.
    pub fn select(&mut self, slot: SlotTime) -> Result<Option<SlotTime>, SchedulingError> {
        match self.state_of(slot) {
            None => return Err(SchedulingError::UnknownSlot(slot)),
            Some(SlotState::Occupied) => return Err(SchedulingError::SlotOccupied { slot }),
            Some(_) => {}
        }

        let previous = self.clear_selection();
        self.set_state(slot, SlotState::Selected);
        Ok(previous)
    }

    pub fn clear_selection(&mut self) -> Option<SlotTime> {
        let previous = self.selected()?;
        self.set_state(previous, SlotState::Available);
        Some(previous)
    }

    /// Back to the page-load state: nothing selected, only closed slots occupied.
    pub fn reset(&mut self) {
        self.apply_availability(&[]);
        self.clear_selection();
    }

    pub fn views(&self) -> Vec<SlotView> {
        self.entries
            .iter()
            .map(|entry| SlotView {
                slot: entry.slot,
                state: entry.state,
            })
            .collect()
    }

    fn entry(&self, slot: SlotTime) -> Option<&SlotEntry> {
        self.entries.iter().find(|entry| entry.slot == slot)
    }

    fn set_state(&mut self, slot: SlotTime, state: SlotState) {
        if let Some(entry) = self.entries.iter_mut().find(|entry| entry.slot == slot) {
            entry.state = state;
        }
    }
}

#[cfg(test)]
#[path = "tests/slots_tests.rs"]
mod tests;
