use crate::domain::model::{SlotStatus, Vehicle};
use crate::utils::error::{ParkingError, Result};

/// Fixed set of slots numbered `1..=capacity`, each empty or holding one vehicle.
#[derive(Debug, Clone)]
pub struct SlotPool {
    slots: Vec<Option<Vehicle>>,
}

impl SlotPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn occupied_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Puts the vehicle in the lowest-numbered free slot.
    pub fn allocate(&mut self, vehicle: Vehicle) -> Result<usize> {
        let index = self
            .slots
            .iter()
            .position(Option::is_none)
            .ok_or(ParkingError::LotFull {
                capacity: self.capacity(),
            })?;
        self.slots[index] = Some(vehicle);
        Ok(index + 1)
    }

    /// Puts the vehicle in a specific slot. Used when rehydrating from the
    /// store and when rolling back a release.
    pub fn occupy(&mut self, slot: usize, vehicle: Vehicle) -> Result<()> {
        let capacity = self.capacity();
        match self.slot_mut(slot) {
            Some(entry) if entry.is_none() => {
                *entry = Some(vehicle);
                Ok(())
            }
            _ => Err(ParkingError::InvalidSlot { slot, capacity }),
        }
    }

    /// Empties the slot and hands back its vehicle.
    pub fn release(&mut self, slot: usize) -> Result<Vehicle> {
        let capacity = self.capacity();
        self.slot_mut(slot)
            .and_then(Option::take)
            .ok_or(ParkingError::InvalidSlot { slot, capacity })
    }

    pub fn occupant(&self, slot: usize) -> Option<&Vehicle> {
        slot.checked_sub(1)
            .and_then(|index| self.slots.get(index))
            .and_then(Option::as_ref)
    }

    pub fn status(&self) -> Vec<SlotStatus> {
        self.slots
            .iter()
            .enumerate()
            .map(|(index, occupant)| SlotStatus {
                number: index + 1,
                occupant: occupant.clone(),
            })
            .collect()
    }

    fn slot_mut(&mut self, slot: usize) -> Option<&mut Option<Vehicle>> {
        slot.checked_sub(1).and_then(|index| self.slots.get_mut(index))
    }
}
