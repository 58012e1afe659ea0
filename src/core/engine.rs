use crate::core::clock::SystemClock;
use crate::core::fee::{seconds_to_hours, FeeSchedule};
use crate::core::slot_pool::SlotPool;
use crate::domain::model::{RemovalReceipt, Session, SlotStatus, Vehicle};
use crate::domain::ports::{Clock, RecordStore};
use crate::utils::error::{ParkingError, Result};
use crate::utils::validation::validate_store_field;
use std::collections::HashMap;

/// Owns the slot pool and the session index, and keeps the record store in
/// step with them. Every mutation either fully applies (pool, index and
/// store) or leaves the in-memory state as it was.
pub struct ParkingEngine<S: RecordStore, C: Clock = SystemClock> {
    pool: SlotPool,
    sessions: HashMap<String, Session>,
    store: S,
    clock: C,
    schedule: FeeSchedule,
}

impl<S: RecordStore> ParkingEngine<S, SystemClock> {
    pub fn new(capacity: usize, store: S) -> Result<Self> {
        Self::with_options(capacity, store, FeeSchedule::default(), SystemClock)
    }
}

impl<S: RecordStore, C: Clock> ParkingEngine<S, C> {
    /// Builds the pool and replays every stored session into its recorded slot.
    pub fn with_options(
        capacity: usize,
        store: S,
        schedule: FeeSchedule,
        clock: C,
    ) -> Result<Self> {
        let mut engine = Self {
            pool: SlotPool::new(capacity),
            sessions: HashMap::new(),
            store,
            clock,
            schedule,
        };
        engine.rehydrate()?;
        Ok(engine)
    }

    fn rehydrate(&mut self) -> Result<()> {
        let stored = self.store.load_all()?;

        for session in stored {
            validate_store_field("license", &session.vehicle.license)
                .and_then(|_| validate_store_field("type", &session.vehicle.vehicle_type))
                .map_err(|e| ParkingError::CorruptStore {
                    message: format!("record in slot {}: {}", session.slot, e),
                })?;

            let license = session.vehicle.license.clone();
            if self.sessions.contains_key(&license) {
                return Err(ParkingError::CorruptStore {
                    message: format!("license {} appears more than once", license),
                });
            }
            if session.slot == 0 || session.slot > self.pool.capacity() {
                return Err(ParkingError::CorruptStore {
                    message: format!(
                        "license {} is recorded in slot {} but the lot has {} slots",
                        license,
                        session.slot,
                        self.pool.capacity()
                    ),
                });
            }
            if let Some(other) = self.pool.occupant(session.slot) {
                return Err(ParkingError::CorruptStore {
                    message: format!(
                        "slot {} is recorded for both {} and {}",
                        session.slot, other.license, license
                    ),
                });
            }

            self.pool.occupy(session.slot, session.vehicle.clone())?;
            self.sessions.insert(license, session);
        }

        tracing::info!(
            "Restored {} parked vehicle(s) into {} slots",
            self.sessions.len(),
            self.pool.capacity()
        );
        Ok(())
    }

    /// Parks the vehicle in the lowest free slot and returns its number.
    pub fn park(&mut self, vehicle: Vehicle) -> Result<usize> {
        validate_store_field("license", &vehicle.license)?;
        validate_store_field("type", &vehicle.vehicle_type)?;

        if self.sessions.contains_key(&vehicle.license) {
            return Err(ParkingError::AlreadyParked {
                license: vehicle.license,
            });
        }

        let slot = self.pool.allocate(vehicle.clone())?;
        let license = vehicle.license.clone();
        self.sessions.insert(
            license.clone(),
            Session {
                vehicle,
                slot,
                entry_time: self.clock.now(),
            },
        );

        let snapshot = self.sessions_by_slot();
        if let Err(e) = self.store.save_all(&snapshot) {
            tracing::warn!("Persisting park of {} failed, rolling back: {}", license, e);
            self.sessions.remove(&license);
            self.pool.release(slot)?;
            return Err(e);
        }

        tracing::info!("Vehicle {} parked in slot {}", license, slot);
        Ok(slot)
    }

    /// Removes the vehicle and bills its stay.
    pub fn remove(&mut self, license: &str) -> Result<RemovalReceipt> {
        let session = self
            .sessions
            .remove(license)
            .ok_or_else(|| ParkingError::NotParked {
                license: license.to_string(),
            })?;

        let hours = seconds_to_hours(self.clock.now().saturating_sub(session.entry_time));
        let fee = self.schedule.fee_for(hours);

        let vehicle = match self.pool.release(session.slot) {
            Ok(vehicle) => vehicle,
            Err(e) => {
                self.sessions.insert(license.to_string(), session);
                return Err(e);
            }
        };

        if let Err(e) = self.store.delete_by_key(license) {
            tracing::warn!("Persisting removal of {} failed, rolling back: {}", license, e);
            self.pool.occupy(session.slot, vehicle)?;
            self.sessions.insert(license.to_string(), session);
            return Err(e);
        }

        tracing::info!(
            "Vehicle {} removed from slot {} after {:.2}h, fee {}",
            license,
            session.slot,
            hours,
            fee
        );

        Ok(RemovalReceipt {
            license: session.vehicle.license,
            vehicle_type: session.vehicle.vehicle_type,
            slot: session.slot,
            hours,
            fee,
        })
    }

    pub fn status(&self) -> Vec<SlotStatus> {
        self.pool.status()
    }

    pub fn session(&self, license: &str) -> Option<&Session> {
        self.sessions.get(license)
    }

    /// Active sessions ordered by slot number.
    pub fn sessions_by_slot(&self) -> Vec<Session> {
        let mut sessions: Vec<Session> = self.sessions.values().cloned().collect();
        sessions.sort_by_key(|s| s.slot);
        sessions
    }

    pub fn capacity(&self) -> usize {
        self.pool.capacity()
    }

    pub fn occupied(&self) -> usize {
        self.sessions.len()
    }

    pub fn available(&self) -> usize {
        self.capacity().saturating_sub(self.occupied())
    }

    pub fn fee_schedule(&self) -> FeeSchedule {
        self.schedule
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::ManualClock;
    use std::cell::{Cell, RefCell};

    /// In-memory store that can be told to fail its next write.
    #[derive(Default)]
    struct MemoryStore {
        rows: RefCell<Vec<Session>>,
        fail_writes: Cell<bool>,
    }

    impl MemoryStore {
        fn with_rows(rows: Vec<Session>) -> Self {
            Self {
                rows: RefCell::new(rows),
                fail_writes: Cell::new(false),
            }
        }

        fn licenses(&self) -> Vec<String> {
            self.rows
                .borrow()
                .iter()
                .map(|s| s.vehicle.license.clone())
                .collect()
        }

        fn check_writable(&self) -> Result<()> {
            if self.fail_writes.get() {
                return Err(ParkingError::Io(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    "disk full",
                )));
            }
            Ok(())
        }
    }

    impl RecordStore for MemoryStore {
        fn load_all(&self) -> Result<Vec<Session>> {
            Ok(self.rows.borrow().clone())
        }

        fn save_all(&self, sessions: &[Session]) -> Result<()> {
            self.check_writable()?;
            *self.rows.borrow_mut() = sessions.to_vec();
            Ok(())
        }

        fn delete_by_key(&self, license: &str) -> Result<()> {
            self.check_writable()?;
            self.rows.borrow_mut().retain(|s| s.vehicle.license != license);
            Ok(())
        }
    }

    const START: i64 = 1_718_000_000;

    fn engine(capacity: usize) -> (ParkingEngine<MemoryStore, ManualClock>, ManualClock) {
        engine_with(capacity, MemoryStore::default())
    }

    fn engine_with(
        capacity: usize,
        store: MemoryStore,
    ) -> (ParkingEngine<MemoryStore, ManualClock>, ManualClock) {
        let clock = ManualClock::new(START);
        let engine =
            ParkingEngine::with_options(capacity, store, FeeSchedule::default(), clock.clone())
                .unwrap();
        (engine, clock)
    }

    fn stored(license: &str, slot: usize) -> Session {
        Session {
            vehicle: Vehicle::new(license, "Car"),
            slot,
            entry_time: START,
        }
    }

    #[test]
    fn test_capacity_scenario() {
        let (mut engine, clock) = engine(2);

        assert_eq!(engine.park(Vehicle::new("A", "Car")).unwrap(), 1);
        assert_eq!(engine.park(Vehicle::new("B", "Bike")).unwrap(), 2);
        assert!(matches!(
            engine.park(Vehicle::new("C", "Truck")),
            Err(ParkingError::LotFull { capacity: 2 })
        ));

        clock.advance(2 * 3600);
        let receipt = engine.remove("A").unwrap();
        assert_eq!(receipt.hours, 2.0);
        assert_eq!(receipt.fee, 20);
        assert_eq!(receipt.slot, 1);

        assert_eq!(engine.park(Vehicle::new("C", "Truck")).unwrap(), 1);
    }

    #[test]
    fn test_park_twice_is_rejected_without_moving() {
        let (mut engine, _) = engine(3);
        engine.park(Vehicle::new("A", "Car")).unwrap();

        let err = engine.park(Vehicle::new("A", "Truck")).unwrap_err();
        assert!(matches!(err, ParkingError::AlreadyParked { .. }));
        assert_eq!(engine.occupied(), 1);
        assert_eq!(engine.session("A").unwrap().slot, 1);
        assert_eq!(engine.session("A").unwrap().vehicle.vehicle_type, "Car");
    }

    #[test]
    fn test_park_records_entry_time_and_persists() {
        let (mut engine, _) = engine(3);
        engine.park(Vehicle::new("A", "Car")).unwrap();
        engine.park(Vehicle::new("B", "Bike")).unwrap();

        assert_eq!(engine.session("A").unwrap().entry_time, START);
        assert_eq!(engine.store().licenses(), vec!["A", "B"]);
    }

    #[test]
    fn test_remove_unknown_license() {
        let (mut engine, _) = engine(1);
        assert!(matches!(
            engine.remove("ZZZ"),
            Err(ParkingError::NotParked { .. })
        ));
    }

    #[test]
    fn test_reparking_after_removal_uses_first_free_slot() {
        let (mut engine, _) = engine(3);
        engine.park(Vehicle::new("A", "Car")).unwrap();
        engine.park(Vehicle::new("B", "Car")).unwrap();
        engine.park(Vehicle::new("C", "Car")).unwrap();

        engine.remove("A").unwrap();
        engine.remove("C").unwrap();

        assert_eq!(engine.park(Vehicle::new("C", "Car")).unwrap(), 1);
        assert_eq!(engine.park(Vehicle::new("A", "Car")).unwrap(), 3);
    }

    #[test]
    fn test_short_and_skewed_stays_bill_base_fee() {
        let (mut engine, clock) = engine(2);
        engine.park(Vehicle::new("A", "Car")).unwrap();
        clock.advance(60);
        assert_eq!(engine.remove("A").unwrap().fee, 20);

        engine.park(Vehicle::new("B", "Car")).unwrap();
        clock.advance(-600);
        let receipt = engine.remove("B").unwrap();
        assert!(receipt.hours < 0.0);
        assert_eq!(receipt.fee, 20);
    }

    #[test]
    fn test_long_stay_is_metered() {
        let (mut engine, clock) = engine(1);
        engine.park(Vehicle::new("A", "Car")).unwrap();
        clock.advance(2 * 3600 + 1);
        assert_eq!(engine.remove("A").unwrap().fee, 30);
    }

    #[test]
    fn test_invalid_vehicle_rejected_before_mutation() {
        let (mut engine, _) = engine(2);
        assert!(matches!(
            engine.park(Vehicle::new("", "Car")),
            Err(ParkingError::InvalidVehicle { .. })
        ));
        assert!(matches!(
            engine.park(Vehicle::new("A,B", "Car")),
            Err(ParkingError::InvalidVehicle { .. })
        ));
        assert_eq!(engine.occupied(), 0);
        assert!(engine.store().licenses().is_empty());
    }

    #[test]
    fn test_failed_park_persist_rolls_back() {
        let (mut engine, _) = engine(2);
        engine.park(Vehicle::new("A", "Car")).unwrap();
        let before = engine.status();

        engine.store().fail_writes.set(true);
        let err = engine.park(Vehicle::new("B", "Car")).unwrap_err();
        assert!(matches!(err, ParkingError::Io(_)));

        assert_eq!(engine.status(), before);
        assert!(engine.session("B").is_none());
        assert_eq!(engine.store().licenses(), vec!["A"]);

        engine.store().fail_writes.set(false);
        assert_eq!(engine.park(Vehicle::new("B", "Car")).unwrap(), 2);
    }

    #[test]
    fn test_failed_remove_persist_rolls_back() {
        let (mut engine, _) = engine(2);
        engine.park(Vehicle::new("A", "Car")).unwrap();
        let before = engine.status();

        engine.store().fail_writes.set(true);
        assert!(engine.remove("A").is_err());

        assert_eq!(engine.status(), before);
        assert_eq!(engine.session("A").unwrap().slot, 1);
        assert_eq!(engine.store().licenses(), vec!["A"]);
    }

    #[test]
    fn test_rehydrate_uses_recorded_slots() {
        let store = MemoryStore::with_rows(vec![stored("X", 3), stored("Y", 1)]);
        let (mut engine, _) = engine_with(4, store);

        assert_eq!(engine.occupied(), 2);
        assert_eq!(engine.available(), 2);
        let status = engine.status();
        assert_eq!(status[0].occupant.as_ref().unwrap().license, "Y");
        assert!(status[1].is_empty());
        assert_eq!(status[2].occupant.as_ref().unwrap().license, "X");

        assert_eq!(engine.park(Vehicle::new("Z", "Bike")).unwrap(), 2);
    }

    #[test]
    fn test_rehydrate_rejects_out_of_range_slot() {
        for slot in [0, 3] {
            let store = MemoryStore::with_rows(vec![stored("X", slot)]);
            let result = ParkingEngine::with_options(
                2,
                store,
                FeeSchedule::default(),
                ManualClock::new(START),
            );
            assert!(matches!(result, Err(ParkingError::CorruptStore { .. })));
        }
    }

    #[test]
    fn test_rehydrate_rejects_blank_license() {
        let store = MemoryStore::with_rows(vec![stored("", 1)]);
        assert!(matches!(
            ParkingEngine::with_options(2, store, FeeSchedule::default(), ManualClock::new(0)),
            Err(ParkingError::CorruptStore { .. })
        ));
    }

    #[test]
    fn test_extreme_entry_time_bills_without_overflow() {
        let mut ancient = stored("OLD", 1);
        ancient.entry_time = i64::MIN;
        let mut future = stored("NEW", 2);
        future.entry_time = i64::MAX;
        let (mut engine, _) = engine_with(2, MemoryStore::with_rows(vec![ancient, future]));

        let old = engine.remove("OLD").unwrap();
        assert!(old.hours > 1.0e15);
        assert_eq!(old.fee, FeeSchedule::default().fee_for(old.hours));
        assert!(old.fee > 20);

        let new = engine.remove("NEW").unwrap();
        assert!(new.hours < 0.0);
        assert_eq!(new.fee, 20);
    }

    #[test]
    fn test_rehydrate_rejects_slot_collision_and_duplicate_license() {
        let collision = MemoryStore::with_rows(vec![stored("X", 1), stored("Y", 1)]);
        assert!(matches!(
            ParkingEngine::with_options(2, collision, FeeSchedule::default(), ManualClock::new(0)),
            Err(ParkingError::CorruptStore { .. })
        ));

        let duplicate = MemoryStore::with_rows(vec![stored("X", 1), stored("X", 2)]);
        assert!(matches!(
            ParkingEngine::with_options(2, duplicate, FeeSchedule::default(), ManualClock::new(0)),
            Err(ParkingError::CorruptStore { .. })
        ));
    }

    #[test]
    fn test_sessions_by_slot_and_occupancy_stay_in_step() {
        let (mut engine, _) = engine(4);
        for license in ["A", "B", "C"] {
            engine.park(Vehicle::new(license, "Car")).unwrap();
        }
        engine.remove("B").unwrap();

        let slots: Vec<usize> = engine.sessions_by_slot().iter().map(|s| s.slot).collect();
        let occupied: Vec<usize> = engine
            .status()
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| s.number)
            .collect();
        assert_eq!(slots, occupied);
        assert_eq!(slots, vec![1, 3]);
    }
}
