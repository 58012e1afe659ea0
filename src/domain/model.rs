use serde::{Deserialize, Serialize};
use std::fmt;

/// A vehicle is identified by its license plate; the type is free-form
/// ("Car", "Bike", "Truck", ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Vehicle {
    pub license: String,
    #[serde(rename = "type")]
    pub vehicle_type: String,
}

impl Vehicle {
    pub fn new(license: impl Into<String>, vehicle_type: impl Into<String>) -> Self {
        Self {
            license: license.into(),
            vehicle_type: vehicle_type.into(),
        }
    }
}

impl fmt::Display for Vehicle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "License: {}, Type: {}", self.license, self.vehicle_type)
    }
}

/// One vehicle's stay. `entry_time` is epoch seconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub vehicle: Vehicle,
    pub slot: usize,
    pub entry_time: i64,
}

/// On-disk row of the record store: `license,type,slot,time`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreRecord {
    pub license: String,
    #[serde(rename = "type")]
    pub vehicle_type: String,
    pub slot: usize,
    pub time: i64,
}

impl From<&Session> for StoreRecord {
    fn from(session: &Session) -> Self {
        Self {
            license: session.vehicle.license.clone(),
            vehicle_type: session.vehicle.vehicle_type.clone(),
            slot: session.slot,
            time: session.entry_time,
        }
    }
}

impl From<StoreRecord> for Session {
    fn from(record: StoreRecord) -> Self {
        Self {
            vehicle: Vehicle::new(record.license, record.vehicle_type),
            slot: record.slot,
            entry_time: record.time,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotStatus {
    pub number: usize,
    pub occupant: Option<Vehicle>,
}

impl SlotStatus {
    pub fn is_empty(&self) -> bool {
        self.occupant.is_none()
    }
}

impl fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.occupant {
            Some(vehicle) => write!(f, "Slot {}: {}", self.number, vehicle),
            None => write!(f, "Slot {}: Empty", self.number),
        }
    }
}

/// What the caller gets back when a vehicle leaves.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemovalReceipt {
    pub license: String,
    pub vehicle_type: String,
    pub slot: usize,
    pub hours: f64,
    pub fee: u64,
}
