pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};
pub use config::toml_config::LotConfig;

pub use adapters::{CsvRecordStore, PendingReplace};
pub use core::clock::{ManualClock, SystemClock};
pub use core::engine::ParkingEngine;
pub use core::fee::{calculate_fee, FeeSchedule};
pub use core::slot_pool::SlotPool;
pub use domain::model::{RemovalReceipt, Session, SlotStatus, Vehicle};
pub use domain::ports::{Clock, RecordStore};
pub use utils::error::{ParkingError, Result};
