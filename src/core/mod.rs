pub mod clock;
pub mod engine;
pub mod fee;
pub mod slot_pool;

pub use crate::domain::model::{RemovalReceipt, Session, SlotStatus, Vehicle};
pub use crate::domain::ports::{Clock, RecordStore};
pub use crate::utils::error::Result;
