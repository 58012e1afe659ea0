use crate::domain::model::Session;
use crate::utils::error::Result;

/// Durable persistence of the active-session set.
pub trait RecordStore {
    /// Every stored session, in file order.
    fn load_all(&self) -> Result<Vec<Session>>;

    /// Replace the stored set with exactly `sessions`.
    fn save_all(&self, sessions: &[Session]) -> Result<()>;

    /// Drop the record for `license`, leaving the previous file intact on failure.
    fn delete_by_key(&self, license: &str) -> Result<()>;
}

/// Wall-clock source in epoch seconds.
pub trait Clock {
    fn now(&self) -> i64;
}
