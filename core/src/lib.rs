//! Calorie and deficit tracking: food entries, a daily goal, BMR/TDEE
//! estimates and rolling daily totals, persisted to a key-value store.

pub mod csv_export;
pub mod db;
pub mod energy;
pub mod error;
pub mod kv;
pub mod models;
pub mod store;

pub use error::{Result, TrackerError};
pub use kv::{KeyValueStore, MemoryStore};
pub use store::EntryStore;
