//! CSV export loading for cursorstat
//!
//! This crate reads a usage export from disk, validates it against the
//! schema in `cursorstat-core` and turns each row into a typed
//! [`UsageRecord`](cursorstat_core::UsageRecord).

pub mod data_loader;

pub use data_loader::{DataLoader, Dataset, records_from_table};
