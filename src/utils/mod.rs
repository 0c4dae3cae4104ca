//! Utility modules: persistence and logging.

pub mod logging;
pub mod persistence;

pub use persistence::{JsonStore, StoreError};
