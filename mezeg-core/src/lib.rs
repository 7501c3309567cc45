//! Core library for the `mezeg` weather lookup.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The locality catalog and current-conditions clients
//! - Durable search history
//! - Shared domain models
//!
//! It is used by `mezeg-tui`, but can also be reused by other binaries or services.

pub mod catalog;
pub mod config;
pub mod error;
pub mod history;
pub mod model;
pub mod text;
pub mod weather;

pub use catalog::CityCatalog;
pub use config::Config;
pub use error::Error;
pub use history::HistoryStore;
pub use model::{HistoryRecord, Locality, WeatherReading};
pub use weather::{WeatherClient, WeatherSource};
