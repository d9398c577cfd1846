//! Test fixtures for inspection-router.
//!
//! Provides realistic test data including:
//! - Real Copenhagen area locations (from OpenStreetMap)
//! - Builders for worker and task records plus in-memory directories

pub mod copenhagen_locations;
pub mod directories;

pub use copenhagen_locations::*;
pub use directories::*;
