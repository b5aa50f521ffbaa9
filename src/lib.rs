//! # Kart League
//!
//! Championship standings and race results for a go-kart league.
//!
//! ## Architecture
//!
//! - **models**: Result rows, races and standings types
//! - **calculate**: Points table and standings aggregation
//! - **results**: Per-race grouping, race filter and the results view lifecycle
//! - **fetch**: HTTP client for the league API
//! - **session**: Signed-in user context and route guards
//! - **schedule**: Upcoming/past race calendar
//! - **render**: Terminal output
//! - **api**: REST API serving the derived views
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod config;
pub mod dates;
pub mod fetch;
pub mod models;
pub mod render;
pub mod results;
pub mod schedule;
pub mod session;

pub use models::*;
