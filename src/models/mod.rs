//! Core data models for the league client.

mod race;
mod result;
mod standing;

pub use race::*;
pub use result::*;
pub use standing::*;
