//! Core data types for the Heska narrative agent.

pub mod chain;
pub mod market;
pub mod sector;

pub use chain::*;
pub use market::*;
pub use sector::*;
