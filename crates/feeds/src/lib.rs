//! Data source clients for the Heska agent.
//!
//! ## Architecture
//!
//! - `source` - One capability trait per external source (narratives, trends, launches)
//! - `rest` - reqwest-backed implementations of those traits
//! - `error` - `FeedError`, shared by every source

pub mod error;
pub mod rest;
pub mod source;

pub use error::*;
pub use rest::{LunarCrushClient, SharpeClient, XScanrClient, REQUEST_TIMEOUT};
pub use source::{LaunchSource, NarrativeSource, TrendSource};
