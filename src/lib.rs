//! streamvista library
//!
//! Video catalog store and playback controller for a streaming front end.

pub mod core;
pub mod error;
pub mod storage;
pub mod types;
pub mod utils;

pub use crate::core::catalog::CatalogStore;
pub use crate::core::player::{PlaybackController, PlayerOptions};
pub use crate::error::{Result, StreamVistaError};
