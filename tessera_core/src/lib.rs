//! Geometric-free core types: bounds, grids, CRS identity, tiles and tile
//! pyramids, plus the ambient error taxonomy, retry policy and concurrency
//! tuning shared by every other `tessera_*` crate.

pub mod concurrency;
pub mod error;
pub mod retry;
pub mod types;

pub use concurrency::ConcurrencyLimits;
pub use error::EngineError;
pub use retry::RetryPolicy;
pub use types::*;
