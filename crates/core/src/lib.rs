//! Core types and shared functionality for dealscout.
//!
//! This crate provides:
//! - The offer model shared by adapters, aggregation and sinks
//! - Price text normalization and best-deal selection
//! - CSV result sink
//! - Unified error types
//! - Configuration structures

pub mod config;
pub mod error;
pub mod normalize;
pub mod offer;
pub mod select;
pub mod sink;

pub use config::{AppConfig, ConfigError};
pub use error::Error;
pub use normalize::normalize_price;
pub use offer::{BestDeal, NOT_AVAILABLE, NormalizedOffer, OfferTable, RawOffer, SearchReport, Site};
pub use select::select_best_deal;
