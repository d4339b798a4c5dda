//! # Chargeboard - live EV charger availability board
//!
//! Polls a charging-network status endpoint for a configured set of
//! locations and keeps a kiosk display showing which plugs are available,
//! preparing, charging, finishing or offline.
//!
//! ## Architecture
//!
//! - `config`: YAML configuration, defaults and validation
//! - `logging`: structured logging and tracing
//! - `model`: locations, groups and charger records
//! - `status`: raw status to display state, payment links
//! - `fetch`: concurrent per-location fetch and merge
//! - `render`: board view model and display surfaces
//! - `refresh`: single-flight refresh cycle and scale-to-fit
//! - `web`: HTTP server for the kiosk page and its API

pub mod config;
pub mod error;
pub mod fetch;
pub mod logging;
pub mod model;
pub mod refresh;
pub mod render;
pub mod status;
pub mod web;


// Re-export commonly used types
pub use config::Config;
pub use error::{ChargeboardError, Result};
