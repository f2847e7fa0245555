//! # catpoint-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `SecurityRepository`: sensors, arming status, alarm status
//!   - `ImageAnalysis`: decide whether a camera frame shows a cat
//!   - `StatusListener`: observers told about every status change
//! - Define the **driving/inbound port** `SecurityService`, the only entry
//!   point for sensor management, arming, and image submission
//! - Provide **in-process infrastructure** (event bus) that doesn't need IO
//! - Load the service configuration
//!
//! ## Dependency rule
//! Depends on `catpoint-domain` only (plus `tokio::sync` for locks and channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod config;
pub mod event_bus;
pub mod ports;
pub mod services;
