//! # catpoint-domain
//!
//! Pure domain model for the catpoint home-security system.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers and error conventions
//! - Define **Sensors** (named door/window/motion devices with an active flag)
//! - Define **Arming** and **Alarm** statuses (the alarm status is an escalation ladder)
//! - Define **Images** handed to the cat-detection collaborator
//! - Define **Events** (status-change records broadcast to observers)
//! - Own the **alarm state machine**: every rule mapping sensor, arming, and
//!   camera events to alarm-status transitions
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;

pub mod alarm;
pub mod event;
pub mod image;
pub mod sensor;
pub mod status;
