//! # FlyByWire Library
//!
//! Controller input configuration for a flight-simulation game: which
//! controllers are active, how their buttons and axes map to game actions,
//! how analog input is shaped, and how all of it is saved and restored.
//!
//! - [`controller`]: controller identities, live adapters and calibration
//! - [`preset`]: named input-to-action bindings
//! - [`registry`]: active configurations and their persistence

pub mod config;
pub mod controller;
pub mod error;
pub mod preset;
pub mod registry;
