//! HTTP client for the HC2 controller REST API.
//!
//! Provides the connection config file, typed JSON models for rooms,
//! devices, variables and settings, and [`Hc2Client`], which also serves
//! as the [`hc2_core::SceneStore`] used for scene uploads.

pub mod api;
pub mod config;
pub mod models;

pub use api::{Hc2ApiError, Hc2Client};
pub use config::{ConfigError, Hc2Config};
