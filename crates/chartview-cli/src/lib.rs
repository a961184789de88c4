//! Chartview - chart catalog and render cache server
//!
//! The `chartview` binary wires settings, the key-value store and the helm
//! renderer into a [`ChartService`], then either serves it over HTTP or
//! seeds every cache up front.
//!
//! [`ChartService`]: chartview_service::ChartService

pub mod commands;
pub mod config;
pub mod error;
pub mod exit_codes;
pub mod logging;
pub mod server;

pub use config::{Settings, SettingsArgs, StoreKind};
pub use error::{CliError, Result};
