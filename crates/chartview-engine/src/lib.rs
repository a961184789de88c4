//! Chartview Engine - Chart loading and rendering
//!
//! This crate provides the renderer the caches sit in front of:
//! - `ChartRenderer`: the narrow interface the service consumes
//! - `HelmRenderer`: downloads charts from their repository and renders
//!   them with the `helm` binary in client-only dry-run mode

pub mod error;
pub mod helm;
pub mod renderer;

pub use error::{EngineError, Result};
pub use helm::{DEFAULT_HELM_BINARY, HelmRenderer, HelmRendererBuilder};
pub use renderer::ChartRenderer;
