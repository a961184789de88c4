//! Chartview Repo - Chart repository access
//!
//! Chart repositories are plain HTTP servers publishing an `index.yaml`
//! document and gzipped chart archives. This crate provides:
//! - `RepositoryIndex`: the parsed index document
//! - `IndexClient`: fetching indexes and downloading verified archives
//! - `ChartArchive`: reading values and templates out of an archive in memory

pub mod archive;
pub mod error;
pub mod http;
pub mod index;

pub use archive::ChartArchive;
pub use error::{RepoError, Result};
pub use http::{DEFAULT_TIMEOUT, IndexClient};
pub use index::{ChartEntry, RepositoryIndex};
