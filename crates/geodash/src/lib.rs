//! `geodash` - A synthetic geo-project dashboard
//!
//! This library generates mock geospatial project records, serves them from a
//! single HTTP endpoint, and provides the client-side model for browsing them:
//! debounced global filtering, column sorting, paging, and a selection that is
//! shared between the table and the map.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod dashboard;
pub mod debounce;
pub mod dump;
pub mod error;
pub mod export;
pub mod generator;
pub mod geo;
pub mod logging;
pub mod map;
pub mod project;
pub mod query;
pub mod selection;
pub mod server;
pub mod source;
pub mod store;
pub mod table;

pub use config::Config;
pub use dashboard::{Dashboard, DashboardStats};
pub use error::{Error, Result};
pub use generator::{GeneratorProfile, GeneratorSettings, ProjectGenerator};
pub use geo::{BoundingBox, LatLng};
pub use logging::init_logging;
pub use project::{Project, ProjectId, ProjectStatus};
pub use query::{SortDirection, SortField, SortItem, SortModel};
pub use selection::SelectionSync;
pub use server::ServerState;
pub use source::{DumpSource, GeneratorSource, HttpSource, ProjectSource};
pub use store::{GeoData, LoadState};
