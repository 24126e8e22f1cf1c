//! Audit coverage analysis for French departments.
//!
//! [`aggregator::aggregate`] turns a flat list of audit entries into one
//! [`types::DepartmentStats`] per department, with a coverage score and
//! level. [`travel::TravelEstimator`] estimates distance, duration and
//! mileage cost between two departments. The [`reports`] module composes
//! both into the tables written by the command-line tool.
pub mod aggregator;
pub mod config;
pub mod error;
pub mod geo;
pub mod loader;
pub mod output;
pub mod reports;
pub mod travel;
pub mod types;
pub mod util;

pub use aggregator::aggregate;
pub use config::{ScoringPolicy, Settings, TravelPolicy};
pub use error::{LoadError, ValidationError};
pub use geo::{Centroid, CentroidTable};
pub use travel::{format_duration, TravelEstimator};
pub use types::{AuditEntry, CoverageLevel, DepartmentStats, TravelInfo};
