//! Scoring and travel policy, plus the run settings for the CLI.
//!
//! The numeric policy lives in named constants; `ScoringPolicy` and
//! `TravelPolicy` default to them and can be overridden from the JSON
//! settings file without touching the aggregation code.
use crate::error::LoadError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Weight of each 2025 audit in the coverage score.
pub const VOLUME_WEIGHT: f64 = 0.8;
/// Bonus per auditor active in the department in 2025.
pub const DIVERSITY_BONUS: f64 = 4.0;
/// Flat bonus when at least one auditor is based in the department.
pub const HOME_BASE_BONUS: f64 = 15.0;

pub const EXCELLENT_THRESHOLD: f64 = 35.0;
pub const GOOD_THRESHOLD: f64 = 18.0;
pub const AVERAGE_THRESHOLD: f64 = 8.0;

/// Road distance / great-circle distance ratio.
pub const CIRCUITY_FACTOR: f64 = 1.3;
/// First/last mile not captured by centroid-to-centroid distance.
pub const ACCESS_DISTANCE_KM: f64 = 10.0;
pub const AVERAGE_SPEED_KMH: f64 = 75.0;
/// Mileage reimbursement, EUR per km.
pub const MILEAGE_RATE_EUR: f64 = 0.42;
pub const LOCAL_TRIP_KM: u32 = 25;
pub const LOCAL_TRIP_MINUTES: u32 = 30;
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Mainland departments plus Corsica, as counted by the dashboard.
pub const DEPARTMENT_UNIVERSE: usize = 95;
pub const TOP_DEPARTMENTS: usize = 6;
/// Residence assumed for auditors missing from the roster.
pub const DEFAULT_RESIDENCE: &str = "75";
/// Score at which the top-departments gauge is full.
pub const SCORE_GAUGE_MAX: f64 = 50.0;

pub const CONFIG_ENV: &str = "COVERAGE_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "coverage.json";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScoringPolicy {
    pub volume_weight: f64,
    pub diversity_bonus: f64,
    pub home_base_bonus: f64,
    pub excellent_threshold: f64,
    pub good_threshold: f64,
    pub average_threshold: f64,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            volume_weight: VOLUME_WEIGHT,
            diversity_bonus: DIVERSITY_BONUS,
            home_base_bonus: HOME_BASE_BONUS,
            excellent_threshold: EXCELLENT_THRESHOLD,
            good_threshold: GOOD_THRESHOLD,
            average_threshold: AVERAGE_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TravelPolicy {
    pub circuity_factor: f64,
    pub access_distance_km: f64,
    pub average_speed_kmh: f64,
    pub mileage_rate_eur: f64,
    pub local_trip_km: u32,
    pub local_trip_minutes: u32,
    pub earth_radius_km: f64,
}

impl Default for TravelPolicy {
    fn default() -> Self {
        Self {
            circuity_factor: CIRCUITY_FACTOR,
            access_distance_km: ACCESS_DISTANCE_KM,
            average_speed_kmh: AVERAGE_SPEED_KMH,
            mileage_rate_eur: MILEAGE_RATE_EUR,
            local_trip_km: LOCAL_TRIP_KM,
            local_trip_minutes: LOCAL_TRIP_MINUTES,
            earth_radius_km: EARTH_RADIUS_KM,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub entries_path: PathBuf,
    pub roster_path: PathBuf,
    /// When unset, the built-in French centroid table is used.
    pub centroids_path: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub universe_size: usize,
    pub top_departments: usize,
    pub default_residence: String,
    pub scoring: ScoringPolicy,
    pub travel: TravelPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            entries_path: PathBuf::from("data/audit_entries.csv"),
            roster_path: PathBuf::from("data/auditors.csv"),
            centroids_path: None,
            output_dir: PathBuf::from("."),
            universe_size: DEPARTMENT_UNIVERSE,
            top_departments: TOP_DEPARTMENTS,
            default_residence: DEFAULT_RESIDENCE.to_string(),
            scoring: ScoringPolicy::default(),
            travel: TravelPolicy::default(),
        }
    }
}

impl Settings {
    /// Read settings from a JSON file. A missing file yields the defaults;
    /// an unreadable or invalid one is an error.
    pub fn load(path: &Path) -> Result<Settings, LoadError> {
        if !path.exists() {
            debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(Settings::default());
        }
        let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let settings: Settings =
            serde_json::from_str(&text).map_err(|source| LoadError::Config {
                path: path.display().to_string(),
                source,
            })?;
        info!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// Load from `$COVERAGE_CONFIG`, falling back to `coverage.json`.
    pub fn from_env() -> Result<Settings, LoadError> {
        let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Settings::load(Path::new(&path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let s = Settings::load(&dir.path().join("absent.json")).unwrap();
        assert_eq!(s, Settings::default());
        assert_eq!(s.universe_size, 95);
        assert_eq!(s.scoring.home_base_bonus, 15.0);
    }

    #[test]
    fn partial_file_overrides_only_given_fields() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(
            f,
            r#"{{"universe_size": 101, "scoring": {{"good_threshold": 20.0}}, "travel": {{"mileage_rate_eur": 0.5}}}}"#
        )
        .unwrap();
        let s = Settings::load(f.path()).unwrap();
        assert_eq!(s.universe_size, 101);
        assert_eq!(s.scoring.good_threshold, 20.0);
        assert_eq!(s.scoring.excellent_threshold, EXCELLENT_THRESHOLD);
        assert_eq!(s.travel.mileage_rate_eur, 0.5);
        assert_eq!(s.travel.average_speed_kmh, AVERAGE_SPEED_KMH);
        assert_eq!(s.default_residence, "75");
    }

    #[test]
    fn invalid_json_is_an_error() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, "{{ not json").unwrap();
        assert!(matches!(
            Settings::load(f.path()),
            Err(LoadError::Config { .. })
        ));
    }
}
