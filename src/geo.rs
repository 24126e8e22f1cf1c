//! Department centroids and great-circle distance.
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Centroid {
    pub lat: f64,
    pub lon: f64,
}

/// Approximate centroids (lat, lon) of French departments. "20" stands for
/// Corsica as a whole, which is where `20xxx` postal codes resolve to.
const FRANCE_CENTROIDS: &[(&str, f64, f64)] = &[
    ("01", 46.10, 5.24), ("02", 49.56, 3.62), ("03", 46.34, 3.33), ("04", 44.09, 6.24),
    ("05", 44.56, 6.08), ("06", 43.70, 7.27), ("07", 44.75, 4.59), ("08", 49.76, 4.72),
    ("09", 42.96, 1.60), ("10", 48.30, 4.08), ("11", 43.21, 2.35), ("12", 44.35, 2.57),
    ("13", 43.45, 5.40), ("14", 49.18, -0.37), ("15", 44.93, 2.44), ("16", 45.65, 0.16),
    ("17", 45.75, -0.63), ("18", 47.08, 2.40), ("19", 45.27, 1.77), ("21", 47.32, 5.04),
    ("22", 48.51, -2.76), ("23", 46.17, 1.87), ("24", 45.18, 0.72), ("25", 47.24, 6.02),
    ("26", 44.93, 4.89), ("27", 49.02, 1.15), ("28", 48.45, 1.49), ("29", 48.40, -4.10),
    ("2A", 41.93, 8.74), ("2B", 42.69, 9.45), ("30", 43.84, 4.36), ("31", 43.60, 1.44),
    ("32", 43.65, 0.58), ("33", 44.84, -0.58), ("34", 43.61, 3.88), ("35", 48.11, -1.68),
    ("36", 46.81, 1.69), ("37", 47.39, 0.69), ("38", 45.19, 5.72), ("39", 46.67, 5.55),
    ("40", 43.89, -0.50), ("41", 47.59, 1.33), ("42", 45.44, 4.39), ("43", 45.04, 3.88),
    ("44", 47.22, -1.55), ("45", 47.90, 1.91), ("46", 44.45, 1.44), ("47", 44.20, 0.62),
    ("48", 44.52, 3.50), ("49", 47.47, -0.55), ("50", 49.12, -1.09), ("51", 48.96, 4.37),
    ("52", 48.11, 5.14), ("53", 48.07, -0.77), ("54", 48.69, 6.18), ("55", 48.77, 5.16),
    ("56", 47.66, -2.76), ("57", 49.12, 6.18), ("58", 47.00, 3.16), ("59", 50.63, 3.06),
    ("60", 49.43, 2.08), ("61", 48.43, 0.09), ("62", 50.48, 2.44), ("63", 45.78, 3.08),
    ("64", 43.30, -0.37), ("65", 43.23, 0.08), ("66", 42.69, 2.89), ("67", 48.58, 7.75),
    ("68", 47.75, 7.34), ("69", 45.76, 4.83), ("70", 47.62, 6.16), ("71", 46.78, 4.83),
    ("72", 48.01, 0.20), ("73", 45.57, 5.92), ("74", 45.90, 6.13), ("75", 48.86, 2.35),
    ("76", 49.44, 1.10), ("77", 48.54, 2.65), ("78", 48.81, 2.13), ("79", 46.33, -0.47),
    ("80", 49.90, 2.30), ("81", 43.93, 2.15), ("82", 44.02, 1.35), ("83", 43.13, 5.93),
    ("84", 43.95, 4.81), ("85", 46.67, -1.43), ("86", 46.58, 0.34), ("87", 45.83, 1.26),
    ("88", 48.17, 6.45), ("89", 47.80, 3.57), ("90", 47.64, 6.86), ("91", 48.51, 2.24),
    ("92", 48.89, 2.23), ("93", 48.91, 2.45), ("94", 48.79, 2.45), ("95", 49.04, 2.06),
    ("20", 42.00, 9.00),
];

/// Department code to centroid lookup.
#[derive(Debug, Clone, Default)]
pub struct CentroidTable {
    coords: HashMap<String, Centroid>,
}

impl CentroidTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in table for metropolitan France.
    pub fn france() -> Self {
        FRANCE_CENTROIDS
            .iter()
            .map(|(code, lat, lon)| (code.to_string(), Centroid { lat: *lat, lon: *lon }))
            .collect()
    }

    pub fn insert(&mut self, code: impl Into<String>, centroid: Centroid) {
        self.coords.insert(code.into(), centroid);
    }

    pub fn get(&self, code: &str) -> Option<Centroid> {
        self.coords.get(code).copied()
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }
}

impl FromIterator<(String, Centroid)> for CentroidTable {
    fn from_iter<I: IntoIterator<Item = (String, Centroid)>>(iter: I) -> Self {
        Self {
            coords: iter.into_iter().collect(),
        }
    }
}

/// Great-circle distance in km (haversine).
pub fn haversine_km(a: Centroid, b: Centroid, radius_km: f64) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    radius_km * c
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EARTH_RADIUS_KM;

    #[test]
    fn france_table_is_complete() {
        let t = CentroidTable::france();
        // 01..95 without 20, plus 2A, 2B and the aggregate 20
        assert_eq!(t.len(), 97);
        for code in ["01", "2A", "2B", "20", "75", "95"] {
            assert!(t.get(code).is_some(), "missing {}", code);
        }
        assert!(t.get("96").is_none());
        assert!(t.get("ZZ").is_none());
    }

    #[test]
    fn paris_lyon_distance() {
        let t = CentroidTable::france();
        let d = haversine_km(t.get("75").unwrap(), t.get("69").unwrap(), EARTH_RADIUS_KM);
        assert!((d - 392.096).abs() < 0.01, "got {}", d);
    }

    #[test]
    fn distance_to_self_is_zero() {
        let c = Centroid { lat: 43.6, lon: 1.44 };
        assert_eq!(haversine_km(c, c, EARTH_RADIUS_KM), 0.0);
    }
}
