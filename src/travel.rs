//! Road distance, duration and mileage cost between two departments.
//!
//! Distances are centroid-to-centroid great-circle distances corrected by a
//! circuity factor, not routed. Every call is pure and total.
use crate::config::TravelPolicy;
use crate::geo::{haversine_km, CentroidTable};
use crate::types::TravelInfo;
use crate::util::round_to;
use tracing::trace;

#[derive(Debug, Clone)]
pub struct TravelEstimator {
    centroids: CentroidTable,
    policy: TravelPolicy,
}

impl TravelEstimator {
    pub fn new(centroids: CentroidTable, policy: TravelPolicy) -> Self {
        Self { centroids, policy }
    }

    pub fn policy(&self) -> &TravelPolicy {
        &self.policy
    }

    fn mileage_cost(&self, distance_km: u32, is_employee_billing: bool) -> Option<f64> {
        if is_employee_billing {
            None
        } else {
            Some(round_to(distance_km as f64 * self.policy.mileage_rate_eur, 2))
        }
    }

    /// One-way trip estimate from `from_dept` to `to_dept`.
    ///
    /// Same department: fixed local trip. Unknown code on either side:
    /// `TravelInfo::UNAVAILABLE`. Employee billing never carries a cost.
    pub fn estimate(&self, from_dept: &str, to_dept: &str, is_employee_billing: bool) -> TravelInfo {
        if from_dept == to_dept {
            return TravelInfo {
                distance_km: self.policy.local_trip_km,
                time_minutes: self.policy.local_trip_minutes,
                cost_eur: self.mileage_cost(self.policy.local_trip_km, is_employee_billing),
            };
        }

        let (Some(from), Some(to)) = (self.centroids.get(from_dept), self.centroids.get(to_dept))
        else {
            trace!(from_dept, to_dept, "no centroid, travel unavailable");
            return TravelInfo::UNAVAILABLE;
        };

        let crow = haversine_km(from, to, self.policy.earth_radius_km);
        let road = (crow * self.policy.circuity_factor + self.policy.access_distance_km).round();
        let minutes = (road / self.policy.average_speed_kmh * 60.0).round();
        let distance_km = road as u32;
        TravelInfo {
            distance_km,
            time_minutes: minutes as u32,
            cost_eur: self.mileage_cost(distance_km, is_employee_billing),
        }
    }
}

/// `95` -> `"1h35"`, `45` -> `"45min"`.
pub fn format_duration(minutes: u32) -> String {
    let h = minutes / 60;
    let m = minutes % 60;
    if h > 0 {
        format!("{}h{:02}", h, m)
    } else {
        format!("{}min", m)
    }
}
