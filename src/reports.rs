use crate::config::{Settings, SCORE_GAUGE_MAX};
use crate::travel::{format_duration, TravelEstimator};
use crate::types::{
    AuditorTravelRow, CoverageLevel, CoverageSummary, DepartmentCoverageRow, DepartmentStats,
    LevelCount, LevelCountRow, Roster, TopDepartmentRow,
};
use crate::util::{format_cost, format_number};
use std::cmp::Ordering;
use std::collections::BTreeMap;

pub type StatsMap = BTreeMap<String, DepartmentStats>;

/// Departments by score, highest first; equal scores fall back to the
/// department code so the order is stable across runs.
pub fn ranked(stats: &StatsMap) -> Vec<&DepartmentStats> {
    let mut v: Vec<&DepartmentStats> = stats.values().collect();
    v.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.id.cmp(&b.id))
    });
    v
}

/// Total (2025, 2024) interventions across all departments.
pub fn total_interventions(stats: &StatsMap) -> (u64, u64) {
    stats
        .values()
        .fold((0, 0), |(t25, t24), s| (t25 + s.total2025, t24 + s.total2024))
}

/// Departments per level, strongest first. Departments absent from `stats`
/// count as NONE: `universe_size - present`.
pub fn level_counts(stats: &StatsMap, universe_size: usize) -> Vec<LevelCount> {
    CoverageLevel::DESCENDING
        .iter()
        .map(|&level| {
            let departments = if level == CoverageLevel::None {
                universe_size.saturating_sub(stats.len())
            } else {
                stats.values().filter(|s| s.level == level).count()
            };
            LevelCount { level, departments }
        })
        .collect()
}

pub fn generate_report1(stats: &StatsMap) -> Vec<DepartmentCoverageRow> {
    ranked(stats)
        .into_iter()
        .map(|s| DepartmentCoverageRow {
            department: s.id.clone(),
            level: s.level.to_string(),
            score: format_number(s.score, 1),
            audits_2025: s.total2025,
            audits_2024: s.total2024,
            auditors: s.auditors_count,
            home_base_for: s.is_home_base_for.join(", "),
        })
        .collect()
}

pub fn generate_report2(stats: &StatsMap, universe_size: usize) -> Vec<LevelCountRow> {
    level_counts(stats, universe_size)
        .into_iter()
        .map(|c| LevelCountRow {
            level: c.level.to_string(),
            departments: c.departments,
        })
        .collect()
}

pub fn generate_report3(stats: &StatsMap, limit: usize) -> Vec<TopDepartmentRow> {
    ranked(stats)
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(idx, s)| TopDepartmentRow {
            rank: idx + 1,
            department: s.id.clone(),
            audits_2025: s.total2025,
            score: format_number(s.score, 1),
            gauge_pct: format_number((s.score / SCORE_GAUGE_MAX * 100.0).min(100.0), 0),
        })
        .collect()
}

/// Round-trip travel per auditor per department.
///
/// Within a department, auditors are listed by 2025 count, highest first
/// (ties keep input order). The residence comes from the roster's postal
/// code; auditors missing from the roster are assumed to live in
/// `default_residence`. SGS staff are employee-billed and carry no cost.
pub fn generate_report4(
    stats: &StatsMap,
    roster: &Roster,
    estimator: &TravelEstimator,
    default_residence: &str,
) -> Vec<AuditorTravelRow> {
    let mut rows = Vec::new();
    for dept in stats.values() {
        let mut auditors: Vec<_> = dept.auditors.iter().collect();
        auditors.sort_by(|a, b| b.count25.cmp(&a.count25));

        for a in auditors {
            let meta = roster.find(&a.name);
            let residence = meta
                .and_then(|m| m.residence_department())
                .unwrap_or(default_residence);
            let employee = meta.is_some_and(|m| m.is_employee_billing());
            let trip = estimator.estimate(residence, &dept.id, employee);

            let round_trip_km = |count: u64| trip.distance_km as u64 * 2 * count;
            let round_trip_cost = |count: u64| trip.cost_eur.map(|c| c * 2.0 * count as f64);

            rows.push(AuditorTravelRow {
                department: dept.id.clone(),
                auditor: a.name.clone(),
                city: meta.map(|m| m.city.clone()).unwrap_or_default(),
                team: meta.map(|m| m.team.to_string()).unwrap_or_default(),
                from_department: residence.to_string(),
                one_way_km: trip.distance_km,
                one_way_time: format_duration(trip.time_minutes),
                audits_2025: a.count25,
                round_trip_km_2025: round_trip_km(a.count25),
                cost_2025: format_cost(
                    round_trip_cost(a.count25),
                    if employee { "SGS (included)" } else { "-" },
                ),
                audits_2024: a.count24,
                round_trip_km_2024: round_trip_km(a.count24),
                cost_2024: format_cost(round_trip_cost(a.count24), "-"),
            });
        }
    }
    rows
}

pub fn generate_summary(stats: &StatsMap, settings: &Settings) -> CoverageSummary {
    let (total_2025, total_2024) = total_interventions(stats);
    CoverageSummary {
        generated_at: chrono::Local::now().to_rfc3339(),
        total_interventions_2025: total_2025,
        total_interventions_2024: total_2024,
        departments_covered: stats.len(),
        departments_uncovered: settings.universe_size.saturating_sub(stats.len()),
        levels: level_counts(stats, settings.universe_size),
        top_departments: ranked(stats)
            .into_iter()
            .take(settings.top_departments)
            .map(|s| s.id.clone())
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::aggregate;
    use crate::config::{ScoringPolicy, TravelPolicy};
    use crate::geo::CentroidTable;
    use crate::types::{AuditEntry, AuditorMetadata, ContractType, Team};

    fn stats() -> StatsMap {
        let entries = vec![
            AuditEntry::new("A", "75", 4, 10),
            AuditEntry::new("A", "92", 1, 3),
            AuditEntry::new("B", "75", 0, 2),
            AuditEntry::new("C", "69", 5, 40),
            AuditEntry::new("D", "13", 2, 1),
            AuditEntry::new("D", "2A", 0, 1),
        ];
        aggregate(&entries, &ScoringPolicy::default()).unwrap()
    }

    fn roster() -> Roster {
        Roster::new(vec![
            AuditorMetadata {
                name: "A".into(),
                postal_code: "75011".into(),
                city: "Paris".into(),
                team: Team::Sgs,
                contract_type: ContractType::Salaried,
            },
            AuditorMetadata {
                name: "B".into(),
                postal_code: "69003".into(),
                city: "Lyon".into(),
                team: Team::Ext,
                contract_type: ContractType::Subcontractor,
            },
        ])
    }

    #[test]
    fn ranking_is_by_score_then_code() {
        let s = stats();
        let ids: Vec<&str> = ranked(&s).iter().map(|d| d.id.as_str()).collect();
        // 69: 32+4+15=51, 75: 9.6+8+15=32.6, 13: 0.8+4+15=19.8, 92: 6.4, 2A: 4.8
        assert_eq!(ids, vec!["69", "75", "13", "92", "2A"]);
    }

    #[test]
    fn equal_scores_order_by_code() {
        let entries = vec![AuditEntry::new("X", "33", 0, 1), AuditEntry::new("Y", "01", 0, 1)];
        let s = aggregate(&entries, &ScoringPolicy::default()).unwrap();
        let ids: Vec<&str> = ranked(&s).iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["01", "33"]);
    }

    #[test]
    fn totals() {
        assert_eq!(total_interventions(&stats()), (57, 12));
    }

    #[test]
    fn none_bucket_counts_absent_departments() {
        let rows = generate_report2(&stats(), 95);
        let as_pairs: Vec<(&str, usize)> =
            rows.iter().map(|r| (r.level.as_str(), r.departments)).collect();
        assert_eq!(
            as_pairs,
            vec![("Excellente", 1), ("Bonne", 2), ("Moyenne", 0), ("Faible", 2), ("Aucune", 90)]
        );
        assert_eq!(generate_report2(&stats(), 3).last().unwrap().departments, 0);
    }

    #[test]
    fn top_departments_gauge() {
        let rows = generate_report3(&stats(), 2);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].department, "69");
        assert_eq!(rows[0].gauge_pct, "100");
        assert_eq!(rows[1].rank, 2);
        assert_eq!(rows[1].gauge_pct, "65");
    }

    #[test]
    fn travel_rows() {
        let est = TravelEstimator::new(CentroidTable::france(), TravelPolicy::default());
        let rows = generate_report4(&stats(), &roster(), &est, "75");

        let paris: Vec<&AuditorTravelRow> = rows.iter().filter(|r| r.department == "75").collect();
        assert_eq!(paris.len(), 2);
        // A is SGS and local: fixed trip, cost absorbed
        assert_eq!(paris[0].auditor, "A");
        assert_eq!(paris[0].one_way_km, 25);
        assert_eq!(paris[0].round_trip_km_2025, 500);
        assert_eq!(paris[0].cost_2025, "SGS (included)");
        assert_eq!(paris[0].cost_2024, "-");
        // B lives in Lyon and is reimbursed per km
        assert_eq!(paris[1].from_department, "69");
        assert_eq!(paris[1].one_way_km, 520);
        assert_eq!(paris[1].one_way_time, "6h56");
        assert_eq!(paris[1].round_trip_km_2025, 2080);
        assert_eq!(paris[1].cost_2025, "873.60€");
        assert_eq!(paris[1].cost_2024, "0.00€");

        // C is not in the roster: assumed Paris resident, billed
        let lyon = rows.iter().find(|r| r.department == "69").unwrap();
        assert_eq!(lyon.from_department, "75");
        assert_eq!(lyon.team, "");
        assert_eq!(lyon.round_trip_km_2025, 520 * 2 * 40);
    }

    #[test]
    fn summary() {
        let settings = Settings::default();
        let s = generate_summary(&stats(), &settings);
        assert_eq!(s.total_interventions_2025, 57);
        assert_eq!(s.departments_covered, 5);
        assert_eq!(s.departments_uncovered, 90);
        assert_eq!(s.top_departments, vec!["69", "75", "13", "92", "2A"]);
        assert_eq!(s.levels.len(), 5);
    }
}
