//! Per-department coverage aggregation.
//!
//! Two passes over the entries: the first picks each auditor's home base,
//! the second folds the entries into one `DepartmentStats` per department.
use crate::config::ScoringPolicy;
use crate::error::ValidationError;
use crate::types::{AuditEntry, AuditorActivity, CoverageLevel, DepartmentStats};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeBase {
    pub department: String,
    pub count_2025: i64,
}

/// Reject the first entry with an empty identifier or a negative count.
pub fn validate_entries(entries: &[AuditEntry]) -> Result<(), ValidationError> {
    for (index, e) in entries.iter().enumerate() {
        if e.auditor.trim().is_empty() {
            return Err(ValidationError::EmptyAuditor { index });
        }
        if e.department.trim().is_empty() {
            return Err(ValidationError::EmptyDepartment {
                index,
                auditor: e.auditor.clone(),
            });
        }
        for (field, value) in [("count2024", e.count_2024), ("count2025", e.count_2025)] {
            if value < 0 {
                return Err(ValidationError::NegativeCount {
                    index,
                    auditor: e.auditor.clone(),
                    department: e.department.clone(),
                    field,
                    value,
                });
            }
        }
    }
    Ok(())
}

/// Home base of every auditor: the department with their highest 2025 count.
///
/// The comparison is strict, so when two departments share the maximum the
/// one that appears first in `entries` is kept. Reordering the input can
/// therefore change the result for tied auditors.
pub fn resolve_home_bases(entries: &[AuditEntry]) -> HashMap<String, HomeBase> {
    let mut bases: HashMap<String, HomeBase> = HashMap::new();
    for e in entries {
        let replace = match bases.get(&e.auditor) {
            None => true,
            Some(current) => e.count_2025 > current.count_2025,
        };
        if replace {
            bases.insert(
                e.auditor.clone(),
                HomeBase {
                    department: e.department.clone(),
                    count_2025: e.count_2025,
                },
            );
        }
    }
    bases
}

pub fn coverage_score(stats: &DepartmentStats, policy: &ScoringPolicy) -> f64 {
    let mut score = stats.total2025 as f64 * policy.volume_weight;
    score += stats.auditors_count as f64 * policy.diversity_bonus;
    if !stats.is_home_base_for.is_empty() {
        score += policy.home_base_bonus;
    }
    score
}

/// Map a score to its level; thresholds are checked from the top down.
pub fn classify(score: f64, policy: &ScoringPolicy) -> CoverageLevel {
    if score >= policy.excellent_threshold {
        CoverageLevel::Excellent
    } else if score >= policy.good_threshold {
        CoverageLevel::Good
    } else if score >= policy.average_threshold {
        CoverageLevel::Average
    } else if score > 0.0 {
        CoverageLevel::Weak
    } else {
        CoverageLevel::None
    }
}

/// Build the coverage statistics for every department with 2025 activity.
///
/// Fails on the first malformed entry without producing any stats.
/// Departments whose entries all have `count2025 == 0` get no record.
pub fn aggregate(
    entries: &[AuditEntry],
    policy: &ScoringPolicy,
) -> Result<BTreeMap<String, DepartmentStats>, ValidationError> {
    validate_entries(entries)?;
    let bases = resolve_home_bases(entries);

    let accumulated = entries.iter().fold(
        BTreeMap::<String, DepartmentStats>::new(),
        |mut acc, e| {
            let is_base = bases
                .get(&e.auditor)
                .is_some_and(|b| b.department == e.department);
            let stats = acc
                .entry(e.department.clone())
                .or_insert_with(|| DepartmentStats::empty(&e.department));
            if is_base && !stats.is_home_base_for.contains(&e.auditor) {
                stats.is_home_base_for.push(e.auditor.clone());
            }
            if e.count_2025 > 0 {
                // counts were validated non-negative above
                let (c25, c24) = (e.count_2025 as u64, e.count_2024 as u64);
                stats.total2025 += c25;
                stats.total2024 += c24;
                stats.auditors_count += 1;
                stats.auditors.push(AuditorActivity {
                    name: e.auditor.clone(),
                    count25: c25,
                    count24: c24,
                    is_base,
                });
            }
            acc
        },
    );

    let seen = accumulated.len();
    let result: BTreeMap<String, DepartmentStats> = accumulated
        .into_iter()
        .filter(|(_, s)| !s.auditors.is_empty())
        .map(|(id, mut s)| {
            s.score = coverage_score(&s, policy);
            s.level = classify(s.score, policy);
            (id, s)
        })
        .collect();

    debug!(
        entries = entries.len(),
        auditors = bases.len(),
        departments_seen = seen,
        departments_covered = result.len(),
        "aggregated audit entries"
    );
    Ok(result)
}
