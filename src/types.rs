use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tabled::Tabled;

/// Raw audit-entry row as it appears in the CSV export. Every column is
/// optional text so a single malformed cell does not abort the whole read.
#[derive(Debug, Deserialize)]
pub struct RawEntryRow {
    #[serde(rename = "auditor")]
    pub auditor: Option<String>,
    #[serde(rename = "department")]
    pub department: Option<String>,
    #[serde(rename = "count2024")]
    pub count_2024: Option<String>,
    #[serde(rename = "count2025")]
    pub count_2025: Option<String>,
}

/// One (auditor, department) activity record.
///
/// Counts are signed so that a negative value coming from input reaches the
/// aggregator's validation instead of being silently clamped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub auditor: String,
    pub department: String,
    #[serde(rename = "count2024")]
    pub count_2024: i64,
    #[serde(rename = "count2025")]
    pub count_2025: i64,
}

impl AuditEntry {
    pub fn new(
        auditor: impl Into<String>,
        department: impl Into<String>,
        count_2024: i64,
        count_2025: i64,
    ) -> Self {
        Self {
            auditor: auditor.into(),
            department: department.into(),
            count_2024,
            count_2025,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RawAuditorRow {
    #[serde(rename = "name")]
    pub name: Option<String>,
    #[serde(rename = "postalCode")]
    pub postal_code: Option<String>,
    #[serde(rename = "city")]
    pub city: Option<String>,
    #[serde(rename = "team")]
    pub team: Option<String>,
    #[serde(rename = "type")]
    pub contract_type: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    #[serde(rename = "SGS")]
    Sgs,
    #[serde(rename = "VIT")]
    Vit,
    #[serde(rename = "Ext")]
    Ext,
}

impl FromStr for Team {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "SGS" => Ok(Team::Sgs),
            "VIT" => Ok(Team::Vit),
            "Ext" | "EXT" => Ok(Team::Ext),
            other => Err(format!("unknown team '{}'", other)),
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Team::Sgs => "SGS",
            Team::Vit => "VIT",
            Team::Ext => "Ext",
        };
        f.write_str(s)
    }
}

/// Contract type: subcontractor (`ST`) or salaried (`SAL`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContractType {
    #[serde(rename = "ST")]
    Subcontractor,
    #[serde(rename = "SAL")]
    Salaried,
}

impl FromStr for ContractType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "ST" => Ok(ContractType::Subcontractor),
            "SAL" => Ok(ContractType::Salaried),
            other => Err(format!("unknown contract type '{}'", other)),
        }
    }
}

/// Roster entry for one auditor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditorMetadata {
    pub name: String,
    pub postal_code: String,
    pub city: String,
    pub team: Team,
    #[serde(rename = "type")]
    pub contract_type: ContractType,
}

impl AuditorMetadata {
    /// Department of residence, taken from the first two characters of the
    /// postal code. Corsican codes (`20xxx`) map to the aggregate `"20"`.
    pub fn residence_department(&self) -> Option<&str> {
        let code = self.postal_code.trim();
        let end = code.char_indices().nth(2).map(|(i, _)| i)?;
        Some(&code[..end])
    }

    /// SGS staff travel is absorbed by the employer.
    pub fn is_employee_billing(&self) -> bool {
        self.team == Team::Sgs
    }
}

/// The auditor roster, looked up by name.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    auditors: Vec<AuditorMetadata>,
}

impl Roster {
    pub fn new(auditors: Vec<AuditorMetadata>) -> Self {
        Self { auditors }
    }

    pub fn find(&self, name: &str) -> Option<&AuditorMetadata> {
        self.auditors.iter().find(|a| a.name == name)
    }

    pub fn len(&self) -> usize {
        self.auditors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.auditors.is_empty()
    }
}

/// Discrete coverage level. Variant order is the rank order, so `Ord`
/// compares levels from weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CoverageLevel {
    None,
    Weak,
    Average,
    Good,
    Excellent,
}

impl CoverageLevel {
    pub const DESCENDING: [CoverageLevel; 5] = [
        CoverageLevel::Excellent,
        CoverageLevel::Good,
        CoverageLevel::Average,
        CoverageLevel::Weak,
        CoverageLevel::None,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CoverageLevel::Excellent => "Excellente",
            CoverageLevel::Good => "Bonne",
            CoverageLevel::Average => "Moyenne",
            CoverageLevel::Weak => "Faible",
            CoverageLevel::None => "Aucune",
        }
    }
}

impl fmt::Display for CoverageLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-auditor breakdown inside a department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditorActivity {
    pub name: String,
    pub count25: u64,
    pub count24: u64,
    pub is_base: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentStats {
    pub id: String,
    pub total2025: u64,
    pub total2024: u64,
    pub auditors_count: usize,
    pub is_home_base_for: Vec<String>,
    pub auditors: Vec<AuditorActivity>,
    pub score: f64,
    pub level: CoverageLevel,
}

impl DepartmentStats {
    pub fn empty(id: &str) -> Self {
        Self {
            id: id.to_string(),
            total2025: 0,
            total2024: 0,
            auditors_count: 0,
            is_home_base_for: Vec::new(),
            auditors: Vec::new(),
            score: 0.0,
            level: CoverageLevel::None,
        }
    }
}

/// Estimated one-way trip between two departments.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelInfo {
    pub distance_km: u32,
    pub time_minutes: u32,
    pub cost_eur: Option<f64>,
}

impl TravelInfo {
    /// Returned when either endpoint has no known centroid.
    pub const UNAVAILABLE: TravelInfo = TravelInfo {
        distance_km: 0,
        time_minutes: 0,
        cost_eur: None,
    };

    pub fn is_available(&self) -> bool {
        *self != Self::UNAVAILABLE
    }
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct DepartmentCoverageRow {
    #[serde(rename = "Department")]
    #[tabled(rename = "Department")]
    pub department: String,
    #[serde(rename = "Level")]
    #[tabled(rename = "Level")]
    pub level: String,
    #[serde(rename = "Score")]
    #[tabled(rename = "Score")]
    pub score: String,
    #[serde(rename = "Audits2025")]
    #[tabled(rename = "Audits2025")]
    pub audits_2025: u64,
    #[serde(rename = "Audits2024")]
    #[tabled(rename = "Audits2024")]
    pub audits_2024: u64,
    #[serde(rename = "Auditors")]
    #[tabled(rename = "Auditors")]
    pub auditors: usize,
    #[serde(rename = "HomeBaseFor")]
    #[tabled(rename = "HomeBaseFor")]
    pub home_base_for: String,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq, Eq)]
pub struct LevelCountRow {
    #[serde(rename = "Level")]
    #[tabled(rename = "Level")]
    pub level: String,
    #[serde(rename = "Departments")]
    #[tabled(rename = "Departments")]
    pub departments: usize,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct TopDepartmentRow {
    #[serde(rename = "Rank")]
    #[tabled(rename = "Rank")]
    pub rank: usize,
    #[serde(rename = "Department")]
    #[tabled(rename = "Department")]
    pub department: String,
    #[serde(rename = "Audits2025")]
    #[tabled(rename = "Audits2025")]
    pub audits_2025: u64,
    #[serde(rename = "Score")]
    #[tabled(rename = "Score")]
    pub score: String,
    #[serde(rename = "GaugePct")]
    #[tabled(rename = "GaugePct")]
    pub gauge_pct: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct AuditorTravelRow {
    #[serde(rename = "Department")]
    #[tabled(rename = "Department")]
    pub department: String,
    #[serde(rename = "Auditor")]
    #[tabled(rename = "Auditor")]
    pub auditor: String,
    #[serde(rename = "City")]
    #[tabled(rename = "City")]
    pub city: String,
    #[serde(rename = "Team")]
    #[tabled(rename = "Team")]
    pub team: String,
    #[serde(rename = "FromDepartment")]
    #[tabled(rename = "From")]
    pub from_department: String,
    #[serde(rename = "OneWayKm")]
    #[tabled(rename = "OneWayKm")]
    pub one_way_km: u32,
    #[serde(rename = "OneWayTime")]
    #[tabled(rename = "OneWayTime")]
    pub one_way_time: String,
    #[serde(rename = "Audits2025")]
    #[tabled(rename = "Audits2025")]
    pub audits_2025: u64,
    #[serde(rename = "RoundTripKm2025")]
    #[tabled(rename = "Km2025")]
    pub round_trip_km_2025: u64,
    #[serde(rename = "Cost2025")]
    #[tabled(rename = "Cost2025")]
    pub cost_2025: String,
    #[serde(rename = "Audits2024")]
    #[tabled(rename = "Audits2024")]
    pub audits_2024: u64,
    #[serde(rename = "RoundTripKm2024")]
    #[tabled(rename = "Km2024")]
    pub round_trip_km_2024: u64,
    #[serde(rename = "Cost2024")]
    #[tabled(rename = "Cost2024")]
    pub cost_2024: String,
}

#[derive(Debug, Serialize)]
pub struct LevelCount {
    pub level: CoverageLevel,
    pub departments: usize,
}

#[derive(Debug, Serialize)]
pub struct CoverageSummary {
    pub generated_at: String,
    pub total_interventions_2025: u64,
    pub total_interventions_2024: u64,
    pub departments_covered: usize,
    pub departments_uncovered: usize,
    pub levels: Vec<LevelCount>,
    pub top_departments: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(postal: &str, team: Team) -> AuditorMetadata {
        AuditorMetadata {
            name: "Test".into(),
            postal_code: postal.into(),
            city: "Somewhere".into(),
            team,
            contract_type: ContractType::Salaried,
        }
    }

    #[test]
    fn residence_is_postal_prefix() {
        assert_eq!(meta("69003", Team::Vit).residence_department(), Some("69"));
        assert_eq!(meta(" 20090", Team::Ext).residence_department(), Some("20"));
        assert_eq!(meta("7", Team::Ext).residence_department(), None);
    }

    #[test]
    fn only_sgs_is_employee_billing() {
        assert!(meta("75001", Team::Sgs).is_employee_billing());
        assert!(!meta("75001", Team::Vit).is_employee_billing());
        assert!(!meta("75001", Team::Ext).is_employee_billing());
    }

    #[test]
    fn level_rank_order() {
        assert!(CoverageLevel::None < CoverageLevel::Weak);
        assert!(CoverageLevel::Weak < CoverageLevel::Average);
        assert!(CoverageLevel::Average < CoverageLevel::Good);
        assert!(CoverageLevel::Good < CoverageLevel::Excellent);
        assert_eq!(CoverageLevel::Good.to_string(), "Bonne");
    }

    #[test]
    fn team_parsing() {
        assert_eq!("SGS".parse::<Team>(), Ok(Team::Sgs));
        assert_eq!(" Ext ".parse::<Team>(), Ok(Team::Ext));
        assert!("XYZ".parse::<Team>().is_err());
        assert_eq!("SAL".parse::<ContractType>(), Ok(ContractType::Salaried));
    }
}
