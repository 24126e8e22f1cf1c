use crate::error::LoadError;
use crate::geo::{Centroid, CentroidTable};
use crate::types::{
    AuditEntry, AuditorMetadata, ContractType, RawAuditorRow, RawEntryRow, Roster, Team,
};
use crate::util::{cell, parse_f64_safe, parse_i64_safe};
use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub loaded_rows: usize,
    pub parse_errors: usize,
}

#[derive(Debug, Deserialize)]
struct RawCentroidRow {
    #[serde(rename = "code")]
    code: Option<String>,
    #[serde(rename = "lat")]
    lat: Option<String>,
    #[serde(rename = "lon")]
    lon: Option<String>,
}

/// Read every row of `path` as `R`, mapping each one through `convert`.
/// Rows that fail to deserialize or convert are counted and skipped.
fn read_rows<R, T, F>(path: &Path, what: &str, mut convert: F) -> Result<(Vec<T>, LoadReport), LoadError>
where
    R: for<'de> Deserialize<'de>,
    F: FnMut(R) -> Option<T>,
{
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_path(path)
        .map_err(|source| LoadError::Csv {
            path: path.display().to_string(),
            source,
        })?;

    let mut report = LoadReport::default();
    let mut out = Vec::new();
    for (line, result) in rdr.deserialize::<R>().enumerate() {
        report.total_rows += 1;
        let parsed = match result {
            Ok(row) => convert(row),
            Err(e) => {
                warn!(what, row = line + 1, error = %e, "unreadable row");
                None
            }
        };
        match parsed {
            Some(v) => out.push(v),
            None => report.parse_errors += 1,
        }
    }
    report.loaded_rows = out.len();
    info!(
        what,
        path = %path.display(),
        total = report.total_rows,
        loaded = report.loaded_rows,
        skipped = report.parse_errors,
        "loaded file"
    );
    Ok((out, report))
}

/// Load audit entries, keeping file order. Identifiers and counts are not
/// validated here beyond being parseable; the aggregator rejects bad values.
pub fn load_entries(path: &Path) -> Result<(Vec<AuditEntry>, LoadReport), LoadError> {
    read_rows(path, "audit entries", |row: RawEntryRow| {
        let count_2024 = parse_i64_safe(row.count_2024.as_deref())?;
        let count_2025 = parse_i64_safe(row.count_2025.as_deref())?;
        Some(AuditEntry {
            auditor: cell(row.auditor),
            department: cell(row.department),
            count_2024,
            count_2025,
        })
    })
}

pub fn load_roster(path: &Path) -> Result<(Roster, LoadReport), LoadError> {
    let (auditors, report) = read_rows(path, "roster", |row: RawAuditorRow| {
        let name = cell(row.name);
        if name.is_empty() {
            return None;
        }
        let team = match cell(row.team).parse::<Team>() {
            Ok(t) => t,
            Err(e) => {
                warn!(auditor = %name, error = %e, "skipping roster row");
                return None;
            }
        };
        let contract_type = match cell(row.contract_type).parse::<ContractType>() {
            Ok(t) => t,
            Err(e) => {
                warn!(auditor = %name, error = %e, "skipping roster row");
                return None;
            }
        };
        Some(AuditorMetadata {
            name,
            postal_code: cell(row.postal_code),
            city: cell(row.city),
            team,
            contract_type,
        })
    })?;
    Ok((Roster::new(auditors), report))
}

pub fn load_centroids(path: &Path) -> Result<(CentroidTable, LoadReport), LoadError> {
    let (rows, report) = read_rows(path, "centroids", |row: RawCentroidRow| {
        let code = cell(row.code);
        if code.is_empty() {
            return None;
        }
        let lat = parse_f64_safe(row.lat.as_deref())?;
        let lon = parse_f64_safe(row.lon.as_deref())?;
        Some((code, Centroid { lat, lon }))
    })?;
    Ok((rows.into_iter().collect(), report))
}
