// Entry point and interactive menu.
//
// - Option [1] loads the audit entries, the auditor roster and the
//   centroid table, printing diagnostics.
// - Option [2] aggregates coverage, writes four CSV reports and a JSON
//   summary, and prints a preview of each.
// - After generating reports, the user can go back to the menu or exit.
use audit_coverage::config::Settings;
use audit_coverage::geo::CentroidTable;
use audit_coverage::travel::TravelEstimator;
use audit_coverage::types::{AuditEntry, Roster};
use audit_coverage::{aggregate, loader, output, reports, util};
use once_cell::sync::Lazy;
use std::io::{self, Write};
use std::sync::Mutex;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "COVERAGE_LOG";

// Loaded once, reused for every report run.
static APP_STATE: Lazy<Mutex<AppState>> = Lazy::new(|| Mutex::new(AppState { data: None }));

struct AppState {
    data: Option<Dataset>,
}

#[derive(Clone)]
struct Dataset {
    entries: Vec<AuditEntry>,
    roster: Roster,
    centroids: CentroidTable,
}

/// `None` once stdin is closed.
fn read_choice() -> Option<String> {
    print!("Enter choice: ");
    let _ = io::stdout().flush();
    let mut buf = String::new();
    match io::stdin().read_line(&mut buf) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(buf.trim().to_string()),
    }
}

/// Returns `true` if the user chose `Y`, `false` on `N`.
fn prompt_back_to_menu() -> bool {
    loop {
        print!("Back to Report Selection (Y/N): ");
        let _ = io::stdout().flush();
        let mut buf = String::new();
        if io::stdin().read_line(&mut buf).unwrap_or(0) == 0 {
            return false;
        }
        match buf.trim().to_uppercase().as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

fn load_dataset(settings: &Settings) -> Result<Dataset, audit_coverage::LoadError> {
    let (entries, entries_report) = loader::load_entries(&settings.entries_path)?;
    println!(
        "Processing audit entries... ({} rows read, {} loaded)",
        util::format_int(entries_report.total_rows),
        util::format_int(entries_report.loaded_rows)
    );
    if entries_report.parse_errors > 0 {
        println!(
            "Note: {} rows skipped due to parse errors.",
            util::format_int(entries_report.parse_errors)
        );
    }

    let (roster, roster_report) = loader::load_roster(&settings.roster_path)?;
    println!(
        "Roster: {} auditors ({} rows skipped).",
        util::format_int(roster.len()),
        util::format_int(roster_report.parse_errors)
    );

    let centroids = match &settings.centroids_path {
        Some(path) => loader::load_centroids(path)?.0,
        None => CentroidTable::france(),
    };
    println!("Centroids: {} departments.", centroids.len());

    Ok(Dataset {
        entries,
        roster,
        centroids,
    })
}

fn handle_load(settings: &Settings) {
    match load_dataset(settings) {
        Ok(data) => {
            println!();
            let mut state = APP_STATE.lock().unwrap_or_else(|e| e.into_inner());
            state.data = Some(data);
        }
        Err(e) => {
            error!(error = %e, "load failed");
            eprintln!("Failed to load files: {}\n", e);
        }
    }
}

fn handle_generate_reports(settings: &Settings) {
    let data = {
        let state = APP_STATE.lock().unwrap_or_else(|e| e.into_inner());
        state.data.clone()
    };
    let Some(data) = data else {
        println!("Error: No data loaded. Please load the files first (option 1).\n");
        return;
    };

    let stats = match aggregate(&data.entries, &settings.scoring) {
        Ok(s) => s,
        Err(e) => {
            error!(error = %e, "invalid audit entry");
            eprintln!("Cannot compute coverage: {}\n", e);
            return;
        }
    };
    info!(departments = stats.len(), "coverage computed");
    let estimator = TravelEstimator::new(data.centroids, settings.travel.clone());
    let out = |name: &str| settings.output_dir.join(name);

    println!("Generating reports...");
    println!("Outputs saved to individual files...\n");

    let r1 = reports::generate_report1(&stats);
    let file1 = out("report1_department_coverage.csv");
    if let Err(e) = output::write_csv(&file1, &r1) {
        eprintln!("Write error: {}", e);
    }
    output::preview_table(1, "Department Coverage", Some("Sorted by score"), &r1, 5);
    println!("(Full table exported to {})\n", file1.display());

    let r2 = reports::generate_report2(&stats, settings.universe_size);
    let file2 = out("report2_level_distribution.csv");
    if let Err(e) = output::write_csv(&file2, &r2) {
        eprintln!("Write error: {}", e);
    }
    output::preview_table(2, "Coverage Level Distribution", None, &r2, 5);
    println!("(Full table exported to {})\n", file2.display());

    let r3 = reports::generate_report3(&stats, settings.top_departments);
    let file3 = out("report3_top_departments.csv");
    if let Err(e) = output::write_csv(&file3, &r3) {
        eprintln!("Write error: {}", e);
    }
    output::preview_table(3, "Top Departments", None, &r3, settings.top_departments);
    println!("(Full table exported to {})\n", file3.display());

    let r4 = reports::generate_report4(&stats, &data.roster, &estimator, &settings.default_residence);
    let file4 = out("report4_auditor_travel.csv");
    if let Err(e) = output::write_csv(&file4, &r4) {
        eprintln!("Write error: {}", e);
    }
    let note = format!(
        "Road distance estimated with a {} detour factor",
        settings.travel.circuity_factor
    );
    output::preview_table(4, "Auditor Travel (round trip)", Some(&note), &r4, 3);
    println!("(Full table exported to {})\n", file4.display());

    let summary = reports::generate_summary(&stats, settings);
    let summary_path = out("summary.json");
    if let Err(e) = output::write_json(&summary_path, &summary) {
        eprintln!("Write error: {}", e);
    }
    println!("Summary Stats ({}):", summary_path.display());
    println!(
        "{{\"total_interventions_2025\": {}, \"departments_covered\": {}, \"departments_uncovered\": {}}}\n",
        util::format_int(summary.total_interventions_2025),
        summary.departments_covered,
        summary.departments_uncovered
    );
}

fn main() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let settings = match Settings::from_env() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };

    loop {
        println!("Audit Coverage:");
        println!("[1] Load the files");
        println!("[2] Generate Reports\n");
        match read_choice().as_deref() {
            None => break,
            Some("1") => handle_load(&settings),
            Some("2") => {
                println!();
                handle_generate_reports(&settings);
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            _ => println!("Invalid choice. Please enter 1 or 2.\n"),
        }
    }
}
