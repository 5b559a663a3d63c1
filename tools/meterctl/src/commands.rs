//! Subcommand handlers
//!
//! Every handler works on one snapshot read from disk; nothing is written
//! back.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use tracing::{info, warn};
use voltage_hierarchy::{
    build_forest, classify, derive_from_name, load_meters, validate_meter_with, ForestSummary,
    Meter, TierRules,
};

use crate::config::OutputFormat;
use crate::render::{render_forest, render_summary};

fn load(snapshot: &Path) -> Result<Vec<Meter>> {
    load_meters(snapshot)
        .with_context(|| format!("Failed to load meter snapshot {}", snapshot.display()))
}

/// Build and print the meter forest
pub fn tree(snapshot: &Path, format: OutputFormat) -> Result<()> {
    let meters = load(snapshot)?;
    let forest = build_forest(&meters);
    let summary = ForestSummary::of(&forest);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&forest)?);
        },
        OutputFormat::Tree => {
            for line in render_forest(&forest) {
                println!("{}", line);
            }
            println!();
            println!("{}", render_summary(&summary).bright_cyan());
        },
    }

    info!("Rendered forest for {} meters", summary.total);
    Ok(())
}

/// Run the write-path checks over every meter; returns whether all passed
pub fn validate(snapshot: &Path, rules: &TierRules, brief: bool) -> Result<bool> {
    if rules.has_known_conflicts() {
        warn!(
            "Parent rules conflict with the placement table; 132kV and/or 380V meters \
             cannot pass (see rules.parent_ss132_for_ss011 / rules.parent_ss400_for_132kv)"
        );
    }

    let meters = load(snapshot)?;
    let mut failures = 0usize;

    for meter in &meters {
        let result = validate_meter_with(rules, meter);
        if result.is_valid() {
            if !brief {
                println!("{} {} {}", "OK".green(), meter.id.bright_yellow(), meter.meter_code);
            }
        } else {
            failures += 1;
            println!(
                "{} {} {} - {}",
                "FAIL".red(),
                meter.id.bright_yellow(),
                meter.meter_code,
                result.reason.unwrap_or_default()
            );
        }
    }

    println!();
    if failures == 0 {
        println!(
            "{} All {} meters passed validation",
            "SUCCESS".green().bold(),
            meters.len()
        );
    } else {
        eprintln!(
            "{} {} of {} meters failed validation",
            "FAILURE".red().bold(),
            failures,
            meters.len()
        );
    }

    Ok(failures == 0)
}

/// Print the completeness classification of every meter
pub fn classify_all(snapshot: &Path, incomplete_only: bool) -> Result<()> {
    let meters = load(snapshot)?;
    let mut incomplete = 0usize;

    for meter in &meters {
        let result = classify(meter);
        if result.is_complete {
            if !incomplete_only {
                println!(
                    "{} {} {}",
                    "COMPLETE".green(),
                    meter.id.bright_yellow(),
                    meter.voltage_level
                );
            }
        } else {
            incomplete += 1;
            println!(
                "{} {} {} - {}",
                "INCOMPLETE".yellow(),
                meter.id.bright_yellow(),
                meter.voltage_level,
                result.missing_or_extra_reason.unwrap_or_default()
            );
        }
    }

    println!();
    println!(
        "{} {} complete, {} incomplete",
        "Classification:".bright_cyan(),
        meters.len() - incomplete,
        incomplete
    );
    Ok(())
}

/// Show the codes the naming convention suggests for a new meter
pub fn suggest(meter_code: &str, voltage_level: &str) -> Result<()> {
    let suggestion = derive_from_name(meter_code, voltage_level);
    if suggestion.is_empty() {
        println!(
            "{} No area code found in '{}'",
            "INFO".bright_cyan(),
            meter_code
        );
        return Ok(());
    }

    for (field, value) in [
        ("area", &suggestion.area),
        ("ss400", &suggestion.ss400),
        ("ss132", &suggestion.ss132),
        ("ss011", &suggestion.ss011),
    ] {
        if let Some(value) = value {
            println!("{:<6} {}", field, value.bright_yellow());
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SNAPSHOT: &str = r#"[
        {"id": "A", "meterCode": "PQMS_400KV.KHB0001", "voltageLevel": "400kV", "ss400": "KHB400"},
        {"id": "M1", "meterCode": "PQMS_132KV.APA0001", "voltageLevel": "132kV", "ss132": "APA132"}
    ]"#;

    fn write_snapshot(dir: &TempDir) -> std::path::PathBuf {
        let path = dir.path().join("meters.json");
        std::fs::write(&path, SNAPSHOT).unwrap();
        path
    }

    #[test]
    fn test_validate_default_rules_reject_132kv_root() {
        let dir = TempDir::new().unwrap();
        let path = write_snapshot(&dir);
        assert!(!validate(&path, &TierRules::default(), true).unwrap());
    }

    #[test]
    fn test_validate_relaxed_rules_accept_132kv_root() {
        let dir = TempDir::new().unwrap();
        let path = write_snapshot(&dir);
        let rules = TierRules {
            parent_ss132_for_ss011: false,
            parent_ss400_for_132kv: false,
        };
        assert!(validate(&path, &rules, true).unwrap());
    }

    #[test]
    fn test_missing_snapshot_reports_path() {
        let dir = TempDir::new().unwrap();
        let err = tree(&dir.path().join("none.json"), OutputFormat::Json).unwrap_err();
        assert!(err.to_string().contains("none.json"));
    }
}
