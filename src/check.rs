use crate::compare::{self, Comparison, Tolerance};
use crate::io;
use crate::report;

use anyhow::Result;
use log::{info, warn};

pub fn check(report_path: &str, gold_path: &str, tolerance: Tolerance) -> Result<Comparison> {
    let pressure = report::load_report(report_path)?;
    let gold = io::load_npy(gold_path)?;

    let comparison = compare::compare(&pressure, &gold, tolerance)?;
    if comparison.is_match() {
        info!("{} matches {}", report_path, gold_path);
    } else {
        warn!(
            "{} of {} pressures in {} deviate from {}",
            comparison.mismatches.len(),
            comparison.total(),
            report_path,
            gold_path
        );
    }
    Ok(comparison)
}
