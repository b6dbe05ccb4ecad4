use crate::io;
use crate::report;

use anyhow::Result;
use log::info;

/// Stores the pressures of a trusted report as the new reference.
pub fn extract(report_path: &str, gold_path: &str) -> Result<()> {
    let pressure = report::load_report(report_path)?;
    info!("extracted pressures {}", pressure);
    io::save_npy(gold_path, &pressure)
}
