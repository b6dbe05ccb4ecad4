// Input files, relative to the working directory
pub const REPORT_PATH: &str = "assignment18.txt"; // CMG text report
pub const GOLD_PATH: &str = "test.npy"; // reference pressures

// second token of a line announcing a pressure row
pub const MARKER_TOKEN: &str = "K";

pub const ABSOLUTE_TOLERANCE: f64 = 1.; // pressure units
pub const RELATIVE_TOLERANCE: f64 = 1e-7;

pub const MAX_REPORTED_MISMATCHES: usize = 10; // individual positions listed in a failure diagnostic
