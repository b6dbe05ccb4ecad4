use crate::cfg;
use crate::multiindex::unflatten_index;
use crate::tensor::Tensor;

use itertools::Itertools;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
#[error("shapes {actual:?} and {desired:?} mismatch")]
pub struct ShapeMismatch {
    pub actual: Vec<usize>,
    pub desired: Vec<usize>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tolerance {
    pub atol: f64,
    pub rtol: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Tolerance {
            atol: cfg::ABSOLUTE_TOLERANCE,
            rtol: cfg::RELATIVE_TOLERANCE,
        }
    }
}

impl Tolerance {
    pub fn is_close(&self, actual: f64, desired: f64) -> bool {
        if actual.is_nan() || desired.is_nan() {
            return actual.is_nan() && desired.is_nan();
        }
        if actual == desired {
            return true;
        }
        if actual.is_infinite() || desired.is_infinite() {
            return false;
        }
        (actual - desired).abs() <= self.atol + self.rtol * desired.abs()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Mismatch {
    pub position: Vec<usize>,
    pub actual: f64,
    pub desired: f64,
}

impl Mismatch {
    pub fn difference(&self) -> f64 {
        (self.actual - self.desired).abs()
    }
}

/// Outcome of an element-wise closeness check.
#[derive(Clone, Debug)]
pub struct Comparison {
    pub tolerance: Tolerance,
    pub shape: Vec<usize>,
    pub mismatches: Vec<Mismatch>,
    pub max_abs_diff: f64,
    pub max_rel_diff: f64,
}

impl Comparison {
    pub fn is_match(&self) -> bool {
        self.mismatches.is_empty()
    }

    pub fn total(&self) -> usize {
        self.shape.iter().product::<usize>()
    }
}

// rank-0 operands are stretched to the other shape
fn broadcast_shape(actual: &Tensor, desired: &Tensor) -> Result<Vec<usize>, ShapeMismatch> {
    if actual.get_shape() == desired.get_shape() || desired.get_rank() == 0 {
        Ok(actual.get_shape().clone())
    } else if actual.get_rank() == 0 {
        Ok(desired.get_shape().clone())
    } else {
        Err(ShapeMismatch {
            actual: actual.get_shape().clone(),
            desired: desired.get_shape().clone(),
        })
    }
}

fn value_at(t: &Tensor, i: usize) -> f64 {
    if t.get_rank() == 0 {
        t.get_values()[0]
    } else {
        t.get_values()[i]
    }
}

pub fn compare(
    actual: &Tensor,
    desired: &Tensor,
    tolerance: Tolerance,
) -> Result<Comparison, ShapeMismatch> {
    let shape = broadcast_shape(actual, desired)?;
    let mut comparison = Comparison {
        tolerance,
        mismatches: Vec::new(),
        max_abs_diff: 0.,
        max_rel_diff: 0.,
        shape,
    };

    for i in 0..comparison.total() {
        let a = value_at(actual, i);
        let d = value_at(desired, i);
        if tolerance.is_close(a, d) {
            continue;
        }
        let diff = (a - d).abs();
        // f64::max skips NaN differences
        comparison.max_abs_diff = comparison.max_abs_diff.max(diff);
        comparison.max_rel_diff = comparison.max_rel_diff.max(diff / d.abs());
        comparison.mismatches.push(Mismatch {
            position: unflatten_index(i, &comparison.shape),
            actual: a,
            desired: d,
        });
    }

    Ok(comparison)
}

// three significant digits, trailing zeros dropped
fn percentage(part: usize, total: usize) -> String {
    let p = 100. * part as f64 / total as f64;
    if p == 0. {
        return "0".to_string();
    }
    let decimals = (2 - p.abs().log10().floor() as i32).max(0) as usize;
    let s = format!("{:.*}", decimals, p);
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_match() {
            return write!(
                f,
                "All {} elements equal to tolerance rtol={:e}, atol={}",
                self.total(),
                self.tolerance.rtol,
                self.tolerance.atol
            );
        }
        writeln!(
            f,
            "Not equal to tolerance rtol={:e}, atol={}",
            self.tolerance.rtol, self.tolerance.atol
        )?;
        writeln!(
            f,
            "Mismatched elements: {} / {} ({}%)",
            self.mismatches.len(),
            self.total(),
            percentage(self.mismatches.len(), self.total())
        )?;
        writeln!(f, "Max absolute difference: {}", self.max_abs_diff)?;
        write!(f, "Max relative difference: {}", self.max_rel_diff)?;
        for m in self.mismatches.iter().take(cfg::MAX_REPORTED_MISMATCHES) {
            write!(
                f,
                "\n  at ({}): actual {}, desired {}, difference {}",
                m.position.iter().join(", "),
                m.actual,
                m.desired,
                m.difference()
            )?;
        }
        if self.mismatches.len() > cfg::MAX_REPORTED_MISMATCHES {
            write!(
                f,
                "\n  ... {} more",
                self.mismatches.len() - cfg::MAX_REPORTED_MISMATCHES
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(values: Vec<f64>) -> Tensor {
        Tensor::new(vec![1, values.len()], values)
    }

    #[test]
    fn test_within_tolerance() {
        let gold = row(vec![1., 2., 3.]);
        let result = compare(&row(vec![1.5, 2.5, 3.5]), &gold, Tolerance::default()).unwrap();
        assert!(result.is_match());
    }

    #[test]
    fn test_beyond_tolerance() {
        let gold = row(vec![1., 2., 3.]);
        let result = compare(&row(vec![2.5, 2.5, 3.5]), &gold, Tolerance::default()).unwrap();
        assert!(!result.is_match());
        assert_eq!(
            result.mismatches,
            vec![Mismatch {
                position: vec![0, 0],
                actual: 2.5,
                desired: 1.
            }]
        );
        assert_eq!(result.max_abs_diff, 1.5);
        assert_eq!(result.max_rel_diff, 1.5);
    }

    #[test]
    fn test_exact_tolerance_boundary() {
        let tolerance = Tolerance { atol: 1., rtol: 0. };
        let gold = Tensor::new(vec![2, 2], vec![0.5, 10., -4., 1000.]);
        let shifted = Tensor::new(vec![2, 2], vec![1.5, 9., -3., 1001.]);
        assert!(compare(&shifted, &gold, tolerance).unwrap().is_match());

        let one_off = Tensor::new(vec![2, 2], vec![1.5, 9., -3., 1001.25]);
        let result = compare(&one_off, &gold, tolerance).unwrap();
        assert_eq!(result.mismatches.len(), 1);
        assert_eq!(result.mismatches[0].position, vec![1, 1]);
    }

    #[test]
    fn test_relative_term() {
        let tolerance = Tolerance { atol: 0., rtol: 0.01 };
        assert!(tolerance.is_close(101., 100.));
        assert!(!tolerance.is_close(102., 100.));
    }

    #[test]
    fn test_special_values() {
        let tolerance = Tolerance::default();
        assert!(tolerance.is_close(f64::NAN, f64::NAN));
        assert!(!tolerance.is_close(f64::NAN, 1.));
        assert!(!tolerance.is_close(1., f64::NAN));
        assert!(tolerance.is_close(f64::INFINITY, f64::INFINITY));
        assert!(!tolerance.is_close(f64::INFINITY, f64::NEG_INFINITY));
        assert!(!tolerance.is_close(f64::INFINITY, 1e308));
    }

    #[test]
    fn test_shape_mismatch() {
        let result = compare(&row(vec![1., 2.]), &row(vec![1., 2., 3.]), Tolerance::default());
        assert_eq!(
            result.unwrap_err(),
            ShapeMismatch {
                actual: vec![1, 2],
                desired: vec![1, 3]
            }
        );
        let transposed = Tensor::new(vec![3, 1], vec![1., 2., 3.]);
        assert!(compare(&transposed, &row(vec![1., 2., 3.]), Tolerance::default()).is_err());
    }

    #[test]
    fn test_scalar_broadcast() {
        let scalar = Tensor::new(vec![], vec![2.]);
        let result = compare(&row(vec![1.5, 2., 5.]), &scalar, Tolerance::default()).unwrap();
        assert_eq!(result.shape, vec![1, 3]);
        assert_eq!(result.mismatches.len(), 1);
        assert_eq!(result.mismatches[0].position, vec![0, 2]);
    }

    #[test]
    fn test_empty() {
        let empty = Tensor::from_rows(vec![]);
        let result = compare(&empty, &empty, Tolerance::default()).unwrap();
        assert!(result.is_match());
        assert_eq!(result.total(), 0);
    }

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(1, 3), "33.3");
        assert_eq!(percentage(1, 2), "50");
        assert_eq!(percentage(1, 15), "6.67");
        assert_eq!(percentage(3, 3), "100");
        assert_eq!(percentage(1, 1000), "0.1");
        assert_eq!(percentage(2, 3), "66.7");
    }

    #[test]
    fn test_diagnostic() {
        let gold = row(vec![1., 2., 3.]);
        let result = compare(&row(vec![2.5, 2.5, 3.5]), &gold, Tolerance::default()).unwrap();
        let text = result.to_string();
        assert!(text.starts_with("Not equal to tolerance rtol=1e-7, atol=1\n"));
        assert!(text.contains("Mismatched elements: 1 / 3 (33.3%)"));
        assert!(text.contains("Max absolute difference: 1.5"));
        assert!(text.contains("at (0, 0): actual 2.5, desired 1, difference 1.5"));
    }
}
