use crate::cfg;
use crate::tensor::Tensor;

use anyhow::Context;
use log::{debug, info};
use std::path::Path;
use thiserror::Error;

/// Structural problems of a CMG text report. Line numbers are 1-based.
#[derive(Debug, Error, PartialEq)]
pub enum MalformedReportError {
    #[error("marker line {line} is the last line of the report")]
    MarkerAtEnd { line: usize },
    #[error("line {line} has {tokens} token(s), expected at least 2")]
    ShortLine { line: usize, tokens: usize },
    #[error("line {line}: {token:?} is not a number")]
    InvalidNumber { line: usize, token: String },
    #[error("line {line} holds {found} value(s) but earlier rows hold {expected}")]
    RaggedRows {
        line: usize,
        expected: usize,
        found: usize,
    },
}

pub fn cleanup(line: &str) -> Vec<&str> {
    line.trim().split_whitespace().collect()
}

// splits on \n, \r\n and a bare \r, like universal newline reading
fn report_lines(content: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut rest = content;
    while !rest.is_empty() {
        match rest.find(|c: char| c == '\r' || c == '\n') {
            Some(end) => {
                lines.push(&rest[..end]);
                let terminator = if rest[end..].starts_with("\r\n") { 2 } else { 1 };
                rest = &rest[end + terminator..];
            }
            None => {
                lines.push(rest);
                rest = "";
            }
        }
    }
    lines
}

fn parse_row(tokens: &[&str], line: usize) -> Result<Vec<f64>, MalformedReportError> {
    tokens
        .iter()
        .map(|token| {
            token
                .parse::<f64>()
                .map_err(|_| MalformedReportError::InvalidNumber {
                    line,
                    token: token.to_string(),
                })
        })
        .collect()
}

/// Extracts every row following a marker line into a `(rows, columns)` matrix.
pub fn parse_report(content: &str) -> Result<Tensor, MalformedReportError> {
    let raw_content = report_lines(content);
    let mut pressure: Vec<Vec<f64>> = Vec::new();

    for (i, line) in raw_content.iter().enumerate() {
        let clean_line = cleanup(line);
        if clean_line.is_empty() {
            continue;
        }
        if clean_line.len() < 2 {
            return Err(MalformedReportError::ShortLine {
                line: i + 1,
                tokens: clean_line.len(),
            });
        }
        if clean_line[1] != cfg::MARKER_TOKEN {
            continue;
        }

        let next = raw_content
            .get(i + 1)
            .ok_or(MalformedReportError::MarkerAtEnd { line: i + 1 })?;
        let row = parse_row(&cleanup(next), i + 2)?;
        if let Some(first) = pressure.first() {
            if first.len() != row.len() {
                return Err(MalformedReportError::RaggedRows {
                    line: i + 2,
                    expected: first.len(),
                    found: row.len(),
                });
            }
        }
        debug!("row {} from line {}: {} values", pressure.len(), i + 2, row.len());
        pressure.push(row);
    }

    Ok(Tensor::from_rows(pressure))
}

pub fn load_report<P: AsRef<Path>>(path: P) -> anyhow::Result<Tensor> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading report {}", path.display()))?;
    let pressure = parse_report(&content)
        .with_context(|| format!("parsing report {}", path.display()))?;
    info!(
        "parsed {} pressures from {} with shape {:?}",
        pressure.get_size(),
        path.display(),
        pressure.get_shape()
    );
    Ok(pressure)
}
