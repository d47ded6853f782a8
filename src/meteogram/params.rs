use serde_json::Value;
use std::collections::HashMap;

use super::types::Dataset;

/// Lookup table from parameter name to its positional dataset key. The
/// paramlist order defines the positions; lookups for names the payload does
/// not carry return None, which downstream reads turn into null-filled
/// output rather than an error.
#[derive(Debug, Clone)]
pub struct ParamIndex {
    positions: HashMap<String, String>,
}

impl ParamIndex {
    pub fn new(paramlist: &[String]) -> Self {
        let positions = paramlist
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i.to_string()))
            .collect();
        Self { positions }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.positions.get(name).map(String::as_str)
    }
}

/// Full time-aligned numeric series for one parameter: exactly `length`
/// entries, None wherever the position is unknown, the row is missing or the
/// value does not coerce to a finite number.
pub fn read_series(dataset: &Dataset, position: Option<&str>, length: usize) -> Vec<Option<f64>> {
    (0..length)
        .map(|i| read_cell_number(dataset, position, i))
        .collect()
}

/// String-valued counterpart of `read_series`, for cardinal labels and icon
/// codes.
pub fn read_string_series(
    dataset: &Dataset,
    position: Option<&str>,
    length: usize,
) -> Vec<Option<String>> {
    (0..length)
        .map(|i| read_cell_string(dataset, position, i))
        .collect()
}

/// Single numeric cell, used when joining a secondary dataset by its own
/// time index instead of materializing an aligned series.
pub fn read_cell_number(dataset: &Dataset, position: Option<&str>, index: usize) -> Option<f64> {
    raw_cell(dataset, position, index).and_then(coerce_number)
}

pub fn read_cell_string(dataset: &Dataset, position: Option<&str>, index: usize) -> Option<String> {
    raw_cell(dataset, position, index).and_then(coerce_string)
}

fn raw_cell<'a>(dataset: &'a Dataset, position: Option<&str>, index: usize) -> Option<&'a Value> {
    dataset.get(position?)?.get(&index.to_string())
}

/// The provider mixes numbers and stringified numbers in the same row.
/// Anything that does not parse to a finite f64 becomes None; NaN and
/// infinities never leak downstream.
fn coerce_number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    parsed.is_finite().then_some(parsed)
}

fn coerce_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        // Icon codes occasionally arrive as bare numbers.
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
