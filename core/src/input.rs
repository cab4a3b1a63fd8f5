use std::collections::HashMap;

use crate::error::{Result, TrackerError};
use crate::model::reading::{is_valid_month, MONTH_NAMES};

const ENTRY_KEYS: [&str; 3] = ["month", "electricity", "gas"];

#[derive(Debug, PartialEq)]
pub struct ParsedInput {
    pub positional: Vec<String>,
    pub metadata: HashMap<String, String>,
}

/// Splits `key:value` pairs from positional words.
pub fn parse_args(args: &[String]) -> ParsedInput {
    let mut positional = Vec::new();
    let mut metadata = HashMap::new();

    for arg in args {
        if let Some((key, value)) = arg.split_once(':') {
            if !key.is_empty() {
                metadata.insert(key.to_string(), value.to_string());
                continue;
            }
        }
        positional.push(arg.clone());
    }

    ParsedInput { positional, metadata }
}

/// Resolves an exact or unambiguous prefix of one of `candidates`, ignoring case.
pub fn expand_key(key: &str, candidates: &[&str]) -> Result<String> {
    let key = key.to_lowercase();
    if key.is_empty() {
        return Err(TrackerError::invalid_input("Empty key"));
    }

    // 1. Exact match
    if let Some(exact) = candidates.iter().find(|c| c.to_lowercase() == key) {
        return Ok(exact.to_string());
    }

    // 2. Prefix match
    let matches: Vec<&str> = candidates
        .iter()
        .filter(|c| c.to_lowercase().starts_with(&key))
        .cloned()
        .collect();

    match matches.len() {
        1 => Ok(matches[0].to_string()),
        0 => Err(TrackerError::invalid_input(format!("Unknown key: '{}'", key))),
        _ => Err(TrackerError::invalid_input(format!(
            "Ambiguous key: '{}' matches {:?}",
            key, matches
        ))),
    }
}

/// A finite number; `label` names the field in the error message.
pub fn parse_reading(input: &str, label: &str) -> Result<f64> {
    match input.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(TrackerError::invalid_input(format!(
            "Please enter a valid {} reading.",
            label
        ))),
    }
}

/// Month index `0`-`11`, or an English month name / unambiguous prefix of one.
pub fn parse_month(input: &str) -> Result<u32> {
    let input = input.trim();
    if let Ok(index) = input.parse::<u32>() {
        if is_valid_month(index) {
            return Ok(index);
        }
        return Err(TrackerError::invalid_input(format!(
            "Month index must be between 0 and 11, got {}",
            index
        )));
    }

    let name = expand_key(input, &MONTH_NAMES)
        .map_err(|_| TrackerError::invalid_input(format!("Unknown month: '{}'", input)))?;
    let index = MONTH_NAMES
        .iter()
        .position(|m| *m == name)
        .ok_or_else(|| TrackerError::invalid_input(format!("Unknown month: '{}'", input)))?;
    Ok(index as u32)
}

/// A positive integer year.
pub fn parse_year(input: &str) -> Result<i32> {
    match input.trim().parse::<i32>() {
        Ok(year) if year > 0 => Ok(year),
        _ => Err(TrackerError::invalid_input("Please enter a valid year.")),
    }
}

/// Values typed into the reading form.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryForm {
    pub month: Option<u32>,
    pub electricity: f64,
    pub gas: f64,
}

/// Parses `<month> <electricity> <gas>`, `<electricity> <gas>`, or the
/// `m:`/`e:`/`g:` key forms (keys may be abbreviated).
pub fn parse_entry_line(line: &str) -> Result<EntryForm> {
    let args: Vec<String> = line.split_whitespace().map(|s| s.to_string()).collect();
    let parsed = parse_args(&args);

    let mut fields: HashMap<String, String> = HashMap::new();
    match parsed.positional.len() {
        0 => {}
        2 => {
            fields.insert("electricity".to_string(), parsed.positional[0].clone());
            fields.insert("gas".to_string(), parsed.positional[1].clone());
        }
        3 => {
            fields.insert("month".to_string(), parsed.positional[0].clone());
            fields.insert("electricity".to_string(), parsed.positional[1].clone());
            fields.insert("gas".to_string(), parsed.positional[2].clone());
        }
        n => {
            return Err(TrackerError::invalid_input(format!(
                "Expected '<month> <electricity> <gas>', got {} values",
                n
            )))
        }
    }

    for (key, value) in parsed.metadata {
        let full_key = expand_key(&key, &ENTRY_KEYS)?;
        fields.insert(full_key, value);
    }

    let month = fields.get("month").map(|m| parse_month(m)).transpose()?;
    let electricity = parse_reading(
        fields.get("electricity").map(String::as_str).unwrap_or(""),
        "electricity",
    )?;
    let gas = parse_reading(fields.get("gas").map(String::as_str).unwrap_or(""), "gas")?;

    Ok(EntryForm { month, electricity, gas })
}
