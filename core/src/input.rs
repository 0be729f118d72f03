use anyhow::{anyhow, Result};

use crate::model::booking::Category;

pub const ROW_SPEC_KEYS: [&str; 4] = ["category", "from", "to", "price"];

#[derive(Debug, PartialEq)]
pub struct ParsedInput {
    pub free_text: String,
    /// `key:value` pairs in the order they were given.
    pub metadata: Vec<(String, String)>,
}

/// One row of the form described on the command line, e.g.
/// `cat:voll from:01.03.2024 to:05.03.2024 price:99,5`.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RowSpec {
    pub category: Option<Category>,
    pub start_date: String,
    pub end_date: String,
    pub price: Option<String>,
}

pub fn parse_args(args: &[String]) -> ParsedInput {
    let mut free_parts = Vec::new();
    let mut metadata = Vec::new();

    for arg in args {
        if let Some((key, value)) = arg.split_once(':') {
            if !key.is_empty() {
                metadata.push((key.to_string(), value.to_string()));
                continue;
            }
        }
        free_parts.push(arg.as_str());
    }

    ParsedInput {
        free_text: free_parts.join(" "),
        metadata,
    }
}

pub fn expand_key(key: &str, candidates: &[&str]) -> Result<String> {
    // 1. Exact match
    if candidates.contains(&key) {
        return Ok(key.to_string());
    }

    // 2. Prefix match
    let matches: Vec<&str> = candidates
        .iter()
        .filter(|&&c| c.starts_with(key))
        .cloned()
        .collect();

    match matches.len() {
        1 => Ok(matches[0].to_string()),
        0 => Err(anyhow!("Unknown key: '{}'", key)),
        _ => Err(anyhow!("Ambiguous key: '{}' matches {:?}", key, matches)),
    }
}

pub fn parse_row_spec(spec: &str) -> Result<RowSpec> {
    let args: Vec<String> = spec.split_whitespace().map(|s| s.to_string()).collect();
    let parsed = parse_args(&args);

    if !parsed.free_text.is_empty() {
        return Err(anyhow!(
            "Unexpected text '{}' in row '{}' (expected key:value)",
            parsed.free_text,
            spec
        ));
    }

    let mut row = RowSpec::default();
    let mut seen: Vec<String> = Vec::new();
    for (key, value) in parsed.metadata {
        let full_key = expand_key(&key.to_lowercase(), &ROW_SPEC_KEYS)?;
        if seen.contains(&full_key) {
            return Err(anyhow!("Duplicate key '{}' in row '{}'", full_key, spec));
        }
        seen.push(full_key.clone());
        match full_key.as_str() {
            "category" => row.category = Some(value.parse()?),
            "from" => row.start_date = value,
            "to" => row.end_date = value,
            "price" => row.price = Some(value),
            _ => {}
        }
    }
    Ok(row)
}
