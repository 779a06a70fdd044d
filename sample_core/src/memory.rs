//! Human readable memory sizes, base 1024.
//!
//! Accepted forms are `<digits>B`, `<number>KB`, `<number>MB` and `<number>GB`.
//! Units are case-sensitive.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};

const KB: f64 = 1024.0;
const MB: f64 = KB * 1024.0;
const GB: f64 = MB * 1024.0;

static MEMORY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(?P<bytes>\d+)B|(?P<value>\d+(?:\.\d+)?)(?P<unit>KB|MB|GB))$").unwrap()
});

/// Parse a size such as `256MB` into bytes.
pub fn parse_memory(mem: &str) -> Result<f64> {
    let caps = MEMORY_PATTERN
        .captures(mem)
        .ok_or_else(|| Error::Format(mem.to_string()))?;

    if let Some(bytes) = caps.name("bytes") {
        return parse_number(bytes.as_str(), mem);
    }

    let value = parse_number(&caps["value"], mem)?;
    let scale = match &caps["unit"] {
        "KB" => KB,
        "MB" => MB,
        _ => GB,
    };
    Ok(value * scale)
}

/// Render bytes using the largest unit the value reaches.
pub fn format_memory(mem: f64) -> String {
    if mem < KB {
        format!("{}B", mem)
    } else if mem < MB {
        format!("{}KB", mem / KB)
    } else if mem < GB {
        format!("{}MB", mem / MB)
    } else {
        format!("{}GB", mem / GB)
    }
}

fn parse_number(number: &str, origin: &str) -> Result<f64> {
    number
        .parse::<f64>()
        .map_err(|_| Error::Format(origin.to_string()))
}
