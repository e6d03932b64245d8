// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Unit conversions the query tables declare.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UnitError {
    #[error("empty memory size")]
    Empty,
    #[error("invalid number in memory size: {0}")]
    InvalidNumber(String),
    #[error("unknown memory suffix: {0}")]
    UnknownSuffix(String),
    #[error("memory size overflows: {0}")]
    Overflow(String),
}

/// Parse a memory-size reading like `"80MB"` or `"64kB"` into bytes.
///
/// Suffixes are matched case-insensitively and multiply by powers of 1024.
/// A bare number passes through unchanged.
pub fn parse_memory_bytes(raw: &str) -> Result<i64, UnitError> {
    let s = raw.trim();
    if s.is_empty() {
        return Err(UnitError::Empty);
    }

    let split = s
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    let (num_str, suffix) = s.split_at(split);

    let num: i64 = num_str.parse().map_err(|_| UnitError::InvalidNumber(raw.to_string()))?;

    let shift = match suffix.trim().to_ascii_lowercase().as_str() {
        "" | "b" => 0u32,
        "kb" | "k" => 10,
        "mb" | "m" => 20,
        "gb" | "g" => 30,
        "tb" | "t" => 40,
        other => return Err(UnitError::UnknownSuffix(other.to_string())),
    };

    num.checked_mul(1i64 << shift).ok_or_else(|| UnitError::Overflow(raw.to_string()))
}

/// Extract the zone tag from a reverse-DNS FQDN.
///
/// `"host.us-central1-a.c.proj.internal."` yields `"us-central1-a"` — the
/// second dotted component. Returns `None` when the name has fewer than two
/// components.
pub fn zone_from_fqdn(fqdn: &str) -> Option<String> {
    let trimmed = fqdn.trim().trim_end_matches('.');
    let mut parts = trimmed.split('.');
    let _host = parts.next()?;
    let zone = parts.next()?;
    if zone.is_empty() {
        return None;
    }
    Some(zone.to_string())
}

#[cfg(test)]
#[path = "units_tests.rs"]
mod tests;
