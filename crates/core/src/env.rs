//! Typed option lookup from environment variables with per-key defaults.
//!
//! Each `option_*` accessor reads one variable and falls back to the
//! caller's default when the variable is unset, empty, or unparseable.
//! The matching `parse_*` function holds the actual rule and works on an
//! already-fetched value, so callers and tests can resolve options without
//! touching process state.
//!
//! `option_u64` is the odd one out: an unparseable value yields `0`, not
//! the default. Existing deployments rely on that, so it is kept.

/// Fetch `key`, treating an empty value the same as an unset one.
fn lookup(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

// ---------------------------------------------------------------------------
// Pure resolution rules
// ---------------------------------------------------------------------------

pub fn parse_string(raw: Option<&str>, default: &str) -> String {
    match raw {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => default.to_string(),
    }
}

pub fn parse_int(raw: Option<&str>, default: i64) -> i64 {
    match raw {
        Some(v) if !v.is_empty() => v.parse().unwrap_or(default),
        _ => default,
    }
}

pub fn parse_u64(raw: Option<&str>, default: u64) -> u64 {
    match raw {
        Some(v) if !v.is_empty() => v.parse().unwrap_or(0),
        _ => default,
    }
}

/// Accepts `1 t T TRUE true True` and `0 f F FALSE false False`.
pub fn parse_bool_value(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

pub fn parse_bool(raw: Option<&str>, default: bool) -> bool {
    match raw {
        Some(v) if !v.is_empty() => parse_bool_value(v).unwrap_or(default),
        _ => default,
    }
}

/// Split on `,` without trimming, so `"a, b"` yields `["a", " b"]`.
pub fn parse_string_list(raw: Option<&str>, default: &[String]) -> Vec<String> {
    match raw {
        Some(v) if !v.is_empty() => v.split(',').map(str::to_string).collect(),
        _ => default.to_vec(),
    }
}

// ---------------------------------------------------------------------------
// Environment accessors
// ---------------------------------------------------------------------------

pub fn option_string(key: &str, default: &str) -> String {
    parse_string(lookup(key).as_deref(), default)
}

pub fn option_int(key: &str, default: i64) -> i64 {
    parse_int(lookup(key).as_deref(), default)
}

pub fn option_u64(key: &str, default: u64) -> u64 {
    parse_u64(lookup(key).as_deref(), default)
}

pub fn option_bool(key: &str, default: bool) -> bool {
    let raw = lookup(key);
    if let Some(value) = raw.as_deref() {
        tracing::debug!(key, value, "Resolving boolean option");
    }
    parse_bool(raw.as_deref(), default)
}

pub fn option_string_list(key: &str, default: &[String]) -> Vec<String> {
    parse_string_list(lookup(key).as_deref(), default)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
