use once_cell::sync::Lazy;
use regex::Regex;

use super::*;
use super::document::unquote;

static STRING_PAIR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^'([^']+)'\s*=\s*(.+)$").expect("string pair pattern is valid"));

static INT_PAIR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^([0-9]+)\s*=\s*(.+)$").expect("integer pair pattern is valid"));

/// Outcome of parsing a value's text.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedValue {
    Complete(Value),
    /// A table whose braces do not balance yet.
    Incomplete,
}

/// Parse a scalar or table value. First match wins:
/// `#NIL`, quoted string, number, bool, table, then the raw text.
pub fn parse_value(text: &str) -> ParsedValue {
    let text = text.trim();

    if text == "#NIL" {
        return ParsedValue::Complete(Value::Nil);
    }

    if text.starts_with('\'') && text.ends_with('\'') {
        return ParsedValue::Complete(Value::String(unquote(text).to_string()));
    }

    if let Some(number) = parse_number(text) {
        return ParsedValue::Complete(number);
    }

    match text {
        "true" => return ParsedValue::Complete(Value::Bool(true)),
        "false" => return ParsedValue::Complete(Value::Bool(false)),
        _ => {}
    }

    if text.starts_with('{') {
        if brace_delta(text) == 0 {
            return ParsedValue::Complete(Value::Table(parse_table(text)));
        }
        return ParsedValue::Incomplete;
    }

    ParsedValue::Complete(Value::String(text.to_string()))
}

/// Integers outside i64 are not numbers here; they stay raw text.
fn parse_number(text: &str) -> Option<Value> {
    if text.contains('.') {
        text.parse::<f64>().ok().map(Value::Float)
    } else {
        text.parse::<i64>().ok().map(Value::Int)
    }
}

/// Parse `{ 'key' = value, 1 = value, ... }`. Anything that is not wrapped
/// in braces yields an empty table; unrecognised fragments are skipped.
pub fn parse_table(text: &str) -> Table {
    let mut table = Table::new();
    let text = text.trim();

    if !text.starts_with('{') || !text.ends_with('}') || text.len() < 2 {
        return table;
    }

    let inner = text[1..text.len() - 1].trim();
    if inner.is_empty() {
        return table;
    }

    for pair in split_table_pairs(inner) {
        let pair = pair.trim();
        if pair.is_empty() {
            continue;
        }

        if let Some(caps) = STRING_PAIR_RE.captures(pair) {
            table.insert(TableKey::Str(caps[1].to_string()), nested_value(&caps[2]));
            continue;
        }

        if let Some(caps) = INT_PAIR_RE.captures(pair) {
            if let Ok(index) = caps[1].parse::<i64>() {
                table.insert(TableKey::Int(index), nested_value(&caps[2]));
            }
        }
    }

    table
}

fn nested_value(text: &str) -> Value {
    match parse_value(text) {
        ParsedValue::Complete(value) => value,
        ParsedValue::Incomplete => Value::Nil,
    }
}

/// Split table contents on commas that are not inside nested braces.
pub fn split_table_pairs(inner: &str) -> Vec<&str> {
    let mut pairs = Vec::new();
    let mut depth: i64 = 0;
    let mut start = 0;

    for (i, ch) in inner.char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => depth -= 1,
            ',' if depth == 0 => {
                pairs.push(&inner[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }

    if start < inner.len() {
        pairs.push(&inner[start..]);
    }

    pairs
}
