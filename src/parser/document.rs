use once_cell::sync::Lazy;
use regex::Regex;

use super::*;

static SECTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[([^\]]+)\]").expect("section pattern is valid"));

static ASSIGN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^'([^']+)'\s*=\s*(.*)$").expect("assignment pattern is valid"));

pub(super) fn feed_line(parser: &mut Parser, line: &str) {
    let trimmed = line.trim();

    // Comments and blank lines are skipped even inside a multi-line value
    if trimmed.is_empty() || trimmed.starts_with("--") {
        return;
    }

    if matches!(parser.state, State::Collecting { .. }) {
        collect_line(parser, line, trimmed);
        return;
    }

    if let Some(caps) = SECTION_RE.captures(trimmed) {
        parser.commit_section();
        parser.section = Some((unquote(&caps[1]).to_string(), Table::new()));
        return;
    }

    let Some((_, data)) = parser.section.as_mut() else {
        return;
    };

    let Some(caps) = ASSIGN_RE.captures(trimmed) else {
        return;
    };

    let key = caps[1].to_string();
    let rest = caps.get(2).map_or("", |m| m.as_str());

    match parse_value(rest) {
        ParsedValue::Complete(value) => insert_field(data, key, value),
        ParsedValue::Incomplete => {
            parser.state = State::Collecting {
                key,
                buffer: vec![rest.to_string()],
                depth: brace_delta(rest),
            };
        }
    }
}

fn collect_line(parser: &mut Parser, line: &str, trimmed: &str) {
    let State::Collecting { buffer, depth, .. } = &mut parser.state else {
        return;
    };

    buffer.push(line.to_string());
    *depth += brace_delta(trimmed);
    if *depth > 0 {
        return;
    }

    let State::Collecting { key, buffer, .. } = std::mem::replace(&mut parser.state, State::Idle)
    else {
        return;
    };

    let value = match parse_value(&buffer.join("\n")) {
        ParsedValue::Complete(value) => value,
        ParsedValue::Incomplete => Value::Nil,
    };

    if let Some((_, data)) = parser.section.as_mut() {
        insert_field(data, key, value);
    }
}

/// Strip one pair of surrounding single quotes, if present.
pub(crate) fn unquote(text: &str) -> &str {
    if text.starts_with('\'') && text.ends_with('\'') {
        if text.len() >= 2 { &text[1..text.len() - 1] } else { "" }
    } else {
        text
    }
}
