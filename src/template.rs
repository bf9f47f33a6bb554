//! Reader for existing `template.lua` files written by the GUI editor.
//!
//! This is not a Lua parser. It picks out `require` lines and the
//! `<wrapper>.<control> { ... },<depth>,` blocks of the flatten template,
//! which is enough to summarise a reference file and count its controls.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::ast::Value;
use crate::parser::brace_delta;

static REQUIRE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"local\s+(\w+)\s*=\s*require\s+'([^']+)'").expect("require pattern is valid")
});

static ITEM_HEAD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\w+)\.(\w+)\s*\{$").expect("item head pattern is valid"));

static ITEM_TAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\}\s*,\s*(\d+)\s*,?$").expect("item tail pattern is valid"));

static PROPERTY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\w+)\s*=\s*(.+)$").expect("property pattern is valid"));

#[derive(Debug, Clone, PartialEq)]
pub struct RequireLine {
    pub var: String,
    pub module: String,
}

/// One control block. Nested tables are kept as their raw text.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateItem {
    pub wrapper_id: String,
    pub control_type: String,
    pub properties: IndexMap<String, Value>,
    pub depth: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateModule {
    pub requires: Vec<RequireLine>,
    pub items: Vec<TemplateItem>,
}

impl TemplateModule {
    /// Values of the `name` property, in block order.
    pub fn control_names(&self) -> Vec<&str> {
        self.items
            .iter()
            .map(|item| item.properties.get("name").and_then(Value::as_str).unwrap_or(""))
            .collect()
    }
}

struct PendingItem {
    wrapper_id: String,
    control_type: String,
    properties: IndexMap<String, Value>,
    /// A multi-line table property: key, raw lines, open brace count.
    open_table: Option<(String, Vec<String>, i64)>,
}

pub fn read_template(text: &str) -> TemplateModule {
    let requires = REQUIRE_RE
        .captures_iter(text)
        .map(|caps| RequireLine {
            var: caps[1].to_string(),
            module: caps[2].to_string(),
        })
        .collect();

    let Some(start) = text.find("flatten_template") else {
        return TemplateModule { requires, items: Vec::new() };
    };

    let mut items = Vec::new();
    let mut current: Option<PendingItem> = None;

    for raw in text[start..].lines() {
        let line = strip_comment(raw).trim();
        if line.is_empty() {
            continue;
        }

        let Some(item) = current.as_mut() else {
            if let Some(caps) = ITEM_HEAD_RE.captures(line) {
                current = Some(PendingItem {
                    wrapper_id: caps[1].to_string(),
                    control_type: caps[2].to_string(),
                    properties: IndexMap::new(),
                    open_table: None,
                });
            }
            continue;
        };

        if let Some((key, lines, depth)) = item.open_table.as_mut() {
            lines.push(line.to_string());
            *depth += brace_delta(line);
            if *depth <= 0 {
                let raw_table = lines.join("\n");
                let raw_table = raw_table.trim_end_matches(',').to_string();
                item.properties.insert(key.clone(), Value::String(raw_table));
                item.open_table = None;
            }
            continue;
        }

        if let Some(caps) = ITEM_TAIL_RE.captures(line) {
            let depth = caps[1].parse().unwrap_or(0);
            if let Some(done) = current.take() {
                items.push(TemplateItem {
                    wrapper_id: done.wrapper_id,
                    control_type: done.control_type,
                    properties: done.properties,
                    depth,
                });
            }
            continue;
        }

        if let Some(caps) = PROPERTY_RE.captures(line) {
            let key = caps[1].to_string();
            let value = caps[2].trim().trim_end_matches(',').trim();
            let open = brace_delta(value);

            if value.starts_with('{') && open > 0 {
                item.open_table = Some((key, vec![value.to_string()], open));
            } else {
                item.properties.insert(key, parse_scalar(value));
            }
        }
    }

    TemplateModule { requires, items }
}

fn strip_comment(line: &str) -> &str {
    match line.find("--") {
        Some(pos) => &line[..pos],
        None => line,
    }
}

fn parse_scalar(text: &str) -> Value {
    if text.len() >= 2 && text.starts_with('\'') && text.ends_with('\'') {
        return Value::String(text[1..text.len() - 1].to_string());
    }

    match text {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }

    if text.contains('.') {
        if let Ok(f) = text.parse::<f64>() {
            return Value::Float(f);
        }
    } else if let Ok(i) = text.parse::<i64>() {
        return Value::Int(i);
    }

    Value::String(text.to_string())
}
