// Author: Dustin Pilgrim
// License: MIT

//! Lua writer for flattened templates.
//!
//! Output must match what the GUI editor generates, so key order is fixed
//! rather than alphabetical:
//!
//! 1. `CustomString`, `__EDIT_TIME`
//! 2. every other key, alphabetically
//! 3. `name`
//! 4. `offset_percent` … `round_corner_radius`, alphabetically
//! 5. `show`
//! 6. `text_input`, `view_mode`
//! 7. `z_index`

use indexmap::{IndexMap, IndexSet};

use crate::ast::{Table, TableKey, Value};
use crate::convert::{module_path, FlatItem};

const HEADER: &str = "-- THIS FILE IS AUTO-GENERATED, WOULD BE OVERWRITTEN BY GUI-EDITOR";

const PREAMBLE: [&str; 8] = [
    "local component = require '@common.base.gui.component'",
    "local bind = component.bind",
    "local call = component.call",
    "local gui_pkg = require '@common.base.gui.package'",
    "local get_text = gui_pkg.get_text() or get_text",
    "local on_player_prop = require '@common.base.gui.on_player_prop'",
    "local on_unit_prop = require '@common.base.gui.on_unit_prop'",
    "local ctrl_wrapper = require '@common.base.gui.ctrl_wrapper'",
];

/// Wrappers imported after the preamble, in this order, when used.
pub const CONDITIONAL_IMPORTS: [&str; 4] =
    ["lib_game_options", "smallcard_inventory", "lib_control", "gameui"];

const LEADING_KEYS: [&str; 2] = ["CustomString", "__EDIT_TIME"];
const AFTER_NAME_KEYS: [&str; 7] = [
    "offset_percent",
    "particle_scale",
    "particle_size",
    "placeholder",
    "play",
    "progress",
    "round_corner_radius",
];
const AFTER_SHOW_KEYS: [&str; 2] = ["text_input", "view_mode"];

const LAYOUT_ORDER: [&str; 8] = [
    "col_self",
    "grow_height",
    "grow_width",
    "height",
    "position",
    "relative",
    "row_self",
    "width",
];

const ITEM_INDENT: usize = 8;
const PROPERTY_INDENT: usize = 12;

/// Render flattened items as a `template.lua` module.
pub fn render(items: &[FlatItem]) -> String {
    let used: IndexSet<&str> = items.iter().map(|item| item.wrapper_id.as_str()).collect();

    let mut lines: Vec<String> = Vec::new();
    lines.push(HEADER.to_string());
    lines.extend(PREAMBLE.iter().map(|line| line.to_string()));
    lines.push(String::new());

    for wrapper in CONDITIONAL_IMPORTS {
        if !used.contains(wrapper) {
            continue;
        }
        if let Some(path) = module_path(wrapper) {
            lines.push(format!("local {} = require '{}'", wrapper, path));
        }
    }
    lines.push(String::new());

    lines.push("return gui_pkg.page_template {".to_string());
    lines.push("    flatten_template = {".to_string());
    for item in items {
        lines.push(render_item(item));
    }
    lines.push("    }".to_string());
    lines.push("}".to_string());

    lines.join("\n")
}

fn render_item(item: &FlatItem) -> String {
    let indent = " ".repeat(ITEM_INDENT);
    let mut lines = vec![format!("{}{}.{} {{", indent, item.wrapper_id, item.control_type)];

    for key in ordered_keys(&item.properties) {
        if let Some(line) = item
            .properties
            .get(key)
            .and_then(|value| format_property(key, value, PROPERTY_INDENT))
        {
            lines.push(line);
        }
    }

    lines.push(format!("{}}},{},", indent, item.depth));
    lines.join("\n")
}

/// Property keys in output order.
pub fn ordered_keys(props: &IndexMap<String, Value>) -> Vec<&str> {
    let present = |key: &&str| props.contains_key(*key);
    let mut keys: Vec<&str> = LEADING_KEYS.iter().copied().filter(present).collect();

    let mut rest: Vec<&str> = props
        .keys()
        .map(String::as_str)
        .filter(|key| !is_positioned_key(key))
        .collect();
    rest.sort_unstable();
    keys.extend(rest);

    if props.contains_key("name") {
        keys.push("name");
    }

    let mut after_name: Vec<&str> = AFTER_NAME_KEYS.iter().copied().filter(present).collect();
    after_name.sort_unstable();
    keys.extend(after_name);

    if props.contains_key("show") {
        keys.push("show");
    }

    let mut after_show: Vec<&str> = AFTER_SHOW_KEYS.iter().copied().filter(present).collect();
    after_show.sort_unstable();
    keys.extend(after_show);

    if props.contains_key("z_index") {
        keys.push("z_index");
    }

    keys
}

fn is_positioned_key(key: &str) -> bool {
    LEADING_KEYS.contains(&key)
        || AFTER_NAME_KEYS.contains(&key)
        || AFTER_SHOW_KEYS.contains(&key)
        || matches!(key, "name" | "show" | "z_index")
}

/// One `key = value,` entry. `Nil` produces no line.
fn format_property(key: &str, value: &Value, indent: usize) -> Option<String> {
    let pad = " ".repeat(indent);

    match value {
        Value::Nil => None,
        Value::Table(table) if table.is_empty() => Some(format!("{}{} = {{}},", pad, key)),
        Value::Table(table) => Some(format_table(key, table, indent)),
        Value::Array(values) => Some(format!("{}{} = {},", pad, key, format_array(values))),
        scalar => scalar_literal(scalar).map(|literal| format!("{}{} = {},", pad, key, literal)),
    }
}

fn format_table(key: &str, table: &Table, indent: usize) -> String {
    let pad = " ".repeat(indent);
    let inner = " ".repeat(indent + 4);
    let mut lines = vec![format!("{}{} = {{", pad, key)];

    for table_key in ordered_table_keys(key, table) {
        let Some(value) = table.get(table_key) else {
            continue;
        };

        match table_key {
            TableKey::Int(index) => {
                // Integer-keyed entries only carry scalars
                if let Some(literal) = scalar_literal(value) {
                    lines.push(format!("{}[{}] = {},", inner, index, literal));
                }
            }
            TableKey::Str(name) => match value {
                Value::Table(nested) if nested.is_empty() => {
                    lines.push(format!("{}{} = {{}},", inner, name));
                }
                Value::Table(nested) => lines.push(format_table(name, nested, indent + 4)),
                other => {
                    if let Some(literal) = scalar_literal(other) {
                        lines.push(format!("{}{} = {},", inner, name, literal));
                    }
                }
            },
        }
    }

    lines.push(format!("{}}},", pad));
    lines.join("\n")
}

/// Keys sorted with strings before integers, except `layout` tables,
/// which list their geometry fields first.
fn ordered_table_keys<'t>(key: &str, table: &'t Table) -> Vec<&'t TableKey> {
    let mut sorted: Vec<&TableKey> = table.keys().collect();
    sorted.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

    if key != "layout" {
        return sorted;
    }

    let mut ordered: Vec<&TableKey> = LAYOUT_ORDER
        .iter()
        .filter_map(|field| table.get_key_value(&TableKey::Str(field.to_string())))
        .map(|(k, _)| k)
        .collect();
    let rest: Vec<&TableKey> = sorted
        .into_iter()
        .filter(|k| !ordered.contains(k))
        .collect();
    ordered.extend(rest);
    ordered
}

/// Arrays of numbers render inline; anything else collapses to `{}`.
fn format_array(values: &[Value]) -> String {
    if !values.iter().all(Value::is_number) {
        return "{}".to_string();
    }

    let parts: Vec<String> = values.iter().filter_map(scalar_literal).collect();
    format!("{{{}}}", parts.join(", "))
}

/// Literal for Bool/Int/Float/String. Bool is matched first so it can
/// never come out as a number.
fn scalar_literal(value: &Value) -> Option<String> {
    match value {
        Value::Bool(b) => Some(b.to_string()),
        Value::String(s) => Some(format!("'{}'", s)),
        Value::Int(i) => Some(i.to_string()),
        Value::Float(f) => Some(format_float(*f)),
        Value::Nil | Value::Table(_) | Value::Array(_) => None,
    }
}

/// Float text the way the editor's generator writes it: `1.0`, `0.25`,
/// `1e-05`, `1e+16`.
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let scientific = format!("{:e}", value);
        if let Some((mantissa, exponent)) = scientific.split_once('e') {
            let exponent: i32 = exponent.parse().unwrap_or(0);
            let sign = if exponent < 0 { '-' } else { '+' };
            return format!("{}e{}{:02}", mantissa, sign, exponent.abs());
        }
        return scientific;
    }

    let plain = value.to_string();
    if plain.contains('.') {
        plain
    } else {
        format!("{}.0", plain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(wrapper: &str, control: &str, depth: usize, props: Vec<(&str, Value)>) -> FlatItem {
        FlatItem {
            wrapper_id: wrapper.to_string(),
            control_type: control.to_string(),
            properties: props.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
            depth,
        }
    }

    fn table(entries: Vec<(TableKey, Value)>) -> Value {
        Value::Table(entries.into_iter().collect())
    }

    #[test]
    fn test_key_order_tiers() {
        let props: IndexMap<String, Value> = [
            ("z_index", Value::Int(5)),
            ("name", Value::String("x".into())),
            ("show", Value::Bool(true)),
            ("CustomString", Value::String("c".into())),
            ("font", Value::String("f".into())),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        assert_eq!(ordered_keys(&props), vec!["CustomString", "font", "name", "show", "z_index"]);
    }

    #[test]
    fn test_key_order_all_tiers() {
        let keys = [
            "view_mode", "z_index", "play", "show", "text_input", "__EDIT_TIME", "name", "color",
            "progress", "CustomString", "auto_scale", "offset_percent",
        ];
        let props: IndexMap<String, Value> =
            keys.iter().map(|k| (k.to_string(), Value::Int(1))).collect();

        assert_eq!(
            ordered_keys(&props),
            vec![
                "CustomString", "__EDIT_TIME", "auto_scale", "color", "name", "offset_percent",
                "play", "progress", "show", "text_input", "view_mode", "z_index",
            ]
        );
    }

    #[test]
    fn test_bool_never_renders_as_number() {
        let label = item("ctrl_wrapper", "label", 0, vec![("show", Value::Bool(true))]);
        let text = render_item(&label);
        assert!(text.contains("            show = true,"));
        assert!(!text.contains("show = 1"));
    }

    #[test]
    fn test_layout_table_order() {
        let layout = table(vec![
            (TableKey::from("width"), Value::Int(10)),
            (TableKey::from("height"), Value::Int(20)),
            (TableKey::from("col_self"), Value::Bool(true)),
            (TableKey::from("anchor"), Value::String("c".into())),
        ]);
        let text = render_item(&item("ctrl_wrapper", "panel", 1, vec![("layout", layout)]));

        let expected = [
            "        ctrl_wrapper.panel {",
            "            layout = {",
            "                col_self = true,",
            "                height = 20,",
            "                width = 10,",
            "                anchor = 'c',",
            "            },",
            "        },1,",
        ]
        .join("\n");
        assert_eq!(text, expected);
    }

    #[test]
    fn test_nested_tables_sort_strings_before_integers() {
        let color = table(vec![
            (TableKey::Int(2), Value::Int(255)),
            (TableKey::from("b"), Value::Float(0.5)),
            (TableKey::Int(1), Value::Bool(false)),
            (TableKey::from("a"), table(vec![])),
            (TableKey::Int(3), table(vec![(TableKey::from("x"), Value::Int(1))])),
            (TableKey::from("skip"), Value::Nil),
        ]);
        let text = format_property("color", &color, 12).expect("table renders");

        let expected = [
            "            color = {",
            "                a = {},",
            "                b = 0.5,",
            "                [1] = false,",
            "                [2] = 255,",
            "            },",
        ]
        .join("\n");
        assert_eq!(text, expected);
    }

    #[test]
    fn test_nested_layout_inside_table() {
        let value = table(vec![(
            TableKey::from("layout"),
            table(vec![
                (TableKey::from("width"), Value::Int(1)),
                (TableKey::from("alpha"), Value::Int(2)),
                (TableKey::from("grow_width"), Value::Bool(true)),
            ]),
        )]);
        let text = format_property("style", &value, 0).expect("table renders");

        assert_eq!(
            text,
            [
                "style = {",
                "    layout = {",
                "        grow_width = true,",
                "        width = 1,",
                "        alpha = 2,",
                "    },",
                "},",
            ]
            .join("\n")
        );
    }

    #[test]
    fn test_arrays() {
        let numbers = Value::Array(vec![Value::Int(1), Value::Float(2.5)]);
        let mixed = Value::Array(vec![Value::Int(1), Value::String("x".into())]);
        let bools = Value::Array(vec![Value::Bool(true)]);

        assert_eq!(format_property("v", &numbers, 0).as_deref(), Some("v = {1, 2.5},"));
        assert_eq!(format_property("v", &mixed, 0).as_deref(), Some("v = {},"));
        assert_eq!(format_property("v", &bools, 0).as_deref(), Some("v = {},"));
        assert_eq!(format_property("v", &Value::Array(vec![]), 0).as_deref(), Some("v = {},"));
        assert_eq!(format_property("v", &Value::Nil, 0), None);
    }

    #[test]
    fn test_float_formatting() {
        assert_eq!(format_float(1.0), "1.0");
        assert_eq!(format_float(0.25), "0.25");
        assert_eq!(format_float(-3.0), "-3.0");
        assert_eq!(format_float(0.00001), "1e-05");
        assert_eq!(format_float(1e16), "1e+16");
        assert_eq!(format_float(123456.5), "123456.5");
    }

    #[test]
    fn test_conditional_imports_follow_fixed_order() {
        let items = vec![
            item("gameui", "button", 0, vec![]),
            item("lib_control", "slider", 1, vec![]),
            item("smallcard_mail", "card", 1, vec![]),
        ];
        let text = render(&items);

        let lib_control = text.find("local lib_control = require '@lib_control.component'");
        let gameui = text.find("local gameui = require '@gameui.component'");
        assert!(lib_control.is_some() && gameui.is_some());
        assert!(lib_control < gameui);
        assert!(!text.contains("smallcard_inventory = require"));
        assert!(!text.contains("smallcard_mail = require"));
        assert!(!text.contains("lib_game_options = require"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let items = vec![item(
            "ctrl_wrapper",
            "label",
            0,
            vec![("text", Value::String("hi".into())), ("z_index", Value::Int(2))],
        )];
        assert_eq!(render(&items), render(&items));
    }

    #[test]
    fn test_empty_render_has_preamble_only() {
        let text = render(&[]);
        let expected = "\
-- THIS FILE IS AUTO-GENERATED, WOULD BE OVERWRITTEN BY GUI-EDITOR
local component = require '@common.base.gui.component'
local bind = component.bind
local call = component.call
local gui_pkg = require '@common.base.gui.package'
local get_text = gui_pkg.get_text() or get_text
local on_player_prop = require '@common.base.gui.on_player_prop'
local on_unit_prop = require '@common.base.gui.on_unit_prop'
local ctrl_wrapper = require '@common.base.gui.ctrl_wrapper'


return gui_pkg.page_template {
    flatten_template = {
    }
}";
        assert_eq!(text, expected);
    }
}
