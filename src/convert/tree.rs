use indexmap::IndexMap;

use crate::ast::{lookup, lookup_table, Document, Table, TableKey, Value};

/// One widget from the entry data, with its children resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetNode {
    pub name: String,
    pub node_type: String,
    pub game_data: Table,
    pub editor_data: Table,
    /// Section names from `Data.Game.children`, in key order.
    pub child_refs: Vec<String>,
    pub children: Vec<WidgetNode>,
}

/// Build the widget tree rooted at the `template` (or `root`) section.
///
/// Returns `None` when the document has neither.
pub fn build_tree(doc: &Document) -> Option<WidgetNode> {
    // First pass: every section becomes a shallow node
    let shallow: IndexMap<&str, WidgetNode> = doc
        .sections
        .iter()
        .map(|(name, data)| (name.as_str(), shallow_node(name, data)))
        .collect();

    let root = ["template", "root"]
        .into_iter()
        .find_map(|name| shallow.get(name))?;

    // Second pass: resolve references, so declaration order does not matter
    let mut path = Vec::new();
    Some(resolve(root, &shallow, &mut path))
}

fn shallow_node(name: &str, data: &Table) -> WidgetNode {
    let node_type = lookup(data, "NodeType")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let (game_data, editor_data) = match lookup_table(data, "Data") {
        Some(section_data) => (
            lookup_table(section_data, "Game").cloned().unwrap_or_default(),
            lookup_table(section_data, "Editor").cloned().unwrap_or_default(),
        ),
        None => (Table::new(), Table::new()),
    };

    let child_refs = lookup_table(&game_data, "children")
        .map(ordered_child_refs)
        .unwrap_or_default();

    WidgetNode {
        name: name.to_string(),
        node_type,
        game_data,
        editor_data,
        child_refs,
        children: Vec::new(),
    }
}

/// Order `children` entries by numeric key. Non-numeric keys sort as 0;
/// the sort is stable so ties keep file order.
fn ordered_child_refs(children: &Table) -> Vec<String> {
    let mut entries: Vec<(i64, &Value)> = children
        .iter()
        .map(|(key, value)| (child_sort_key(key), value))
        .collect();
    entries.sort_by_key(|(order, _)| *order);

    entries
        .into_iter()
        .filter_map(|(_, value)| value.as_str().map(str::to_string))
        .collect()
}

fn child_sort_key(key: &TableKey) -> i64 {
    match key {
        TableKey::Int(i) => *i,
        TableKey::Str(s) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => {
            s.parse().unwrap_or(0)
        }
        TableKey::Str(_) => 0,
    }
}

fn resolve<'a>(
    template: &'a WidgetNode,
    shallow: &'a IndexMap<&str, WidgetNode>,
    path: &mut Vec<&'a str>,
) -> WidgetNode {
    let mut node = template.clone();
    path.push(&template.name);

    for child_ref in &template.child_refs {
        let Some(child) = shallow.get(child_ref.as_str()) else {
            log::debug!("'{}' references unknown section '{}'", template.name, child_ref);
            continue;
        };

        if path.contains(&child.name.as_str()) {
            log::warn!(
                "'{}' references its ancestor '{}'; dropping the cyclic child",
                template.name,
                child.name
            );
            continue;
        }

        node.children.push(resolve(child, shallow, path));
    }

    path.pop();
    node
}
