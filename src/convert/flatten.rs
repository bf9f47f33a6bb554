use indexmap::{IndexMap, IndexSet};

use super::tree::WidgetNode;
use super::wrapper::resolve_wrapper;
use crate::ast::{lookup, Table, Value};

/// One block of the flattened template.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatItem {
    pub wrapper_id: String,
    pub control_type: String,
    pub properties: IndexMap<String, Value>,
    pub depth: usize,
}

/// Game-data fields copied onto the item, as (source, target).
pub const COPIED_PROPERTIES: [(&str, &str); 26] = [
    ("Name", "name"),
    ("layout", "layout"),
    ("color", "color"),
    ("z_index", "z_index"),
    ("show", "show"),
    ("disabled", "disabled"),
    ("image", "image"),
    ("text", "text"),
    ("font", "font"),
    ("font_size", "font_size"),
    ("font_color", "font_color"),
    ("font_family", "font_family"),
    ("placeholder", "placeholder"),
    ("text_input", "text_input"),
    ("progress", "progress"),
    ("round_corner_radius", "round_corner_radius"),
    ("loop", "loop"),
    ("play", "play"),
    ("view_mode", "view_mode"),
    ("particle_size", "particle_size"),
    ("particle_scale", "particle_scale"),
    ("offset_percent", "offset_percent"),
    ("auto_scale", "auto_scale"),
    ("RenderPath", "RenderPath"),
    ("UseShadow", "UseShadow"),
    ("CustomString", "CustomString"),
];

/// Control types that get `disabled = false` when the editor left it out.
const DEFAULT_DISABLED_CONTROLS: [&str; 3] = ["panel", "UIScene", "input_paste"];

const EDIT_TIME: &str = "__EDIT_TIME";

/// Walks a widget tree in pre-order and records the wrappers it used.
#[derive(Debug, Default)]
pub struct Flattener {
    used_wrappers: IndexSet<&'static str>,
}

impl Flattener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flatten(&mut self, root: &WidgetNode) -> Vec<FlatItem> {
        let mut items = Vec::new();
        self.flatten_node(root, 0, false, &mut items);
        items
    }

    pub fn used_wrappers(&self) -> &IndexSet<&'static str> {
        &self.used_wrappers
    }

    /// `has_siblings` is true when the node's parent has more than one child.
    /// Children of such a node sit two levels down, except under the root.
    fn flatten_node(
        &mut self,
        node: &WidgetNode,
        depth: usize,
        has_siblings: bool,
        items: &mut Vec<FlatItem>,
    ) {
        if let Some(item) = self.convert_node(node, depth) {
            items.push(item);
        }

        let child_depth = if has_siblings && depth > 0 { depth + 2 } else { depth + 1 };
        let children_have_siblings = node.children.len() > 1;

        for child in &node.children {
            self.flatten_node(child, child_depth, children_have_siblings, items);
        }
    }

    fn convert_node(&mut self, node: &WidgetNode, depth: usize) -> Option<FlatItem> {
        let Some((wrapper, control_type)) = resolve_wrapper(&node.node_type) else {
            log::debug!("skipping '{}': unmapped node type '{}'", node.name, node.node_type);
            return None;
        };

        self.used_wrappers.insert(wrapper);
        let properties = build_properties(&node.game_data, &node.editor_data, &control_type);

        Some(FlatItem {
            wrapper_id: wrapper.to_string(),
            control_type,
            properties,
            depth,
        })
    }
}

/// Flatten an optional tree; an empty tree produces no items.
pub fn flatten(root: Option<&WidgetNode>) -> Vec<FlatItem> {
    root.map(|node| Flattener::new().flatten(node)).unwrap_or_default()
}

fn build_properties(
    game_data: &Table,
    editor_data: &Table,
    control_type: &str,
) -> IndexMap<String, Value> {
    let mut props = IndexMap::new();

    if let Some(edit_time) = lookup(editor_data, EDIT_TIME) {
        props.insert(EDIT_TIME.to_string(), edit_time.clone());
    }

    for (source, target) in COPIED_PROPERTIES {
        match lookup(game_data, source) {
            Some(value) if !value.is_nil() => {
                props.insert(target.to_string(), value.clone());
            }
            _ => {}
        }
    }

    props.entry("show".to_string()).or_insert(Value::Bool(true));

    if DEFAULT_DISABLED_CONTROLS.contains(&control_type) {
        props.entry("disabled".to_string()).or_insert(Value::Bool(false));
    }

    props
}
