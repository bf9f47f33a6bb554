//! Node type → wrapper module resolution.

/// Dotted node-type prefixes and the wrapper that owns them, in match order.
pub const WRAPPER_PREFIXES: [(&str, &str); 5] = [
    ("$$.gui_ctrl", "ctrl_wrapper"),
    ("$$gameui.gui_ctrl", "gameui"),
    ("$$lib_control.gui_ctrl", "lib_control"),
    ("$$smallcard_inventory.gui_ctrl", "smallcard_inventory"),
    ("$$smallcard_mail.gui_ctrl", "smallcard_mail"),
];

/// Module path each wrapper is imported from.
pub const MODULE_PATHS: [(&str, &str); 6] = [
    ("ctrl_wrapper", "@common.base.gui.ctrl_wrapper"),
    ("gameui", "@gameui.component"),
    ("lib_control", "@lib_control.component"),
    ("smallcard_inventory", "@smallcard_inventory.component"),
    ("smallcard_mail", "@smallcard_mail.component"),
    ("lib_game_options", "@lib_game_options.component"),
];

const GUI_CTRL: &str = ".gui_ctrl";
const GUI_CTRL_SEPARATOR: &str = ".gui_ctrl.";

/// Resolve `$$gameui.gui_ctrl.button` to `("gameui", "button")`.
pub fn resolve_wrapper(node_type: &str) -> Option<(&'static str, String)> {
    if node_type.is_empty() {
        return None;
    }

    for (prefix, wrapper) in WRAPPER_PREFIXES {
        if let Some(control) = node_type
            .strip_prefix(prefix)
            .and_then(|rest| rest.strip_prefix('.'))
        {
            return Some((wrapper, control.to_string()));
        }
    }

    // Fallback: `<package>.gui_ctrl.<control>` with a loose package match
    let parts: Vec<&str> = node_type.split(GUI_CTRL_SEPARATOR).collect();
    if let [package, control] = parts.as_slice() {
        for (prefix, wrapper) in WRAPPER_PREFIXES {
            if package.starts_with(&prefix.replacen(GUI_CTRL, "", 1)) {
                return Some((wrapper, control.to_string()));
            }
        }
    }

    None
}

pub fn module_path(wrapper: &str) -> Option<&'static str> {
    MODULE_PATHS
        .iter()
        .find(|(name, _)| *name == wrapper)
        .map(|(_, path)| *path)
}
