// Author: Dustin Pilgrim
// License: MIT

//! Project layout, component discovery and the file-writing glue around
//! the conversion pipeline.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::ViewError;

mod operations;

pub use operations::{
    component_scaffold, BatchSummary, ConvertOutcome, ValidationOutcome, ValidationResult,
};

/// Environment variable consulted when no `--project` is given.
pub const PROJECT_ENV: &str = "VIEW2LUA_PROJECT";

const EDITOR_DIR: [&str; 4] = ["editor", "table", "entry_data", "template@gui_ctrl"];
const UI_SCRIPT_DIR: [&str; 4] = ["ui", "script", "gui", "page"];

pub(crate) const ENTRY_DATA_FILE: &str = "entry_data.ini";
pub(crate) const TEMPLATE_FILE: &str = "template.lua";
pub(crate) const COMPONENT_FILE: &str = "component.lua";
const I18N_FILE: [&str; 2] = ["i18n", "default.json"];

/// One editor component directory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Component {
    pub dir_name: String,
    pub display_name: Option<String>,
    pub editor_path: PathBuf,
    /// UI script directory, only set when it holds a `template.lua`.
    pub lua_path: Option<PathBuf>,
    pub has_lua: bool,
}

impl Component {
    /// Display name when known, directory name otherwise.
    pub fn name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.dir_name)
    }

    pub fn entry_data_path(&self) -> PathBuf {
        self.editor_path.join(ENTRY_DATA_FILE)
    }

    /// Components whose directory starts with `$$` are internal.
    pub fn is_internal(&self) -> bool {
        self.dir_name.starts_with("$$")
    }
}

/// A game project checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    root: PathBuf,
    editor_dir: PathBuf,
    ui_script_dir: PathBuf,
}

impl Project {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        let root = root.into();
        let editor_dir = EDITOR_DIR.iter().fold(root.clone(), |p, seg| p.join(seg));
        let ui_script_dir = UI_SCRIPT_DIR.iter().fold(root.clone(), |p, seg| p.join(seg));

        Self {
            root,
            editor_dir,
            ui_script_dir,
        }
    }

    /// Resolve the project root: explicit path, then `VIEW2LUA_PROJECT`,
    /// then the current directory.
    pub fn resolve(explicit: Option<&str>) -> Result<Self, ViewError> {
        let raw = match explicit {
            Some(path) => Some(path.to_string()),
            None => env::var(PROJECT_ENV).ok().filter(|v| !v.trim().is_empty()),
        };

        let root = match raw {
            Some(raw) => expand_home(&raw)?,
            None => env::current_dir().map_err(|e| ViewError::RuntimeError {
                message: format!("Could not determine current directory: {}", e),
                hint: Some(format!("Pass --project or set {}", PROJECT_ENV)),
                code: Some(330),
            })?,
        };

        if !root.is_dir() {
            return Err(ViewError::NotFound {
                message: "Project root is not a directory".into(),
                path: root.to_string_lossy().to_string(),
                hint: Some(format!("Pass --project or set {}", PROJECT_ENV)),
                code: Some(331),
            });
        }

        Ok(Self::new(root))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn editor_dir(&self) -> &Path {
        &self.editor_dir
    }

    pub fn ui_script_dir(&self) -> &Path {
        &self.ui_script_dir
    }

    /// `<ui dir>/<display name>/template.lua`
    pub fn template_path(&self, display_name: &str) -> PathBuf {
        self.ui_script_dir.join(display_name).join(TEMPLATE_FILE)
    }

    /// Every editor component with an `entry_data.ini`, sorted by directory.
    pub fn list_components(&self) -> Result<Vec<Component>, ViewError> {
        if !self.editor_dir.exists() {
            log::warn!("editor directory not found: {}", self.editor_dir.display());
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.editor_dir).map_err(|e| ViewError::FileError {
            message: format!("Failed to list components: {}", e),
            path: self.editor_dir.to_string_lossy().to_string(),
            hint: None,
            code: Some(321),
        })?;

        let mut components = Vec::new();
        for entry in entries.flatten() {
            let editor_path = entry.path();
            if !editor_path.is_dir() || !editor_path.join(ENTRY_DATA_FILE).exists() {
                continue;
            }

            let dir_name = entry.file_name().to_string_lossy().to_string();
            let display_name = display_name(&editor_path);

            let lua_dir = self
                .ui_script_dir
                .join(display_name.as_deref().unwrap_or(&dir_name));
            let has_lua = lua_dir.join(TEMPLATE_FILE).exists();

            components.push(Component {
                dir_name,
                display_name,
                editor_path,
                lua_path: has_lua.then_some(lua_dir),
                has_lua,
            });
        }

        components.sort_by(|a, b| a.dir_name.cmp(&b.dir_name));
        Ok(components)
    }

    /// Find a component by display name or directory name.
    pub fn find_component(&self, name: &str) -> Result<Component, ViewError> {
        self.list_components()?
            .into_iter()
            .find(|c| c.display_name.as_deref() == Some(name) || c.dir_name == name)
            .ok_or_else(|| ViewError::NotFound {
                message: format!("Component not found: {}", name),
                path: self.editor_dir.to_string_lossy().to_string(),
                hint: Some("Run `view2lua list` to see available components".into()),
                code: Some(322),
            })
    }
}

/// Display name from the component's `i18n/default.json`: the first key
/// containing `DisplayName`, in file order. Empty names count as missing.
pub fn display_name(component_dir: &Path) -> Option<String> {
    let path = I18N_FILE.iter().fold(component_dir.to_path_buf(), |p, seg| p.join(seg));
    let content = fs::read_to_string(&path).ok()?;

    let data: serde_json::Value = match serde_json::from_str(&content) {
        Ok(data) => data,
        Err(e) => {
            log::debug!("ignoring malformed {}: {}", path.display(), e);
            return None;
        }
    };

    data.as_object()?
        .iter()
        .find(|(key, _)| key.contains("DisplayName"))
        .and_then(|(_, value)| value.as_str())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

/// Expand a leading `~/` against the home directory.
pub fn expand_home(raw: &str) -> Result<PathBuf, ViewError> {
    let raw = raw.trim();
    match raw.strip_prefix("~/") {
        Some(rest) => {
            let home = dirs::home_dir().ok_or_else(|| ViewError::RuntimeError {
                message: "Could not determine home directory for ~ expansion".into(),
                hint: Some("Set HOME or use an absolute project path".into()),
                code: Some(332),
            })?;
            Ok(home.join(rest))
        }
        None => Ok(PathBuf::from(raw)),
    }
}

#[cfg(test)]
mod tests;
