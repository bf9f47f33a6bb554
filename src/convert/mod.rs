// Author: Dustin Pilgrim
// License: MIT

//! Entry data → flattened template conversion.
//!
//! The pipeline is: [`build_tree`] turns sections into a widget tree,
//! [`Flattener`] turns the tree into depth-annotated [`FlatItem`]s, and
//! [`crate::render::render`] writes the Lua text.

use indexmap::IndexSet;

use crate::ast::Document;
use crate::render;

mod flatten;
mod tree;
mod wrapper;

pub use flatten::{flatten, FlatItem, Flattener, COPIED_PROPERTIES};
pub use tree::{build_tree, WidgetNode};
pub use wrapper::{module_path, resolve_wrapper, MODULE_PATHS, WRAPPER_PREFIXES};

/// Result of converting one document.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub items: Vec<FlatItem>,
    pub used_wrappers: IndexSet<&'static str>,
    pub text: String,
}

/// Converts a single parsed document. Build a fresh one per file.
pub struct Converter<'a> {
    document: &'a Document,
    flattener: Flattener,
}

impl<'a> Converter<'a> {
    pub fn new(document: &'a Document) -> Self {
        Self {
            document,
            flattener: Flattener::new(),
        }
    }

    pub fn convert(mut self) -> Conversion {
        let items = match build_tree(self.document) {
            Some(root) => self.flattener.flatten(&root),
            None => {
                log::debug!("no 'template' or 'root' section; nothing to convert");
                Vec::new()
            }
        };

        let text = render::render(&items);

        Conversion {
            items,
            used_wrappers: self.flattener.used_wrappers().clone(),
            text,
        }
    }
}

/// Parse-free convenience: document in, Lua text out.
pub fn convert_document(document: &Document) -> String {
    Converter::new(document).convert().text
}
