// Author: Dustin Pilgrim
// License: MIT

//! Line-oriented parser for the editor's `entry_data.ini` dialect.
//!
//! The parser is lenient: anything it does not understand is skipped, and a
//! table that is still open at end of input is dropped without an error.

use std::fs;
use std::path::Path;

use crate::ViewError;
use crate::ast::{Document, Table, TableKey, Value};

mod document;
mod value;

pub use value::{parse_table, parse_value, split_table_pairs, ParsedValue};

/// Incremental parser state. Feed it lines, then call [`Parser::finish`].
pub struct Parser {
    state: State,
    section: Option<(String, Table)>,
    document: Document,
}

enum State {
    Idle,
    /// A table value spans several lines; `depth` is `{` minus `}` so far.
    Collecting {
        key: String,
        buffer: Vec<String>,
        depth: i64,
    },
}

impl Parser {
    pub fn new() -> Self {
        Self {
            state: State::Idle,
            section: None,
            document: Document::default(),
        }
    }

    pub fn feed_line(&mut self, line: &str) {
        document::feed_line(self, line)
    }

    /// Commit the open section and return the document.
    pub fn finish(mut self) -> Document {
        if let State::Collecting { key, buffer, depth } = &self.state {
            log::debug!(
                "dropping unterminated value for '{}' ({} buffered lines, depth {})",
                key,
                buffer.len(),
                depth
            );
        }
        self.commit_section();
        self.document
    }

    pub(crate) fn commit_section(&mut self) {
        let Some((name, data)) = self.section.take() else {
            return;
        };

        if name == "#CONFIG" {
            self.document.config = data;
        } else {
            if self.document.sections.contains_key(&name) {
                log::debug!("section '{}' declared twice; keeping the last one", name);
            }
            self.document.sections.insert(name, data);
        }
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse the full text of an entry data file.
pub fn parse_entry_data(text: &str) -> Document {
    let mut parser = Parser::new();
    for line in text.split('\n') {
        parser.feed_line(line);
    }
    parser.finish()
}

impl Document {
    /// Parse entry data from a string (no file I/O).
    pub fn parse(text: &str) -> Self {
        parse_entry_data(text)
    }

    /// Read and parse an `entry_data.ini` file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ViewError> {
        let path = path.as_ref();
        let display = path.to_string_lossy().to_string();

        if !path.exists() {
            return Err(ViewError::NotFound {
                message: "File not found".into(),
                path: display,
                hint: Some("Check that the component has an entry_data.ini".into()),
                code: Some(301),
            });
        }

        let bytes = fs::read(path).map_err(|e| ViewError::FileError {
            message: format!("Failed to read file: {}", e),
            path: display.clone(),
            hint: Some("Check that the file is readable".into()),
            code: Some(302),
        })?;

        let content = String::from_utf8(bytes).map_err(|e| ViewError::MalformedInput {
            message: format!("File is not valid UTF-8: {}", e),
            path: display,
            hint: Some("Entry data files are written by the editor as UTF-8".into()),
            code: Some(303),
        })?;

        Ok(parse_entry_data(&content))
    }
}

pub(crate) fn brace_delta(text: &str) -> i64 {
    let open = text.matches('{').count() as i64;
    let close = text.matches('}').count() as i64;
    open - close
}

pub(crate) fn insert_field(table: &mut Table, key: String, value: Value) {
    table.insert(TableKey::Str(key), value);
}
