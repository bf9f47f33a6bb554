// Author: Dustin Pilgrim
// License: MIT

//! Checks generated Lua against the entry data and against the editor's
//! own output. Mismatches are reported, never raised.

use std::fmt;
use std::fs;
use std::path::Path;

use crate::ast::{lookup, lookup_table, Document, Value};
use crate::render::format_float;
use crate::ViewError;

/// Number of differing lines kept before the report is cut short.
pub const MAX_LINE_DIFFS: usize = 30;

const GUI_CTRL_MARKER: &str = ".gui_ctrl.";
const MISSING_LINE: &str = "<missing>";

/// A control from the entry data whose name is absent from the Lua text.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuralMismatch {
    pub section: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructureReport {
    pub missing: Vec<StructuralMismatch>,
}

/// One differing line after normalization. `line` is 1-based.
#[derive(Debug, Clone, PartialEq)]
pub struct LineDiff {
    pub line: usize,
    pub generated: String,
    pub reference: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EquivalenceReport {
    pub diffs: Vec<LineDiff>,
    /// More lines differed than were kept.
    pub truncated: bool,
}

impl StructureReport {
    pub fn is_ok(&self) -> bool {
        self.missing.is_empty()
    }
}

impl EquivalenceReport {
    pub fn is_ok(&self) -> bool {
        self.diffs.is_empty()
    }
}

impl fmt::Display for StructuralMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Node '{}' (name='{}') not found in generated Lua",
            self.section, self.name
        )
    }
}

impl fmt::Display for LineDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Line {}:", self.line)?;
        writeln!(f, "  Generated: {}", clip(&self.generated))?;
        write!(f, "  Existing:  {}", clip(&self.reference))
    }
}

impl fmt::Display for EquivalenceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for diff in &self.diffs {
            writeln!(f, "{}", diff)?;
        }
        if self.truncated {
            writeln!(f, "... (more differences)")?;
        }
        Ok(())
    }
}

fn clip(line: &str) -> String {
    line.chars().take(100).collect()
}

/// Every `.gui_ctrl.` section must show up as `name = '<name>'` in the text.
pub fn validate_structure(doc: &Document, lua_text: &str) -> StructureReport {
    let mut missing = Vec::new();

    for (section, data) in &doc.sections {
        let Some(node_type) = lookup(data, "NodeType").and_then(Value::as_str) else {
            continue;
        };
        if !node_type.contains(GUI_CTRL_MARKER) {
            continue;
        }

        let Some(name) = control_name(section, data) else {
            continue;
        };

        if !lua_text.contains(&format!("name = '{}'", name)) {
            missing.push(StructuralMismatch {
                section: section.clone(),
                name,
            });
        }
    }

    StructureReport { missing }
}

/// `Data.Game.Name`, or the section name when there is none.
fn control_name(section: &str, data: &crate::ast::Table) -> Option<String> {
    let game = lookup_table(data, "Data").and_then(|d| lookup_table(d, "Game"));

    let name = match game.and_then(|g| lookup(g, "Name")) {
        None => section.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Int(i)) => i.to_string(),
        Some(Value::Float(f)) => format_float(*f),
        Some(Value::Bool(b)) if *b => "True".to_string(),
        Some(_) => return None,
    };

    if name.is_empty() { None } else { Some(name) }
}

/// Strip comments and cosmetic whitespace so only meaningful lines remain.
pub fn normalize(text: &str) -> String {
    text.split('\n')
        .map(normalize_line)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn normalize_line(line: &str) -> String {
    let code = match line.find("--") {
        Some(pos) => &line[..pos],
        None => line,
    };

    let mut out = String::with_capacity(code.len());
    let mut in_blank = false;
    for ch in code.chars() {
        if ch == ' ' || ch == '\t' {
            if !in_blank {
                out.push(' ');
            }
            in_blank = true;
        } else {
            out.push(ch);
            in_blank = false;
        }
    }

    out.trim().to_string()
}

/// Compare two Lua texts line by line after [`normalize`].
pub fn validate_equivalence(generated: &str, reference: &str) -> EquivalenceReport {
    let generated = normalize(generated);
    let reference = normalize(reference);

    if generated == reference {
        return EquivalenceReport::default();
    }

    let gen_lines: Vec<&str> = generated.split('\n').collect();
    let ref_lines: Vec<&str> = reference.split('\n').collect();
    let total = gen_lines.len().max(ref_lines.len());

    let mut report = EquivalenceReport::default();
    for i in 0..total {
        let gen_line = gen_lines.get(i).copied().unwrap_or(MISSING_LINE);
        let ref_line = ref_lines.get(i).copied().unwrap_or(MISSING_LINE);
        if gen_line == ref_line {
            continue;
        }

        if report.diffs.len() == MAX_LINE_DIFFS {
            report.truncated = true;
            break;
        }

        report.diffs.push(LineDiff {
            line: i + 1,
            generated: gen_line.to_string(),
            reference: ref_line.to_string(),
        });
    }

    report
}

/// Compare generated text with an existing `template.lua` on disk.
pub fn validate_against_file<P: AsRef<Path>>(
    generated: &str,
    reference_path: P,
) -> Result<EquivalenceReport, ViewError> {
    let path = reference_path.as_ref();
    let display = path.to_string_lossy().to_string();

    if !path.exists() {
        return Err(ViewError::NotFound {
            message: "Existing file not found".into(),
            path: display,
            hint: Some("Generate the template first or check the display name".into()),
            code: Some(311),
        });
    }

    let reference = fs::read_to_string(path).map_err(|e| ViewError::FileError {
        message: format!("Failed to read reference template: {}", e),
        path: display,
        hint: None,
        code: Some(312),
    })?;

    Ok(validate_equivalence(generated, &reference))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_entry_data;

    #[test]
    fn test_comments_and_blank_lines_are_ignored() {
        let generated = "-- header one\nlocal a = 1\n\n\nreturn {\n    x = 1, -- note\n}";
        let reference = "-- another header\n\nlocal  a =\t1\nreturn {\n  x = 1,\n}\n\n";

        let report = validate_equivalence(generated, reference);
        assert!(report.is_ok(), "unexpected diffs: {}", report);
    }

    #[test]
    fn test_line_diffs_are_reported() {
        let report = validate_equivalence("a\nb\nc", "a\nB");

        assert!(!report.is_ok());
        assert_eq!(
            report.diffs,
            vec![
                LineDiff { line: 2, generated: "b".into(), reference: "B".into() },
                LineDiff { line: 3, generated: "c".into(), reference: "<missing>".into() },
            ]
        );
        assert!(!report.truncated);
    }

    #[test]
    fn test_diffs_are_capped() {
        let generated: Vec<String> = (0..40).map(|i| format!("gen {}", i)).collect();
        let reference: Vec<String> = (0..40).map(|i| format!("ref {}", i)).collect();

        let report = validate_equivalence(&generated.join("\n"), &reference.join("\n"));
        assert_eq!(report.diffs.len(), MAX_LINE_DIFFS);
        assert!(report.truncated);
        assert!(report.to_string().ends_with("... (more differences)\n"));
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  a \t b  -- c\n\n--only\n d"), "a b\nd");
    }

    #[test]
    fn test_structure_validation() {
        let input = r#"
['template']
'NodeType' = '$$.gui_ctrl.panel'
'Data' = { 'Game' = { 'Name' = 'root_panel' } }

['unnamed']
'NodeType' = '$$gameui.gui_ctrl.button'

['blank']
'NodeType' = '$$.gui_ctrl.label'
'Data' = { 'Game' = { 'Name' = #NIL } }

['not_a_control']
'NodeType' = 'logic.timer'
"#;
        let doc = parse_entry_data(input);

        let report = validate_structure(&doc, "name = 'root_panel',");
        assert_eq!(
            report.missing,
            vec![StructuralMismatch { section: "unnamed".into(), name: "unnamed".into() }]
        );
        assert_eq!(
            report.missing[0].to_string(),
            "Node 'unnamed' (name='unnamed') not found in generated Lua"
        );

        let report = validate_structure(&doc, "name = 'root_panel', name = 'unnamed'");
        assert!(report.is_ok());
    }

    #[test]
    fn test_validate_against_missing_file() {
        let err = validate_against_file("x", "/no/such/template.lua").expect_err("missing");
        assert!(err.is_not_found());
    }
}
