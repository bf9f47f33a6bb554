use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::*;
use crate::ast::Document;
use crate::convert::Converter;
use crate::template::read_template;
use crate::validator::{self, EquivalenceReport, StructureReport};

/// What `convert_component` did (or would do, on a dry run).
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertOutcome {
    pub display_name: String,
    pub sections: Vec<String>,
    pub template_path: PathBuf,
    pub text: String,
    pub written: bool,
    pub backup_path: Option<PathBuf>,
    pub scaffolded: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    pub display_name: String,
    pub template_path: PathBuf,
    pub structure: StructureReport,
    pub equivalence: EquivalenceReport,
    pub generated_blocks: usize,
    pub reference_blocks: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    /// No reference `template.lua` to compare against.
    Skipped { template_path: PathBuf },
    Checked(ValidationResult),
}

impl ValidationOutcome {
    /// Only the line comparison decides pass/fail; structure problems are
    /// reported alongside it.
    pub fn passed(&self) -> bool {
        match self {
            ValidationOutcome::Skipped { .. } => true,
            ValidationOutcome::Checked(result) => result.equivalence.is_ok(),
        }
    }
}

/// Tally of a `convert-all` / `validate-all` run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchSummary {
    pub passed: usize,
    pub failed: usize,
    /// (component, reason) for every failure.
    pub failures: Vec<(String, String)>,
}

impl BatchSummary {
    pub fn success(&self) -> bool {
        self.failed == 0
    }

    fn record(&mut self, name: &str, result: Result<bool, ViewError>) {
        match result {
            Ok(true) => self.passed += 1,
            Ok(false) => {
                self.failed += 1;
                self.failures.push((name.to_string(), "differences found".into()));
            }
            Err(e) => {
                log::error!("{}: {}", name, e);
                self.failed += 1;
                self.failures.push((name.to_string(), e.to_string()));
            }
        }
    }
}

impl Project {
    pub fn convert_component(
        &self,
        name: &str,
        dry_run: bool,
    ) -> Result<ConvertOutcome, ViewError> {
        let component = self.find_component(name)?;
        let document = Document::from_file(component.entry_data_path())?;
        let display_name = component.name().to_string();

        let text = Converter::new(&document).convert().text;
        let template_path = self.template_path(&display_name);

        let mut outcome = ConvertOutcome {
            sections: document.sections.keys().cloned().collect(),
            display_name,
            template_path,
            text,
            written: false,
            backup_path: None,
            scaffolded: None,
        };

        if dry_run {
            return Ok(outcome);
        }

        let lua_dir = outcome
            .template_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.ui_script_dir().to_path_buf());
        fs::create_dir_all(&lua_dir).map_err(|e| write_error(&lua_dir, e))?;

        if outcome.template_path.exists() {
            let backup = lua_dir.join(format!("{}.bak", TEMPLATE_FILE));
            fs::copy(&outcome.template_path, &backup).map_err(|e| write_error(&backup, e))?;
            log::info!("backed up existing file to {}", backup.display());
            outcome.backup_path = Some(backup);
        }

        fs::write(&outcome.template_path, &outcome.text)
            .map_err(|e| write_error(&outcome.template_path, e))?;
        outcome.written = true;
        log::info!("written to {}", outcome.template_path.display());

        let component_path = lua_dir.join(COMPONENT_FILE);
        if !component_path.exists() {
            fs::write(&component_path, component_scaffold(&outcome.display_name))
                .map_err(|e| write_error(&component_path, e))?;
            log::info!("created {}", component_path.display());
            outcome.scaffolded = Some(component_path);
        }

        Ok(outcome)
    }

    pub fn validate_component(&self, name: &str) -> Result<ValidationOutcome, ViewError> {
        let component = self.find_component(name)?;
        let document = Document::from_file(component.entry_data_path())?;
        let display_name = component.name().to_string();

        let template_path = self.template_path(&display_name);
        if !template_path.exists() {
            log::info!("no reference template at {}; skipping", template_path.display());
            return Ok(ValidationOutcome::Skipped { template_path });
        }

        let reference = fs::read_to_string(&template_path).map_err(|e| ViewError::FileError {
            message: format!("Failed to read reference template: {}", e),
            path: template_path.to_string_lossy().to_string(),
            hint: None,
            code: Some(312),
        })?;

        let conversion = Converter::new(&document).convert();
        let structure = validator::validate_structure(&document, &conversion.text);
        let equivalence = validator::validate_equivalence(&conversion.text, &reference);
        let reference_blocks = read_template(&reference).items.len();

        Ok(ValidationOutcome::Checked(ValidationResult {
            display_name,
            template_path,
            structure,
            equivalence,
            generated_blocks: conversion.items.len(),
            reference_blocks,
        }))
    }

    /// Convert every non-internal component, continuing past failures.
    pub fn convert_all(&self, dry_run: bool) -> Result<BatchSummary, ViewError> {
        let components = self.non_empty_components()?;
        let mut summary = BatchSummary::default();

        for component in &components {
            if component.is_internal() {
                log::info!("skipping internal component: {}", component.dir_name);
                continue;
            }
            let name = component.name();
            summary.record(name, self.convert_component(name, dry_run).map(|_| true));
        }

        Ok(summary)
    }

    /// Validate every component that already has a `template.lua`.
    pub fn validate_all(&self) -> Result<BatchSummary, ViewError> {
        let components = self.non_empty_components()?;
        let mut summary = BatchSummary::default();

        for component in components.iter().filter(|c| c.has_lua) {
            let name = component.name();
            summary.record(name, self.validate_component(name).map(|o| o.passed()));
        }

        Ok(summary)
    }

    fn non_empty_components(&self) -> Result<Vec<Component>, ViewError> {
        let components = self.list_components()?;
        if components.is_empty() {
            return Err(ViewError::NotFound {
                message: "No components found".into(),
                path: self.editor_dir().to_string_lossy().to_string(),
                hint: Some("Check the project root".into()),
                code: Some(320),
            });
        }
        Ok(components)
    }
}

fn write_error(path: &Path, e: std::io::Error) -> ViewError {
    ViewError::FileError {
        message: format!("Failed to write: {}", e),
        path: path.to_string_lossy().to_string(),
        hint: Some("Check directory permissions".into()),
        code: Some(340),
    }
}

/// Starter `component.lua` for a freshly converted page.
pub fn component_scaffold(name: &str) -> String {
    format!(
        r#"-- THIS FILE IS AUTO-GENERATED, MIGHT BE OVERWRITTEN BY GUI-EDITOR
local pkg = require '@common.base.gui.package'
local component = require '@common.base.gui.component'

return component '{name}' {{
    pkg.require_template(lib_env, '{name}'),

    event = {{

    }},

    prop = {{

    }},

    method = {{

    }},
    
    state = {{

    }},
}}
"#
    )
}
