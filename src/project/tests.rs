// Author: Dustin Pilgrim
// License: MIT

#[cfg(test)]
use super::*;
#[cfg(test)]
use tempfile::TempDir;

#[cfg(test)]
const ENTRY_DATA: &str = r#"
[#CONFIG]
'Version' = 1

['template']
'NodeType' = '$$.gui_ctrl.panel'
'Data' = {
    'Game' = {
        'Name' = 'root_panel',
        'children' = { 1 = 'title' },
    },
}

['title']
'NodeType' = '$$gameui.gui_ctrl.label'
'Data' = { 'Game' = { 'Name' = 'title', 'text' = 'Hello' } }
"#;

/// Lay out `editor/.../<dir>/entry_data.ini` (+ optional i18n) under a temp root.
#[cfg(test)]
fn add_component(root: &Path, dir: &str, display: Option<&str>) -> PathBuf {
    let project = Project::new(root);
    let component_dir = project.editor_dir().join(dir);
    fs::create_dir_all(&component_dir).expect("create component dir");
    fs::write(component_dir.join(ENTRY_DATA_FILE), ENTRY_DATA).expect("write entry data");

    if let Some(display) = display {
        let i18n = component_dir.join("i18n");
        fs::create_dir_all(&i18n).expect("create i18n dir");
        let json = format!(
            r#"{{ "Title": "ignored", "Comp_DisplayName": "{}", "Other_DisplayName": "second" }}"#,
            display
        );
        fs::write(i18n.join("default.json"), json).expect("write i18n");
    }

    component_dir
}

#[cfg(test)]
fn project_with_component(display: Option<&str>) -> (TempDir, Project) {
    let dir = tempfile::tempdir().expect("tempdir");
    add_component(dir.path(), "comp_dir", display);
    let project = Project::new(dir.path());
    (dir, project)
}

#[test]
fn test_list_components_reads_display_name() {
    let (dir, project) = project_with_component(Some("MainPage"));
    add_component(dir.path(), "$$internal", None);
    fs::create_dir_all(project.editor_dir().join("no_entry_data")).expect("mkdir");

    let components = project.list_components().expect("list components");

    assert_eq!(components.len(), 2);
    assert_eq!(components[0].dir_name, "$$internal");
    assert!(components[0].is_internal());
    assert_eq!(components[1].display_name.as_deref(), Some("MainPage"));
    assert_eq!(components[1].name(), "MainPage");
    assert!(!components[1].has_lua);
    assert!(components[1].lua_path.is_none());
}

#[test]
fn test_missing_editor_dir_lists_nothing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let project = Project::new(dir.path());

    assert!(project.list_components().expect("list").is_empty());
    let err = project.convert_all(false).expect_err("no components");
    assert_eq!(err.code(), Some(320));
}

#[test]
fn test_display_name_tolerates_bad_json() {
    let dir = tempfile::tempdir().expect("tempdir");
    let i18n = dir.path().join("i18n");
    fs::create_dir_all(&i18n).expect("mkdir");
    fs::write(i18n.join("default.json"), "{ not json").expect("write");

    assert_eq!(display_name(dir.path()), None);
    assert_eq!(display_name(&dir.path().join("absent")), None);
}

#[test]
fn test_find_component_by_either_name() {
    let (_dir, project) = project_with_component(Some("MainPage"));

    assert_eq!(project.find_component("MainPage").expect("by display").dir_name, "comp_dir");
    assert_eq!(project.find_component("comp_dir").expect("by dir").dir_name, "comp_dir");

    let err = project.find_component("nope").expect_err("unknown component");
    assert!(err.is_not_found());
}

#[test]
fn test_convert_dry_run_writes_nothing() {
    let (_dir, project) = project_with_component(Some("MainPage"));

    let outcome = project.convert_component("MainPage", true).expect("dry run");

    assert!(!outcome.written);
    assert!(!outcome.template_path.exists());
    assert_eq!(outcome.sections, vec!["template", "title"]);
    assert!(outcome.text.contains("gameui.label {"));
    assert!(outcome.text.contains("local gameui = require '@gameui.component'"));
}

#[test]
fn test_convert_writes_backup_and_scaffold() {
    let (_dir, project) = project_with_component(Some("MainPage"));
    let template = project.template_path("MainPage");
    fs::create_dir_all(template.parent().expect("parent")).expect("mkdir");
    fs::write(&template, "-- old contents").expect("write old template");

    let outcome = project.convert_component("comp_dir", false).expect("convert");

    assert!(outcome.written);
    let backup = outcome.backup_path.expect("backup taken");
    assert_eq!(fs::read_to_string(backup).expect("read backup"), "-- old contents");
    assert_eq!(fs::read_to_string(&template).expect("read template"), outcome.text);

    let scaffold = outcome.scaffolded.expect("component.lua created");
    let scaffold_text = fs::read_to_string(scaffold).expect("read scaffold");
    assert!(scaffold_text.contains("return component 'MainPage' {"));
    assert!(scaffold_text.contains("pkg.require_template(lib_env, 'MainPage'),"));

    // A second run keeps the existing component.lua
    let again = project.convert_component("comp_dir", false).expect("convert again");
    assert!(again.scaffolded.is_none());
}

#[test]
fn test_validate_skips_without_reference() {
    let (_dir, project) = project_with_component(None);

    let outcome = project.validate_component("comp_dir").expect("validate");
    assert!(matches!(outcome, ValidationOutcome::Skipped { .. }));
    assert!(outcome.passed());
}

#[test]
fn test_validate_round_trip_and_mismatch() {
    let (_dir, project) = project_with_component(Some("MainPage"));
    project.convert_component("MainPage", false).expect("convert");

    let outcome = project.validate_component("MainPage").expect("validate");
    let ValidationOutcome::Checked(result) = &outcome else {
        panic!("expected a checked outcome");
    };
    assert!(outcome.passed());
    assert!(result.structure.is_ok());
    assert_eq!(result.generated_blocks, 2);
    assert_eq!(result.reference_blocks, 2);

    let summary = project.validate_all().expect("validate all");
    assert_eq!(summary.passed, 1);
    assert!(summary.success());

    // Editor output with a different name no longer matches
    let template = project.template_path("MainPage");
    let edited = fs::read_to_string(&template)
        .expect("read")
        .replace("'root_panel'", "'renamed'");
    fs::write(&template, edited).expect("write");

    let outcome = project.validate_component("MainPage").expect("validate");
    assert!(!outcome.passed());

    let summary = project.validate_all().expect("validate all");
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.failures[0].0, "MainPage");
    assert!(!summary.success());
}

#[test]
fn test_convert_all_skips_internal_components() {
    let (dir, project) = project_with_component(Some("MainPage"));
    add_component(dir.path(), "$$internal", None);

    let summary = project.convert_all(false).expect("convert all");

    assert_eq!(summary.passed, 1);
    assert_eq!(summary.failed, 0);
    assert!(project.template_path("MainPage").exists());
    assert!(!project.template_path("$$internal").exists());
}

#[test]
fn test_expand_home_and_resolve() {
    if let Some(home) = dirs::home_dir() {
        assert_eq!(expand_home("~/games/proj").expect("expand"), home.join("games/proj"));
    }
    assert_eq!(expand_home("/abs/path").expect("plain"), PathBuf::from("/abs/path"));

    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().to_string_lossy().to_string();
    let project = Project::resolve(Some(path.as_str())).expect("resolve explicit root");
    assert_eq!(project.root(), dir.path());

    let err = Project::resolve(Some("/definitely/not/a/project")).expect_err("missing root");
    assert!(err.is_not_found());
}

#[test]
fn test_empty_display_name_falls_back_to_directory() {
    let (_dir, project) = project_with_component(Some(""));

    let component = project.find_component("comp_dir").expect("component");
    assert!(component.display_name.is_none());
    assert_eq!(component.name(), "comp_dir");

    let outcome = project.convert_component("comp_dir", false).expect("convert");
    assert_eq!(outcome.display_name, "comp_dir");
    assert_eq!(outcome.template_path, project.template_path("comp_dir"));
    assert!(project.template_path("comp_dir").exists());
    assert!(!project.ui_script_dir().join(TEMPLATE_FILE).exists());

    let scaffold = outcome.scaffolded.expect("component.lua created");
    let scaffold_text = fs::read_to_string(scaffold).expect("read scaffold");
    assert!(scaffold_text.contains("return component 'comp_dir' {"));
}

#[test]
fn test_scaffold_keeps_indented_blank_line() {
    let text = component_scaffold("Page");

    assert!(text.contains("    method = {\n\n    },\n    \n    state = {\n"));
    assert!(text.ends_with("    state = {\n\n    },\n}\n"));
}

#[test]
fn test_unreadable_reference_is_an_error() {
    let (_dir, project) = project_with_component(Some("MainPage"));
    let template = project.template_path("MainPage");
    fs::create_dir_all(&template).expect("directory in place of template.lua");

    let err = project.validate_component("MainPage").expect_err("unreadable reference");
    assert_eq!(err.code(), Some(312));
}
