//! Command-line interface for view2lua.
//!
//! Usage:
//!   view2lua list [--json]                       - List editor components
//!   view2lua validate [component]                - Compare generated Lua with the editor's output
//!   view2lua convert `<component>` [--dry-run]   - Generate one template.lua
//!   view2lua convert-all [--dry-run]             - Generate every template.lua
//!   view2lua inspect `<component>`               - Show the parsed widget tree
//!   view2lua render `<entry_data.ini>`           - Print the Lua for a single file

use clap::{Arg, ArgAction, ArgMatches, Command};

use view2lua::convert::{build_tree, WidgetNode};
use view2lua::logging::{init_logging, LoggingConfig};
use view2lua::project::{BatchSummary, ValidationOutcome};
use view2lua::{Converter, Document, Project, ViewError};

fn main() {
    let matches = cli().get_matches();

    let verbose = matches.get_flag("verbose")
        || matches.subcommand().is_some_and(|(_, sub)| sub.get_flag("verbose"));
    init_logging(LoggingConfig::verbose(verbose));

    let code = match run(&matches) {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(e) => {
            eprintln!("{}", e);
            1
        }
    };
    std::process::exit(code);
}

fn cli() -> Command {
    let component = || {
        Arg::new("component")
            .help("Display name or directory name of the component")
            .required(true)
            .index(1)
    };
    let dry_run = || {
        Arg::new("dry-run")
            .long("dry-run")
            .help("Print the result instead of writing files")
            .action(ArgAction::SetTrue)
    };

    Command::new("view2lua")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert GUI editor entry data into flattened Lua templates")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("project")
                .long("project")
                .short('p')
                .global(true)
                .help("Project root (defaults to $VIEW2LUA_PROJECT, then the current directory)"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .help("Enable debug logging")
                .action(ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("list").about("List editor components").arg(
                Arg::new("json")
                    .long("json")
                    .help("Print the component list as JSON")
                    .action(ArgAction::SetTrue),
            ),
        )
        .subcommand(
            Command::new("validate")
                .about("Validate generated Lua against existing template.lua files")
                .arg(component().required(false)),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert one component")
                .arg(component())
                .arg(dry_run()),
        )
        .subcommand(
            Command::new("convert-all")
                .about("Convert every component")
                .arg(dry_run()),
        )
        .subcommand(
            Command::new("inspect")
                .about("Show the sections and widget tree of a component")
                .arg(component()),
        )
        .subcommand(
            Command::new("render")
                .about("Print the Lua generated from an entry_data.ini file")
                .arg(
                    Arg::new("path")
                        .help("Path to the entry_data.ini file")
                        .required(true)
                        .index(1),
                ),
        )
}

fn run(matches: &ArgMatches) -> Result<bool, ViewError> {
    if let Some(("render", sub)) = matches.subcommand() {
        let path = required(sub, "path")?;
        let document = Document::from_file(path)?;
        println!("{}", Converter::new(&document).convert().text);
        return Ok(true);
    }

    let explicit = matches
        .subcommand()
        .and_then(|(_, sub)| sub.get_one::<String>("project"))
        .or_else(|| matches.get_one::<String>("project"));
    let project = Project::resolve(explicit.map(String::as_str))?;

    match matches.subcommand() {
        Some(("list", sub)) => handle_list(&project, sub.get_flag("json")),
        Some(("validate", sub)) => match sub.get_one::<String>("component") {
            Some(name) => handle_validate(&project, name),
            None => {
                let summary = project.validate_all()?;
                print_summary("Validated", &summary);
                Ok(summary.success())
            }
        },
        Some(("convert", sub)) => {
            let name = required(sub, "component")?;
            handle_convert(&project, name, sub.get_flag("dry-run"))
        }
        Some(("convert-all", sub)) => {
            let summary = project.convert_all(sub.get_flag("dry-run"))?;
            print_summary("Converted", &summary);
            Ok(summary.success())
        }
        Some(("inspect", sub)) => handle_inspect(&project, required(sub, "component")?),
        _ => Err(ViewError::RuntimeError {
            message: "Unknown command".into(),
            hint: Some("Run `view2lua --help`".into()),
            code: Some(350),
        }),
    }
}

fn required<'a>(matches: &'a ArgMatches, name: &str) -> Result<&'a str, ViewError> {
    matches
        .get_one::<String>(name)
        .map(String::as_str)
        .ok_or_else(|| ViewError::RuntimeError {
            message: format!("Missing argument: {}", name),
            hint: None,
            code: Some(351),
        })
}

fn handle_list(project: &Project, json: bool) -> Result<bool, ViewError> {
    let components = project.list_components()?;

    if json {
        let text = serde_json::to_string_pretty(&components).map_err(|e| ViewError::RuntimeError {
            message: format!("Failed to serialize component list: {}", e),
            hint: None,
            code: Some(352),
        })?;
        println!("{}", text);
        return Ok(true);
    }

    println!("Found {} components:\n", components.len());
    for component in &components {
        let mark = if component.has_lua { "x" } else { " " };
        match &component.display_name {
            Some(display) => println!("  [{}] {} ({})", mark, component.dir_name, display),
            None => println!("  [{}] {}", mark, component.dir_name),
        }
    }
    Ok(true)
}

fn handle_validate(project: &Project, name: &str) -> Result<bool, ViewError> {
    let outcome = project.validate_component(name)?;

    match &outcome {
        ValidationOutcome::Skipped { template_path } => {
            println!("{}: no existing template at {}, skipped", name, template_path.display());
        }
        ValidationOutcome::Checked(result) => {
            println!("Validating {}", result.display_name);
            for mismatch in &result.structure.missing {
                println!("  {}", mismatch);
            }
            println!(
                "  blocks: {} generated, {} existing",
                result.generated_blocks, result.reference_blocks
            );
            if result.equivalence.is_ok() {
                println!("  PASS: generated Lua matches {}", result.template_path.display());
            } else {
                print!("{}", result.equivalence);
                println!("  FAIL: differences found");
            }
        }
    }

    Ok(outcome.passed())
}

fn handle_convert(project: &Project, name: &str, dry_run: bool) -> Result<bool, ViewError> {
    let outcome = project.convert_component(name, dry_run)?;

    println!("Converting {} ({} sections)", outcome.display_name, outcome.sections.len());
    if dry_run {
        println!("{}", outcome.text);
        return Ok(true);
    }

    if let Some(backup) = &outcome.backup_path {
        println!("  backup: {}", backup.display());
    }
    println!("  written: {}", outcome.template_path.display());
    if let Some(scaffold) = &outcome.scaffolded {
        println!("  created: {}", scaffold.display());
    }
    Ok(true)
}

fn handle_inspect(project: &Project, name: &str) -> Result<bool, ViewError> {
    let component = project.find_component(name)?;
    let document = Document::from_file(component.entry_data_path())?;

    println!("Component: {}", component.name());
    println!("Sections: {}", document.sections.len());
    for section in document.section_names() {
        println!("  {}", section);
    }

    match build_tree(&document) {
        Some(root) => {
            println!("\nTree:");
            print_tree(&root, 1);
        }
        None => println!("\nNo 'template' or 'root' section"),
    }

    let conversion = Converter::new(&document).convert();
    let wrappers: Vec<&str> = conversion.used_wrappers.iter().copied().collect();
    println!("\nBlocks: {}", conversion.items.len());
    println!("Wrappers: {}", wrappers.join(", "));
    Ok(true)
}

fn print_tree(node: &WidgetNode, indent: usize) {
    println!("{}{} [{}]", "  ".repeat(indent), node.name, node.node_type);
    for child in &node.children {
        print_tree(child, indent + 1);
    }
}

fn print_summary(verb: &str, summary: &BatchSummary) {
    println!("\n{} {} components, {} failed", verb, summary.passed, summary.failed);
    for (name, reason) in &summary.failures {
        println!("  {}: {}", name, reason);
    }
}
