use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

use toolcat::request::RequestPlanner;
use toolcat::tools::{LintReport, Severity, ToolCatalog, ToolDescriptor, ToolKind, lint_records};

mod cli;
mod config;

use cli::Cli;
use cli::commands::Commands;
use config::Config;

fn setup_logging() -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("toolcat")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("toolcat.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    match &cli.command {
        None => handle_list_command(cli, config, None, None, None),
        Some(Commands::List { tool_type, label, kind }) => {
            handle_list_command(cli, config, tool_type.as_deref(), label.as_deref(), *kind)
        }
        Some(Commands::Show { name, json }) => handle_show_command(cli, config, name, *json),
        Some(Commands::Find { keyword }) => handle_find_command(cli, config, keyword),
        Some(Commands::Lint { files, strict }) => handle_lint_command(cli, config, files, *strict),
        Some(Commands::Normalize { file, output }) => handle_normalize_command(file, output.as_deref()),
        Some(Commands::Prepare { name, args }) => handle_prepare_command(cli, config, name, args),
    }
}

fn load_catalog(cli: &Cli, config: &Config) -> Result<ToolCatalog> {
    config::load_catalog(config, &cli.catalogs).context("Failed to load tool catalog")
}

fn summary_line(tool: &ToolDescriptor) -> String {
    let first_line = tool.description.lines().next().unwrap_or_default();
    let tag = match &tool.tool_type {
        Some(ty) => ty.clone(),
        None => "meta".to_string(),
    };
    format!("{:<48} {:<8} {}", tool.name.green(), tag.cyan(), first_line)
}

fn handle_list_command(
    cli: &Cli,
    config: &Config,
    tool_type: Option<&str>,
    label: Option<&str>,
    kind: Option<ToolKind>,
) -> Result<()> {
    info!("Listing tools - type: {:?}, label: {:?}, kind: {:?}", tool_type, label, kind);
    let catalog = load_catalog(cli, config)?;

    let tools: Vec<&ToolDescriptor> = catalog
        .all()
        .filter(|t| tool_type.is_none_or(|ty| t.tool_type.as_deref() == Some(ty)))
        .filter(|t| label.is_none_or(|l| t.has_label(l)))
        .filter(|t| kind.is_none_or(|k| t.kind() == k))
        .collect();

    if tools.is_empty() {
        println!("{}", "No matching tools".yellow());
        return Ok(());
    }
    for tool in &tools {
        println!("{}", summary_line(tool));
    }
    if cli.is_verbose() {
        println!("{} {} of {} tools", "Shown:".cyan(), tools.len(), catalog.len());
    }
    Ok(())
}

fn handle_show_command(cli: &Cli, config: &Config, name: &str, json: bool) -> Result<()> {
    info!("Showing tool: {} (json: {})", name, json);
    let catalog = load_catalog(cli, config)?;
    let tool = catalog
        .get(name)
        .ok_or_else(|| eyre::eyre!("Tool not found: {}", name))?;

    if json {
        println!("{}", serde_json::to_string_pretty(tool)?);
        return Ok(());
    }

    println!("{} {}", "Name:".green(), tool.name);
    println!("{} {:?}", "Kind:".green(), tool.kind());
    if let Some(meta) = tool.meta_tool() {
        let role = if meta.is_terminal() { "ends the run" } else { "continues the run" };
        println!("{} {}", "Control:".green(), role);
    }
    if let Some(ty) = &tool.tool_type {
        println!("{} {}", "Type:".green(), ty);
    }
    if let Some(url) = &tool.tool_url {
        println!("{} {}", "URL:".green(), url);
    }
    if !tool.labels().is_empty() {
        println!("{} {}", "Labels:".green(), tool.labels().join(", "));
    }
    println!("{}", "Description:".green());
    for line in tool.description.lines() {
        println!("  {}", line);
    }

    let required = tool.parameter.required_names();
    println!("{}", "Parameters:".green());
    for param in tool.parameter.property_names() {
        let marker = if required.iter().any(|r| r == param) { "*" } else { " " };
        let ty = tool
            .parameter
            .property(param)
            .and_then(|p| p.get("type"))
            .map(|t| t.to_string())
            .unwrap_or_default();
        println!("  {}{} {}", marker.red(), param, ty.dimmed());
    }
    Ok(())
}

fn handle_find_command(cli: &Cli, config: &Config, keyword: &str) -> Result<()> {
    info!("Searching tools for: {}", keyword);
    let catalog = load_catalog(cli, config)?;
    let found = catalog.find(keyword);

    if found.is_empty() {
        println!("{} {}", "No tools match:".yellow(), keyword);
        return Ok(());
    }
    for tool in found {
        println!("{}", summary_line(tool));
    }
    Ok(())
}

fn read_records(path: &Path) -> Result<Vec<ToolDescriptor>> {
    config::read_records(path)
}

fn print_report(source: &str, report: &LintReport) {
    for issue in &report.issues {
        let line = format!("{}: {}", source, issue);
        match issue.severity {
            Severity::Error => println!("{}", line.red()),
            Severity::Warning => println!("{}", line.yellow()),
        }
    }
}

fn handle_lint_command(cli: &Cli, config: &Config, files: &[PathBuf], strict: bool) -> Result<()> {
    let strict = strict || config.lint.strict;
    info!("Linting {} file(s) (strict: {})", files.len(), strict);

    let mut report = LintReport::default();
    if files.is_empty() {
        let catalog = load_catalog(cli, config)?;
        let records: Vec<ToolDescriptor> = catalog.all().cloned().collect();
        let found = lint_records(&records);
        print_report("catalog", &found);
        report.extend(found);
    } else {
        for file in files {
            let found = lint_records(&read_records(file)?);
            print_report(&file.display().to_string(), &found);
            report.extend(found);
        }
    }

    let errors = report.errors().len();
    let warnings = report.warnings().len();
    if !report.passes(strict) {
        eyre::bail!("Lint failed: {} error(s), {} warning(s)", errors, warnings);
    }
    println!("{} {} error(s), {} warning(s)", "Lint passed:".green(), errors, warnings);
    Ok(())
}

fn handle_normalize_command(file: &Path, output: Option<&Path>) -> Result<()> {
    info!("Normalizing {}", file.display());
    let records: Vec<ToolDescriptor> = read_records(file)?.iter().map(ToolDescriptor::normalized).collect();
    let content = serde_json::to_string_pretty(&records).context("Failed to serialize catalog")?;

    match output {
        Some(path) => {
            fs::write(path, format!("{}\n", content)).with_context(|| format!("Failed to write {}", path.display()))?;
            println!("{} {} -> {}", "Normalized:".green(), file.display(), path.display());
        }
        None => println!("{}", content),
    }
    Ok(())
}

fn handle_prepare_command(cli: &Cli, config: &Config, name: &str, args: &str) -> Result<()> {
    info!("Preparing request for tool: {}", name);
    let catalog = load_catalog(cli, config)?;
    let args: serde_json::Value = serde_json::from_str(args).context("--args must be valid JSON")?;

    let planner = RequestPlanner::new(config.endpoints.urls.clone());
    let url = planner
        .plan(&catalog, name, &args)
        .with_context(|| format!("Failed to prepare request for {}", name))?;
    println!("{}", url);
    Ok(())
}

fn main() -> Result<()> {
    // Setup logging first
    setup_logging().context("Failed to setup logging")?;

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    run_application(&cli, &config).context("Application failed")?;

    Ok(())
}
