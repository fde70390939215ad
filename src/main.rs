//! checklist-audit: compliance scoring CLI for inspection checklists

use anyhow::{Context, Result};
use checklist_audit::analyzer::AuditEngine;
use checklist_audit::catalog::Catalog;
use checklist_audit::config::{
    load_catalog, load_config, write_default_config, ThresholdsConfig, CONFIG_FILENAME,
};
use checklist_audit::export::{save_csv, save_workbook, write_exports, SheetNames};
use checklist_audit::form::sheet::{load_sheet, parse_date, template_csv, template_json};
use checklist_audit::reporter::{ConsoleReporter, HtmlReporter, JsonReporter};
use checklist_audit::AuditReport;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// checklist-audit: score YES/NO/NA inspection checklists by area
#[derive(Parser, Debug)]
#[command(name = "checklist-audit")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
#[command(subcommand_negates_reqs = true)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Filled-in response sheet (.csv or .json)
    #[arg(required = true)]
    sheet: Option<PathBuf>,

    /// Output format as JSON
    #[arg(long, short)]
    json: bool,

    /// Quiet mode (overall ratio only)
    #[arg(long, short)]
    quiet: bool,

    /// Verbose output (list every response)
    #[arg(long, short)]
    verbose: bool,

    /// Write a self-contained HTML report
    #[arg(long, value_name = "FILE")]
    html: Option<PathBuf>,

    /// Write the XLSX workbook
    #[arg(long, value_name = "FILE")]
    xlsx: Option<PathBuf>,

    /// Write the raw responses as CSV
    #[arg(long, value_name = "FILE")]
    csv: Option<PathBuf>,

    /// Write workbook and CSV into DIR using the configured file names
    #[arg(long, value_name = "DIR")]
    export_dir: Option<PathBuf>,

    /// Minimum overall compliance percentage (exit 1 if below)
    #[arg(long, value_name = "PCT")]
    fail_under: Option<f64>,

    /// Path to config file (default: search .auditrc.json next to the sheet and in parents)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Question catalog JSON (default: configured or built-in)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Override the auditor named in the sheet
    #[arg(long)]
    auditor: Option<String>,

    /// Override the audit date in the sheet (YYYY-MM-DD)
    #[arg(long)]
    date: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print a blank response sheet in catalog order
    Template {
        #[arg(long, value_enum, default_value_t = TemplateFormat::Csv)]
        format: TemplateFormat,

        /// Write to FILE instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Question catalog JSON (default: configured or built-in)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Path to config file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List catalog questions grouped by area
    Catalog {
        /// Question catalog JSON (default: configured or built-in)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Path to config file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create .auditrc.json with default thresholds
    Init {
        /// Directory in which to create config (default: current)
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Lowest ratio classified HIGH (default 80)
        #[arg(long)]
        high: Option<f64>,

        /// Lowest ratio classified MEDIUM (default 60)
        #[arg(long)]
        mid: Option<f64>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TemplateFormat {
    Csv,
    Json,
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            ExitCode::from(2)
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> Result<ExitCode> {
    let args = Args::parse();
    init_tracing();
    let cwd = std::env::current_dir().context("Failed to get current directory")?;

    if let Some(cmd) = args.command {
        return match cmd {
            Commands::Template {
                format,
                output,
                catalog,
                config,
            } => {
                let catalog = resolve_catalog(&cwd, config.as_deref(), catalog.as_deref())?;
                run_template(&catalog, format, output.as_deref())
            }
            Commands::Catalog { catalog, config } => {
                let catalog = resolve_catalog(&cwd, config.as_deref(), catalog.as_deref())?;
                run_catalog(&catalog)
            }
            Commands::Init { dir, high, mid } => run_init(&cwd, dir.as_deref(), high, mid),
        };
    }

    let Some(sheet) = args.sheet.as_deref() else {
        anyhow::bail!("A response sheet is required");
    };

    // Config is searched from the sheet's directory
    let work_dir = match sheet.parent() {
        Some(p) if !p.as_os_str().is_empty() => cwd.join(p),
        _ => cwd.clone(),
    };
    let config_path = args.config.as_deref().map(|p| cwd.join(p));
    let cli_catalog = args.catalog.as_deref().map(|p| cwd.join(p));

    // Load config (CLI flags override config file)
    let config = load_config(&work_dir, config_path.as_deref())?
        .merge_with_cli(args.fail_under, cli_catalog.as_deref());
    let catalog = load_catalog(&config, &work_dir)?;

    let mut submission = load_sheet(sheet, &catalog)?;
    if let Some(ref auditor) = args.auditor {
        submission.header.auditor = Some(auditor.clone());
    }
    if let Some(ref date) = args.date {
        submission.header.date = Some(parse_date(date)?);
    }

    let engine = AuditEngine::for_catalog(&config, &catalog)?;
    let report = engine.run(&submission);

    // Output results
    if args.json {
        println!("{}", JsonReporter::new().pretty().report(&report));
    } else if args.quiet {
        ConsoleReporter::new().report_quiet(&report);
    } else {
        let mut reporter = ConsoleReporter::new();
        if args.verbose {
            reporter = reporter.verbose();
        }
        reporter.report(&report);
    }

    let notify = !args.quiet && !args.json;
    let sheet_names = SheetNames::from_config(&config.export.sheets);

    if let Some(ref path) = args.html {
        std::fs::write(path, HtmlReporter::new().report(&report))
            .with_context(|| format!("Failed to write HTML report: {}", path.display()))?;
        announce(notify, path);
    }
    if let Some(ref path) = args.xlsx {
        save_workbook(&report, &sheet_names, path)?;
        announce(notify, path);
    }
    if let Some(ref path) = args.csv {
        save_csv(&report, path)?;
        announce(notify, path);
    }
    if let Some(ref dir) = args.export_dir {
        for path in write_exports(&report, dir, &config.export)? {
            announce(notify, &path);
        }
    }

    // Check compliance gate (config or CLI)
    if let Some(min) = config.fail_under {
        if below_gate(&report, min) {
            if notify {
                eprintln!(
                    "\n{}: Compliance {:.2}% is below {}%",
                    "Failed".red().bold(),
                    report.final_table.total.ratio,
                    min
                );
            }
            return Ok(ExitCode::from(1));
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn below_gate(report: &AuditReport, min: f64) -> bool {
    report.final_table.total.ratio < min
}

fn announce(notify: bool, path: &Path) {
    if notify {
        eprintln!("{}: Wrote {}", "Info".blue(), path.display());
    }
}

/// Catalog for the subcommands: --catalog, else the config's, else built-in
fn resolve_catalog(
    cwd: &Path,
    config: Option<&Path>,
    catalog: Option<&Path>,
) -> Result<Catalog> {
    let config_path = config.map(|p| cwd.join(p));
    let cli_catalog = catalog.map(|p| cwd.join(p));
    let config =
        load_config(cwd, config_path.as_deref())?.merge_with_cli(None, cli_catalog.as_deref());
    load_catalog(&config, cwd)
}

fn run_template(
    catalog: &Catalog,
    format: TemplateFormat,
    output: Option<&Path>,
) -> Result<ExitCode> {
    let content = match format {
        TemplateFormat::Csv => template_csv(catalog)?,
        TemplateFormat::Json => template_json(catalog)?,
    };
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write template: {}", path.display()))?;
            eprintln!(
                "{}: Wrote {} ({} questions)",
                "Done".green().bold(),
                path.display(),
                catalog.len()
            );
        }
        None => print!("{}", content),
    }
    Ok(ExitCode::SUCCESS)
}

fn run_catalog(catalog: &Catalog) -> Result<ExitCode> {
    println!();
    println!("{}", format!("📋 {}", catalog.name()).bold());
    for area in catalog.areas() {
        println!();
        println!("   {}", area.bold());
        for (i, q) in catalog.questions_in(area).enumerate() {
            println!("   {:>3}. {}", i + 1, q.prompt);
        }
    }
    println!();
    println!(
        "   {} questions in {} areas",
        catalog.len(),
        catalog.areas().len()
    );
    Ok(ExitCode::SUCCESS)
}

fn run_init(
    cwd: &Path,
    dir: Option<&Path>,
    high: Option<f64>,
    mid: Option<f64>,
) -> Result<ExitCode> {
    let dir = dir.map(|d| cwd.join(d)).unwrap_or_else(|| cwd.to_path_buf());
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() {
        eprintln!(
            "{}: {} already exists; use --dir to write elsewhere or remove it first",
            "Warning".yellow(),
            config_path.display()
        );
        return Ok(ExitCode::SUCCESS);
    }

    let thresholds = ThresholdsConfig {
        high: Some(high.unwrap_or(80.0)),
        mid: Some(mid.unwrap_or(60.0)),
    };
    let path = write_default_config(&dir, thresholds)?;

    println!(
        "{}: Created {} with high={}, mid={}",
        "Done".green().bold(),
        path.display(),
        thresholds.high.unwrap_or_default(),
        thresholds.mid.unwrap_or_default()
    );
    Ok(ExitCode::SUCCESS)
}
