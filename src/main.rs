use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use humansize::{format_size, BINARY};
use janitor::{CleanupConfig, CleanupManager, CleanupReport, StructureReport, ValidationReport};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Clean project artifacts with reversible, hash-verified deletes",
    long_about = None
)]
struct Args {
    /// Project root to operate on
    #[arg(short = 'C', long, default_value = ".", global = true)]
    path: PathBuf,

    /// Read patterns from a config file instead of the built-in defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit reports as JSON for machine consumption
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Remove temp files, caches, test artifacts, build outputs, and logs
    Clean {
        /// Delete without taking backups first (not reversible!)
        #[arg(long)]
        no_backups: bool,
    },
    /// Create any missing canonical directories and re-validate the layout
    Optimize,
    /// Check the directory layout against the production template
    Validate,
    /// Run cleanup, optimization, and validation in one pass
    Summary,
}

fn load_config(args: &Args) -> Result<CleanupConfig> {
    match &args.config {
        Some(path) => CleanupConfig::from_file(path),
        None => CleanupConfig::load_defaults(),
    }
}

fn print_cleanup_report(report: &CleanupReport) {
    println!("{}", "Cleanup complete".bold());
    println!("  Files removed:       {}", report.files_removed);
    println!("  Directories cleaned: {}", report.directories_cleaned);
    println!(
        "  Space freed:         {}",
        format_size(report.space_freed_bytes, BINARY).green()
    );
    if !report.issues_encountered.is_empty() {
        println!(
            "  {}",
            format!("{} issues encountered:", report.issues_encountered.len()).red()
        );
        for issue in &report.issues_encountered {
            println!("    - {}", issue);
        }
    }
    for rec in &report.recommendations {
        println!("  {} {}", "hint:".cyan(), rec);
    }
}

fn print_structure_report(report: &StructureReport) {
    println!("{}", "Structure optimization complete".bold());
    println!("  Directories created: {}", report.directories_reorganized);
    for improvement in &report.improvements {
        println!("    + {}", improvement);
    }
    print_pass_fail(report.validation_passed, report.structure_score);
}

fn print_validation_report(report: &ValidationReport) {
    println!("{}", "Production readiness".bold());
    for issue in &report.issues {
        println!("    - {}", issue.red());
    }
    for rec in &report.recommendations {
        println!("  {} {}", "hint:".cyan(), rec);
    }
    print_pass_fail(report.validation_passed, report.structure_score);
}

fn print_pass_fail(passed: bool, score: f64) {
    let verdict = if passed {
        "PASSED".green().bold()
    } else {
        "FAILED".red().bold()
    };
    println!("  Validation: {} (structure score {:.2})", verdict, score);
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = load_config(&args)?;
    if let Command::Clean { no_backups } = &args.command {
        config.skip_backups = *no_backups;
    }
    let mut manager = CleanupManager::new(&args.path, &config);

    match &args.command {
        Command::Clean { .. } => {
            let report = manager.cleanup_artifacts()?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_cleanup_report(&report);
            }
        }
        Command::Optimize => {
            let report = manager.optimize_structure()?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_structure_report(&report);
            }
        }
        Command::Validate => {
            let report = manager.validate_production_readiness()?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_validation_report(&report);
            }
        }
        Command::Summary => {
            let summary = manager.generate_summary()?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print_cleanup_report(&summary.cleanup);
                print_structure_report(&summary.structure);
                print_validation_report(&summary.validation);
                let verdict = if summary.overall_success {
                    "Overall: success".green().bold()
                } else {
                    "Overall: needs attention".yellow().bold()
                };
                println!("{}", verdict);
            }
        }
    }

    Ok(())
}
