use crate::commands::resolve_inputs;
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use cnx_editor::{Document, EditorConfig, Violation};
use colored::Colorize;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Module file or directory to check (defaults to the source directory)
    pub input: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    pub format: String,
}

#[derive(Debug, Serialize)]
struct FileReport {
    path: PathBuf,
    violations: Vec<Violation>,
}

pub fn check(args: CheckArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let files = resolve_inputs(args.input.as_deref(), &config, cwd)?;
    // Report the document as written
    let editor = EditorConfig {
        normalize_on_load: false,
        ..config.editor.clone()
    };

    let mut reports = Vec::new();
    let mut failed = 0;
    for path in files {
        match Document::load_with_config(&path, editor.clone()) {
            Ok(doc) => reports.push(FileReport {
                path,
                violations: doc.violations(),
            }),
            Err(err) => {
                failed += 1;
                eprintln!("{} Failed to load {}: {}", "✗".red(), path.display(), err);
            }
        }
    }

    let total: usize = reports.iter().map(|r| r.violations.len()).sum();

    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        print_text(&reports);
        println!();
        println!("   Files checked: {}", reports.len() + failed);
        if total > 0 {
            println!("   {} {}", "Violations:".red(), total);
        } else if failed == 0 {
            println!("   {} No issues found!", "✓".green());
        }
    }

    // Exit with error code if anything is wrong
    if total > 0 || failed > 0 {
        std::process::exit(1);
    }

    Ok(())
}

fn print_text(reports: &[FileReport]) {
    for report in reports {
        if report.violations.is_empty() {
            println!("{} {}", "✓".green(), report.path.display());
            continue;
        }

        println!("{}", report.path.display());
        for violation in &report.violations {
            println!("  {} [{}] {}", "error".red().bold(), violation.code(), violation);
        }
    }
}
