use crate::commands::resolve_inputs;
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use cnx_editor::{Document, EditorConfig};
use colored::Colorize;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct NormalizeArgs {
    /// Module file or directory (defaults to the source directory)
    pub input: Option<PathBuf>,

    /// Only report which modules would change
    #[arg(long)]
    pub check: bool,

    /// Print normalized modules instead of writing them back
    #[arg(long)]
    pub stdout: bool,
}

pub fn normalize(args: NormalizeArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let files = resolve_inputs(args.input.as_deref(), &config, cwd)?;
    let editor = EditorConfig {
        normalize_on_load: false,
        ..config.editor.clone()
    };

    if !args.stdout {
        println!("{}", "🔧 Normalizing modules...".bright_blue().bold());
    }

    let mut changed = 0;
    for path in &files {
        let mut doc = Document::load_with_config(path, editor.clone())?;
        let result = doc.normalize()?;
        let report = &result.value;

        for violation in &report.unresolved {
            eprintln!("  {} {}: {}", "⚠️".yellow(), path.display(), violation);
        }

        if args.stdout {
            println!("{}", doc.source());
            continue;
        }
        if result.operations.is_empty() {
            continue;
        }

        changed += 1;
        if args.check {
            println!("  {} {} ({} edits)", "✗".red(), path.display(), report.edits);
        } else {
            doc.save()?;
            println!("  {} {} ({} edits)", "✓".green(), path.display(), report.edits);
        }
    }

    if args.stdout {
        return Ok(());
    }

    println!();
    println!("   Files: {}, changed: {}", files.len(), changed);

    if args.check && changed > 0 {
        std::process::exit(1);
    }
    Ok(())
}
