use crate::config::Config;
use anyhow::{anyhow, Result};
use clap::{Args, ValueEnum};
use cnx_editor::{Document, EditorConfig};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DumpFormat {
    /// Node tree as JSON
    Json,
    /// One-line tree outline
    Outline,
    /// Serialized CNXML
    Cnxml,
}

#[derive(Args, Debug)]
pub struct DumpArgs {
    /// Module file to dump
    pub file: PathBuf,

    #[arg(short, long, value_enum, default_value = "json")]
    pub format: DumpFormat,

    /// Skip normalization, show the tree as loaded
    #[arg(long)]
    pub raw: bool,
}

pub fn dump(args: DumpArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    if !args.file.is_file() {
        return Err(anyhow!("Not a file: {}", args.file.display()));
    }

    let editor = EditorConfig {
        normalize_on_load: !args.raw,
        ..config.editor
    };
    let doc = Document::load_with_config(&args.file, editor)?;

    let output = match args.format {
        DumpFormat::Json => doc.to_json()?,
        DumpFormat::Outline => doc.tree().outline(doc.tree().root()),
        DumpFormat::Cnxml => doc.source(),
    };
    println!("{}", output);

    Ok(())
}
