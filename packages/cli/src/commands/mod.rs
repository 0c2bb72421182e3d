pub mod check;
pub mod dump;
pub mod init;
pub mod normalize;

pub use check::{check, CheckArgs};
pub use dump::{dump, DumpArgs};
pub use init::{init, InitArgs};
pub use normalize::{normalize, NormalizeArgs};

use crate::config::Config;
use anyhow::{anyhow, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Module files named on the command line, or all of the source directory
pub fn resolve_inputs(input: Option<&Path>, config: &Config, cwd: &Path) -> Result<Vec<PathBuf>> {
    let input = match input {
        Some(input) => input.to_path_buf(),
        None => config.get_src_dir(cwd),
    };

    if input.is_file() {
        Ok(vec![input])
    } else if input.is_dir() {
        Ok(find_modules(&input, &config.extension))
    } else {
        Err(anyhow!("Input path does not exist: {}", input.display()))
    }
}

fn find_modules(dir: &Path, extension: &str) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|entry| entry.into_path())
        .filter(|path| path.is_file() && path.extension().and_then(|s| s.to_str()) == Some(extension))
        .collect();
    files.sort();
    files
}
