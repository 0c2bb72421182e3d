use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::Path;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Source directory
    #[arg(short, long, default_value = "src")]
    pub src_dir: String,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

const EXAMPLE_MODULE: &str = r#"<document xmlns="http://cnx.rice.edu/cnxml">
<content>
<section id="intro">
<title>Introduction</title>
<para id="intro-para">Modules are written in <emphasis effect="italics">CNXML</emphasis>.</para>
<exercise id="ex1">
<problem><para>What is 2 + 2?</para></problem>
<solution><para>4</para></solution>
</exercise>
</section>
</content>
</document>
"#;

pub fn init(args: InitArgs, cwd: &Path) -> Result<()> {
    let config_path = cwd.join(DEFAULT_CONFIG_NAME);

    // Check if config already exists
    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing cnx project...".bright_blue().bold());

    // Create source directory if it doesn't exist
    let src_dir = cwd.join(&args.src_dir);
    if !src_dir.exists() {
        fs::create_dir_all(&src_dir)?;
        println!("  {} Created {}/", "✓".green(), args.src_dir);
    }

    let config = Config {
        src_dir: args.src_dir.clone(),
        ..Config::default()
    };

    // Create example module
    let example_file = src_dir.join(format!("example.{}", config.extension));
    if !example_file.exists() {
        fs::write(&example_file, EXAMPLE_MODULE)?;
        println!("  {} Created {}", "✓".green(), example_file.display());
    }

    // Write config file
    let config_json = serde_json::to_string_pretty(&config)?;
    fs::write(&config_path, config_json)?;

    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    println!();
    println!("{}", "✅ Project initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Add modules to {}/", args.src_dir);
    println!("  2. Run: cnx check");

    Ok(())
}
