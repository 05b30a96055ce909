//! Command-line interface for devsite-refdocs.

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

use crate::config::DevsiteConfig;
use crate::external::StaticClasslikes;
use crate::model::{Classlike, Module};
use crate::site::{write_view, RenderPass};

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_ERROR: i32 = 2;

/// Resolve and cross-reference analyzer output into devsite reference docs.
#[derive(Parser)]
#[command(name = "devsite-refdocs")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render the Java and Kotlin views of one or more analyzer models
    Render(RenderArgs),
}

/// Arguments for the render command.
#[derive(Parser)]
pub struct RenderArgs {
    /// Model JSON files, or directories to search for them
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Path to the devsite YAML configuration
    #[arg(short, long)]
    pub config: PathBuf,

    /// Output directory
    #[arg(short, long, default_value = "out")]
    pub out: PathBuf,

    /// JSON array of class-likes outside the documented sources
    #[arg(long)]
    pub classpath_model: Option<PathBuf>,

    /// Log progress at info level
    #[arg(short, long)]
    pub verbose: bool,
}

/// Collect model files: files as given, directories walked for `*.json`.
fn collect_models(inputs: &[PathBuf]) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_file() {
            files.push(input.clone());
            continue;
        }
        for entry in WalkDir::new(input)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                // Skip hidden directories
                !(e.file_type().is_dir() && e.depth() > 0 && e.file_name().to_string_lossy().starts_with('.'))
            })
        {
            let entry = entry.with_context(|| format!("cannot walk {}", input.display()))?;
            let path = entry.path();
            if entry.file_type().is_file() && path.extension().and_then(|e| e.to_str()) == Some("json") {
                files.push(path.to_path_buf());
            }
        }
    }
    Ok(files)
}

/// Read one analyzer module from JSON.
pub fn load_module(path: &Path) -> anyhow::Result<Module> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("cannot read model {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("invalid model {}", path.display()))
}

fn load_classpath(path: &Path) -> anyhow::Result<StaticClasslikes> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("cannot read classpath model {}", path.display()))?;
    let classlikes: Vec<Classlike> = serde_json::from_str(&content)
        .with_context(|| format!("invalid classpath model {}", path.display()))?;
    Ok(StaticClasslikes::new(classlikes.into_iter().map(Arc::new)))
}

/// Run the render command.
pub fn run_render(args: &RenderArgs) -> anyhow::Result<i32> {
    let config = match DevsiteConfig::parse_file(&args.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error parsing configuration: {}", e);
            return Ok(EXIT_ERROR);
        }
    };
    let mut pass = match RenderPass::new(config) {
        Ok(pass) => pass,
        Err(e) => {
            eprintln!("Error: invalid configuration: {}", e);
            return Ok(EXIT_ERROR);
        }
    };
    if let Some(classpath) = &args.classpath_model {
        pass = pass.external_classlikes(Arc::new(load_classpath(classpath)?));
    }

    let files = collect_models(&args.inputs)?;
    if files.is_empty() {
        eprintln!("Error: no model files found");
        return Ok(EXIT_ERROR);
    }
    let modules = files
        .iter()
        .map(|path| load_module(path))
        .collect::<anyhow::Result<Vec<_>>>()?;
    tracing::info!(models = modules.len(), "Loaded models");

    let runtime = tokio::runtime::Runtime::new().context("cannot start runtime")?;
    let views = runtime.block_on(pass.run(modules))?;

    println!("{}", "devsite-refdocs".cyan().bold());
    for view in &views {
        let written = write_view(view, &args.out)?;
        println!(
            "  {} {:<8} {} packages, {} classes {}",
            "✓".green(),
            view.language.as_str(),
            written.packages,
            written.classlikes,
            format!("→ {}", args.out.join(view.root_path.trim_start_matches('/')).display()).dimmed()
        );
    }

    Ok(EXIT_SUCCESS)
}
