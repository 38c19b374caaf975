//! Writes the snapshot manifest the viewer loads at startup.
mod discovery;
mod error;
mod manifest;
mod validation;

use clap::Parser;
use constants::path::{DEFAULT_MANIFEST_PATH, MODEL_DIRECTORY};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};

use discovery::discover_models;
use error::BuildError;
use manifest::{OutputFormat, build_manifest, write_manifest};
use validation::validate_model;

#[derive(Parser, Debug)]
#[command(name = "manifest-builder", about = "Build the snapshot manifest from a model directory")]
struct Args {
    /// Directory holding the .glb/.gltf snapshots (not searched recursively).
    #[arg(long, default_value = MODEL_DIRECTORY)]
    models_dir: PathBuf,

    #[arg(long, default_value = DEFAULT_MANIFEST_PATH)]
    output: PathBuf,

    #[arg(long, value_enum, default_value_t = OutputFormat::Records)]
    format: OutputFormat,

    /// Skip header checks on every model.
    #[arg(long)]
    skip_validation: bool,
}

fn validate_all(models: &[PathBuf]) -> Result<(), BuildError> {
    let pb = ProgressBar::new(models.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{bar:40.green/blue}] {pos}/{len} models ({percent}%) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏"),
    );

    for model in models {
        pb.set_message(file_name(model));
        if let Err(error) = validate_model(model) {
            pb.abandon_with_message("validation failed");
            return Err(error);
        }
        pb.inc(1);
    }

    pb.finish_with_message("Models validated");
    Ok(())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn run(args: Args) -> Result<(), BuildError> {
    println!("Scanning {}", args.models_dir.display());
    let models = discover_models(&args.models_dir)?;
    println!("Found {} models", models.len());

    if !args.skip_validation {
        validate_all(&models)?;
    }

    let files: Vec<String> = models.iter().map(|path| file_name(path)).collect();
    let manifest = build_manifest(&files, args.format);
    write_manifest(&args.output, &manifest)?;

    println!(
        "✓ Wrote {} entries to {}",
        files.len(),
        args.output.display()
    );
    Ok(())
}

fn main() {
    if let Err(error) = run(Args::parse()) {
        eprintln!("error: {}", error);
        std::process::exit(1);
    }
}
