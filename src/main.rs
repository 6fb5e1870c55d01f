//! # Acredita CLI
//!
//! Command-line interface for credential rendering.
//!
//! ## Usage
//!
//! ```bash
//! # Render one credential (PNG + PDF)
//! acredita render record.json
//!
//! # Render and print the report as JSON
//! acredita render --report record.json
//!
//! # Render many records in parallel
//! acredita batch records/*.json
//!
//! # Canvas size a template would produce
//! acredita dimensions template.png
//!
//! # Wrap an existing raster into a PDF
//! acredita pdf badge.png --out badge.pdf
//! ```

use clap::{Parser, Subcommand};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

use acredita::{
    AcreditaError, RenderConfig,
    compose::{Compositor, detect_dimensions, generate_with},
    pdf::wrap_as_pdf,
    snapshot::{CredentialRecord, TemplateSnapshot},
};

/// Acredita - Credential badge compositor
#[derive(Parser, Debug)]
#[command(name = "acredita")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Render configuration (JSON); defaults when omitted
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render one credential record to PNG and PDF
    Render {
        /// Credential record (JSON)
        record: PathBuf,

        /// Print the render report as JSON
        #[arg(long)]
        report: bool,
    },

    /// Render several records in parallel
    Batch {
        /// Credential records (JSON)
        #[arg(required = true)]
        records: Vec<PathBuf>,
    },

    /// Show the canvas size a template image produces
    Dimensions {
        /// Template image
        template: PathBuf,
    },

    /// Wrap a raster into a print-exact PDF
    Pdf {
        /// Raster image (PNG/JPEG)
        raster: PathBuf,

        /// Output path (defaults to the raster path with .pdf)
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logger(cli.verbose);
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logger(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn load_record(path: &Path) -> Result<CredentialRecord, AcreditaError> {
    CredentialRecord::from_json(&std::fs::read_to_string(path)?)
}

fn run(cli: Cli) -> Result<(), AcreditaError> {
    let config = match &cli.config {
        Some(path) => RenderConfig::from_file(path)?,
        None => RenderConfig::default(),
    };

    match cli.command {
        Commands::Render { record, report } => {
            let record = load_record(&record)?;
            let mut compositor = Compositor::new(config)?;
            let artifacts = generate_with(&mut compositor, &record)?;
            if report {
                println!("{}", serde_json::to_string_pretty(&artifacts.report)?);
            } else {
                println!("PNG: {}", artifacts.image_path.display());
                if let Some(pdf) = &artifacts.pdf {
                    println!(
                        "PDF: {} ({:.1} x {:.1} mm)",
                        pdf.path.display(),
                        pdf.width_mm,
                        pdf.height_mm
                    );
                }
            }
        }

        Commands::Batch { records } => {
            // Fail fast on config problems before fanning out
            Compositor::new(config.clone())?;

            let results: Vec<(PathBuf, Result<PathBuf, AcreditaError>)> = records
                .into_par_iter()
                .map(|path| {
                    let outcome = load_record(&path).and_then(|record| {
                        let mut compositor = Compositor::new(config.clone())?;
                        generate_with(&mut compositor, &record).map(|a| a.image_path)
                    });
                    (path, outcome)
                })
                .collect();

            let mut failed = 0;
            for (path, outcome) in &results {
                match outcome {
                    Ok(image) => println!("ok    {} -> {}", path.display(), image.display()),
                    Err(e) => {
                        failed += 1;
                        println!("FAIL  {}: {}", path.display(), e);
                    }
                }
            }
            println!("{} rendered, {} failed", results.len() - failed, failed);
            if failed > 0 {
                std::process::exit(1);
            }
        }

        Commands::Dimensions { template } => {
            let snapshot = TemplateSnapshot {
                file_path: Some(template),
                ..Default::default()
            };
            let dims = detect_dimensions(Some(&snapshot), &config);
            println!("{}", serde_json::to_string_pretty(&dims)?);
        }

        Commands::Pdf { raster, out } => {
            let out = out.unwrap_or_else(|| raster.with_extension("pdf"));
            match wrap_as_pdf(&raster, &out, config.pdf_dpi)? {
                Some(pdf) => println!(
                    "PDF: {} ({:.1} x {:.1} mm, {:?})",
                    pdf.path.display(),
                    pdf.width_mm,
                    pdf.height_mm,
                    pdf.orientation
                ),
                None => {
                    return Err(AcreditaError::Io(std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        format!("raster not found: {}", raster.display()),
                    )));
                }
            }
        }
    }

    Ok(())
}
