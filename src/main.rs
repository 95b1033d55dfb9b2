//! # Phomemo CLI
//!
//! Command-line interface for Phomemo D30/D35 label printing.
//!
//! ## Usage
//!
//! ```bash
//! # Show the printer's Bluetooth info block
//! phomemo info
//!
//! # Check that the printer is connected and bound to a serial port
//! phomemo status
//!
//! # Print a label image (320x96)
//! phomemo print QR-part-42.png
//!
//! # Write the wire bytes or a thresholded preview instead of printing
//! phomemo print QR-part-42.png --dump job.bin
//! phomemo print QR-part-42.png --png preview.png
//! ```
//!
//! Set `RUST_LOG=phomemo=debug` to trace tool invocations and packets.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use phomemo::{
    Phomemo, PhomemoError, RasterImage, Settings,
    protocol::{job::PrintJob, raster},
};

/// Phomemo - Bluetooth label printer utility
#[derive(Parser, Debug)]
#[command(name = "phomemo")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Settings file (defaults to ~/.config/phomemo/config.toml if present)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the printer's Bluetooth information
    Info,

    /// Check whether the printer is connected and which port it uses
    Status,

    /// Print a label image file
    Print {
        /// Image file to print
        file: PathBuf,

        /// Write the encoded print job to FILE instead of printing
        #[arg(long, value_name = "FILE")]
        dump: Option<PathBuf>,

        /// Write a preview of the printed dots to FILE instead of printing
        #[arg(long, value_name = "FILE")]
        png: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("phomemo=info")))
        .init();

    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode, PhomemoError> {
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Info => {
            let printer = Phomemo::discover(&settings)?;
            match printer.info()? {
                Some(info) => println!("{}", info),
                None => println!("Printer not found or not connected."),
            }
        }

        Commands::Status => {
            let printer = Phomemo::discover(&settings)?;
            if !printer.is_connected()? {
                println!("Printer not connected");
                return Ok(ExitCode::FAILURE);
            }
            match printer.port()? {
                Some(port) => {
                    println!("Phomemo {} connected on RFCOMM port: {}", printer.name(), port)
                }
                None => {
                    println!("Phomemo printer not connected, check Bluetooth connection");
                    return Ok(ExitCode::FAILURE);
                }
            }
        }

        Commands::Print { file, dump, png } => {
            // Decode first: a bad path never reaches Bluetooth
            let image = RasterImage::open(&file)?;

            if dump.is_some() || png.is_some() {
                if let Some(path) = dump {
                    write_dump(&path, &image)?;
                    println!("Saved print job to {}", path.display());
                }
                if let Some(path) = png {
                    save_preview(&path, &image)?;
                    println!("Saved preview to {}", path.display());
                }
                return Ok(ExitCode::SUCCESS);
            }

            let printer = Phomemo::discover(&settings)?;
            println!("Printing label: {} to {}", file.display(), printer.name());
            printer.print_image(&image)?;
            println!("Print job sent.");
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Write the exact bytes a print would send
fn write_dump(path: &Path, image: &RasterImage) -> Result<(), PhomemoError> {
    std::fs::write(path, PrintJob::from_image(image).to_bytes())?;
    Ok(())
}

/// Save the encoded dots as a PNG image
fn save_preview(path: &Path, image: &RasterImage) -> Result<(), PhomemoError> {
    let chunks = raster::encode(image);
    raster::preview(&chunks, image.width()).save(path)?;
    Ok(())
}
