//! # Labelbridge CLI
//!
//! Command-line interface for printing labels from stored printer forms.
//!
//! ## Usage
//!
//! ```bash
//! # Print one label per row of a CSV file (FORM,V00,V01,...)
//! labelbridge print labels.csv
//!
//! # Rows carry a variable count (FORM,COUNT,V00,...)
//! labelbridge print --layout counted labels.csv
//!
//! # Use another port
//! labelbridge --port COM3 print labels.csv
//!
//! # List forms stored in the printer
//! labelbridge forms
//!
//! # List serial ports
//! labelbridge ports
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use labelbridge::{
    LabelError, PrinterConfig, PrinterSession, SerialTransport,
    record::{self, RecordLayout},
    transport::serial,
};

/// Labelbridge - Thermal label printer utility
#[derive(Parser, Debug)]
#[command(name = "labelbridge")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML file with printer settings
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Serial port the printer is connected to
    #[arg(long, global = true)]
    port: Option<String>,

    /// Baud rate
    #[arg(long, global = true)]
    baud: Option<u32>,

    /// Read timeout in milliseconds
    #[arg(long, global = true, value_name = "MS")]
    read_timeout: Option<u64>,

    /// Write timeout in milliseconds
    #[arg(long, global = true, value_name = "MS")]
    write_timeout: Option<u64>,

    /// Log protocol traffic
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print one label per record in a CSV file
    Print {
        /// CSV file of records
        file: PathBuf,

        /// Field layout of each record
        #[arg(long, value_enum, default_value_t = RecordLayout::Plain)]
        layout: RecordLayout,
    },

    /// List forms stored in the printer
    Forms {
        /// Print the list as JSON
        #[arg(long)]
        json: bool,
    },

    /// List available serial ports
    Ports,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn run(cli: Cli) -> Result<(), LabelError> {
    let config = resolve_config(&cli)?;
    debug!(?config, "Printer settings");

    match cli.command {
        Commands::Print { file, layout } => {
            let records = record::load_records(&file, layout)?;
            if records.is_empty() {
                return Err(LabelError::Config(format!(
                    "{} contains no records",
                    file.display()
                )));
            }

            let session = PrinterSession::new(&config);
            for rec in &records {
                info!(form = %rec.form, values = ?rec.values, "Printing label");
                let mut transport = SerialTransport::open(&config)?;
                let report = session.run(&mut transport, &rec.form, &rec.values)?;
                if report.form_found {
                    println!("Printed form {}", report.form);
                } else {
                    println!(
                        "Sent form {} (not listed by the printer, check printer configuration)",
                        report.form
                    );
                }
            }
        }

        Commands::Forms { json } => {
            let mut transport = SerialTransport::open(&config)?;
            let forms = PrinterSession::new(&config).list_forms(&mut transport)?;

            if json {
                let out = serde_json::to_string_pretty(&forms)
                    .map_err(|e| LabelError::Io(e.into()))?;
                println!("{}", out);
            } else if forms.is_empty() {
                println!("No forms reported by the printer");
            } else {
                println!("Available forms:");
                for name in &forms.names {
                    println!("  {}", name);
                }
            }
        }

        Commands::Ports => {
            let ports = serial::available_ports()?;
            if ports.is_empty() {
                println!("No serial ports found");
            }
            for port in ports {
                let marker = if port.eq_ignore_ascii_case(&config.port) {
                    " (configured)"
                } else {
                    ""
                };
                println!("  {}{}", port, marker);
            }
        }
    }

    Ok(())
}

/// Defaults, then the config file, then command-line flags.
fn resolve_config(cli: &Cli) -> Result<PrinterConfig, LabelError> {
    let mut config = match &cli.config {
        Some(path) => PrinterConfig::load(path)?,
        None => PrinterConfig::default(),
    };

    if let Some(port) = &cli.port {
        config.port = port.clone();
    }
    if let Some(baud) = cli.baud {
        config.baud_rate = baud;
    }
    if let Some(ms) = cli.read_timeout {
        config.read_timeout_ms = ms;
    }
    if let Some(ms) = cli.write_timeout {
        config.write_timeout_ms = ms;
    }

    config.validate()?;
    Ok(config)
}
