//! ndnx-inspect: decode and build NDN replication-extension TLV packets.
//!
//! `decode` reads a wire dump (raw or hex) holding one or more top-level
//! elements and prints each one; `encode` builds a packet from command line
//! fields and writes its wire form.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::{error, info};
use ndnx_tlv::SchemaVersion;

mod commands;
mod config;
mod input;
mod logging;

use commands::EncodePacket;
use config::{ConfigFile, DecodeSettings};

/// ndnx-inspect - NDN replication-extension TLV inspector
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Configuration file path
    #[arg(short = 'f', long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode every TLV element in a wire dump
    Decode {
        /// Input file, or '-' for stdin
        #[arg(default_value = "-")]
        input: PathBuf,

        /// Input is a hex dump rather than raw bytes
        #[arg(long)]
        hex: bool,

        /// Print one JSON object per element
        #[arg(long)]
        json: bool,

        /// Schema version (current or legacy)
        #[arg(long)]
        schema: Option<SchemaVersion>,
    },
    /// Build a packet and write its wire encoding
    Encode {
        #[command(subcommand)]
        packet: EncodePacket,

        /// Output file (default: stdout)
        #[arg(short, long, global = true)]
        output: Option<PathBuf>,

        /// Write a hex line instead of raw bytes
        #[arg(long, global = true)]
        hex: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Load config file: explicit path > auto-detect > default
    let cwd = std::env::current_dir()?;
    let file_config = match config::config_path(args.config.as_deref(), &cwd) {
        Some(path) => match config::load_config(&path) {
            Ok(c) => {
                eprintln!("Loaded config from: {}", path.display());
                c
            }
            Err(e) => {
                eprintln!("Failed to load config file: {}", e);
                return Err(e);
            }
        },
        None => ConfigFile::default(),
    };

    let level = config::log_level(args.verbose, &file_config.logging);
    let log_dir = file_config.logging.log_dir.as_deref().map(PathBuf::from);
    let _guard = logging::init_logging(&level, log_dir.as_deref())?;

    match args.command {
        Command::Decode {
            input,
            hex,
            json,
            schema,
        } => {
            let settings = DecodeSettings::merge(schema, hex, &file_config.decode);
            let data = input::read_input(&input)?;
            info!("Read {} bytes from {}", data.len(), input.display());

            let stdout = io::stdout();
            let mut out = BufWriter::new(stdout.lock());
            let summary = commands::run_decode(&data, settings, json, &mut out)?;
            out.flush()?;

            if summary.failed > 0 {
                error!("{} element(s) failed to decode", summary.failed);
                return Err(format!(
                    "{} of {} elements failed to decode",
                    summary.failed,
                    summary.decoded + summary.failed
                )
                .into());
            }
        }
        Command::Encode {
            packet,
            output,
            hex,
        } => {
            let packet = match output {
                Some(path) => {
                    let mut out = BufWriter::new(File::create(&path)?);
                    let packet = commands::run_encode(&packet, hex, &mut out)?;
                    info!("Wrote {} to {}", packet.kind(), path.display());
                    packet
                }
                None => commands::run_encode(&packet, hex, &mut io::stdout().lock())?,
            };
            info!("{}", packet);
        }
    }

    Ok(())
}
