use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use sml_rs::util::hex::parse_hex_lenient;
use sml_rs::{init_logger, render_packet, FeedOutcome, SmlParser, SmlStreamReader};

#[derive(Parser)]
#[command(name = "sml-cli")]
#[command(about = "CLI tool for inspecting SML meter telegrams")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the TLV tree of every packet in a hex dump
    Dump {
        /// Hex dump to decode; reads stdin when omitted
        file: Option<PathBuf>,
        /// Packet buffer capacity in bytes
        #[arg(short, long, default_value = "1024")]
        capacity: usize,
    },
    /// Parse every packet in a hex dump and print the extracted readings
    Readings {
        file: Option<PathBuf>,
        #[arg(short, long, default_value = "1024")]
        capacity: usize,
    },
}

fn main() -> anyhow::Result<()> {
    init_logger();

    let cli = Cli::parse();
    let (file, capacity, dump) = match &cli.command {
        Commands::Dump { file, capacity } => (file.as_deref(), *capacity, true),
        Commands::Readings { file, capacity } => (file.as_deref(), *capacity, false),
    };

    let input = read_input(file)?;
    let stream = parse_hex_lenient(&input).context("input is not a hex dump")?;

    let mut reader = SmlStreamReader::new(capacity);
    let mut parser = SmlParser::new();
    let mut packet_no = 0usize;

    let mut rest: &[u8] = &stream;
    while let FeedOutcome::PacketReady { consumed } = reader.feed(rest) {
        packet_no += 1;
        if dump {
            println!("Packet {packet_no}, {} bytes", reader.packet().len());
            print!("{}", render_packet(reader.packet()));
        } else {
            match parser.parse_packet(reader.packet()) {
                Ok(()) => println!(
                    "Packet {packet_no}: {:.2} W in, {:.2} W out, {:.2} Wh in, {:.2} Wh out",
                    parser.power_in_cw() as f64 / 100.0,
                    parser.power_out_cw() as f64 / 100.0,
                    parser.energy_in_cwh() as f64 / 100.0,
                    parser.energy_out_cwh() as f64 / 100.0,
                ),
                Err(e) => println!("Packet {packet_no}: parse failed: {e}"),
            }
        }
        rest = &rest[consumed..];
    }

    if packet_no == 0 {
        println!("No valid packet found in {} input bytes", stream.len());
    }
    let stats = reader.stats();
    if stats.parse_errors() > 0 {
        println!(
            "Framing errors: {} CRC, {} overflow",
            stats.crc_errors, stats.overflows
        );
    }
    Ok(())
}

fn read_input(file: Option<&Path>) -> anyhow::Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("cannot read stdin")?;
            Ok(buf)
        }
    }
}
