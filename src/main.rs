//! # printlink CLI
//!
//! Command-line interface for thermal receipt printing.
//!
//! ## Usage
//!
//! ```bash
//! # Show the bytes a job encodes to
//! printlink encode job.json --hex
//!
//! # Print over Bluetooth SPP
//! printlink print job.json --serial /dev/rfcomm0
//! printlink print job.json --mac 00:11:62:AA:BB:CC
//!
//! # Print over USB; the dialect comes from the vendor id
//! printlink print job.json --usb 0fe6:811e
//!
//! # Serve the HTTP API
//! printlink serve --listen 0.0.0.0:8080 --serial /dev/rfcomm0
//!
//! # List dialects and known printers
//! printlink dialects
//!
//! # Bind /dev/rfcomm1 to a printer on RFCOMM channel 1
//! sudo printlink bind-rfcomm 00:11:62:AA:BB:CC --index 1 --channel 1
//! ```

use clap::{Args, Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use printlink::{
    PrintLinkError,
    connection::{self, ConnectionManager, ConnectionState, WriteOutcome},
    json_api::JsonJob,
    printer::{DialectProfile, PrinterModel},
    server::{self, LinkTarget, ServerConfig},
    transport::{
        Connector, MockConnector, SerialConnector, SerialDevice, UsbConnector, UsbDevice, serial,
    },
};

/// printlink - Thermal receipt printer utility
#[derive(Parser, Debug)]
#[command(name = "printlink")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Encode a JSON job to printer bytes
    Encode {
        /// JSON job file
        job: PathBuf,

        /// Dialect (overrides the job's own)
        #[arg(long)]
        dialect: Option<String>,

        /// Write bytes to FILE instead of stdout
        #[arg(long, short, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Print a hex dump instead of raw bytes
        #[arg(long)]
        hex: bool,
    },

    /// Encode a JSON job and send it to a printer
    Print {
        /// JSON job file
        job: PathBuf,

        /// Dialect (overrides the job's own)
        #[arg(long)]
        dialect: Option<String>,

        #[command(flatten)]
        link: LinkArgs,

        /// Seconds to wait for the connection
        #[arg(long, default_value = "10")]
        timeout: u64,
    },

    /// Run the HTTP API
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "127.0.0.1:8080")]
        listen: String,

        /// Default dialect for jobs that don't name one
        #[arg(long)]
        dialect: Option<String>,

        #[command(flatten)]
        link: LinkArgs,
    },

    /// List built-in dialects and printer models
    Dialects,

    /// Bind /dev/rfcommN to a Bluetooth printer (requires root)
    BindRfcomm {
        /// Printer MAC address
        mac: String,

        /// rfcomm device index (creates /dev/rfcommN)
        #[arg(long, default_value = "0")]
        index: u8,

        /// RFCOMM channel the printer listens on
        #[arg(long, default_value_t = serial::SPP_CHANNEL)]
        channel: u8,
    },
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct LinkArgs {
    /// RFCOMM tty path
    #[arg(long, value_name = "PATH")]
    serial: Option<PathBuf>,

    /// Bluetooth MAC of a printer already bound to an rfcomm tty
    #[arg(long)]
    mac: Option<String>,

    /// USB printer as VID:PID (hex)
    #[arg(long, value_name = "VID:PID")]
    usb: Option<UsbDevice>,

    /// Encode and connect to an in-memory printer
    #[arg(long)]
    dry_run: bool,
}

impl LinkArgs {
    fn target(&self) -> LinkTarget {
        if let Some(path) = &self.serial {
            LinkTarget::Serial(SerialDevice::from_path(path))
        } else if let Some(mac) = &self.mac {
            LinkTarget::Serial(SerialDevice::from_mac(mac))
        } else if let Some(device) = self.usb {
            LinkTarget::Usb(device)
        } else {
            LinkTarget::DryRun
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("printlink=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), PrintLinkError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Encode {
            job,
            dialect,
            output,
            hex,
        } => {
            let bytes = encode_file(&job, dialect.as_deref(), None)?;
            let rendered = if hex {
                hex_dump(&bytes).into_bytes()
            } else {
                bytes
            };
            match output {
                Some(path) => {
                    fs::write(&path, &rendered)?;
                    println!("Wrote {} bytes to {}", rendered.len(), path.display());
                }
                None => {
                    use std::io::Write;
                    std::io::stdout().write_all(&rendered)?;
                }
            }
        }

        Commands::Print {
            job,
            dialect,
            link,
            timeout,
        } => {
            let target = link.target();
            let bytes = encode_file(&job, dialect.as_deref(), Some(&target))?;
            let timeout = Duration::from_secs(timeout);

            println!("Printing {} bytes to {}...", bytes.len(), target);
            let outcome = match target {
                LinkTarget::Serial(device) => {
                    send(SerialConnector::default(), device, &bytes, timeout)?
                }
                LinkTarget::Usb(device) => send(UsbConnector::default(), device, &bytes, timeout)?,
                LinkTarget::DryRun => {
                    send(MockConnector::new(), "dry-run".to_string(), &bytes, timeout)?
                }
            };
            match outcome {
                WriteOutcome::Sent { bytes } => println!("Printed successfully! ({} bytes)", bytes),
                WriteOutcome::Dropped => {
                    return Err(PrintLinkError::Transport(
                        "printer disconnected before the job was sent".to_string(),
                    ));
                }
            }
        }

        Commands::Serve {
            listen,
            dialect,
            link,
        } => {
            let target = link.target();
            let config = ServerConfig {
                listen_addr: listen,
                dialect: default_dialect(dialect.as_deref(), Some(&target))?,
                link: target,
            };
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(server::serve(config))?;
        }

        Commands::Dialects => {
            println!("Dialects:");
            for dialect in DialectProfile::ALL {
                println!("  {:<20} {}", dialect.name, dialect.description);
            }
            println!("\nPrinters:");
            for model in PrinterModel::ALL {
                let vendors = if model.usb_vendor_ids.is_empty() {
                    "serial".to_string()
                } else {
                    model
                        .usb_vendor_ids
                        .iter()
                        .map(|id| format!("{:04x}", id))
                        .collect::<Vec<_>>()
                        .join(",")
                };
                println!(
                    "  {:<28} {:<20} {} dots ({:.0}mm)  [{}]",
                    model.name,
                    model.dialect.name,
                    model.width_dots,
                    model.width_mm(),
                    vendors
                );
            }
        }

        Commands::BindRfcomm {
            mac,
            index,
            channel,
        } => {
            if let Some(path) = serial::find_rfcomm_for_mac(&mac)? {
                println!("{} is already bound to {}", mac, path);
                return Ok(());
            }
            let path = serial::setup_rfcomm(&mac, index, channel)?;
            println!("Created {}", path);
        }
    }

    Ok(())
}

/// The dialect to use when a job doesn't name one.
///
/// `--dialect` wins; otherwise USB printers are looked up by vendor id and
/// everything else gets generic ESC/POS.
fn default_dialect(
    name: Option<&str>,
    target: Option<&LinkTarget>,
) -> Result<&'static DialectProfile, PrintLinkError> {
    if let Some(name) = name {
        return DialectProfile::by_name(name).ok_or_else(|| {
            PrintLinkError::InvalidParameter(format!("unknown dialect '{}'", name))
        });
    }
    match target {
        Some(LinkTarget::Usb(device)) => Ok(PrinterModel::for_usb_vendor(device.vendor_id)?.dialect),
        _ => Ok(&DialectProfile::ESC_POS),
    }
}

fn encode_file(
    path: &Path,
    dialect: Option<&str>,
    target: Option<&LinkTarget>,
) -> Result<Vec<u8>, PrintLinkError> {
    let text = fs::read_to_string(path).map_err(|e| {
        PrintLinkError::InvalidParameter(format!("failed to read {}: {}", path.display(), e))
    })?;
    let mut job: JsonJob = serde_json::from_str(&text)?;

    let fallback = if dialect.is_some() || job.dialect.is_none() {
        job.dialect = None;
        default_dialect(dialect, target)?
    } else {
        &DialectProfile::ESC_POS
    };

    let base = path.parent().unwrap_or(Path::new(""));
    job.encode(fallback, base)
}

/// Connect, write once, disconnect.
fn send<C: Connector>(
    connector: C,
    device: C::Device,
    bytes: &[u8],
    timeout: Duration,
) -> Result<WriteOutcome, PrintLinkError> {
    let (observer, events) = connection::channel();
    let manager = ConnectionManager::new(connector, observer)?;

    manager.connect(device);
    connection::wait_for_state(&events, ConnectionState::Connected, timeout)?;
    let outcome = manager.write(bytes)?;
    manager.disconnect();
    Ok(outcome)
}

fn hex_dump(bytes: &[u8]) -> String {
    let mut out = String::new();
    for (i, row) in bytes.chunks(16).enumerate() {
        let hex: Vec<String> = row.iter().map(|b| format!("{:02X}", b)).collect();
        let ascii: String = row
            .iter()
            .map(|&b| if b.is_ascii_graphic() || b == b' ' { b as char } else { '.' })
            .collect();
        out.push_str(&format!("{:08x}  {:<47}  {}\n", i * 16, hex.join(" "), ascii));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn bind_args(args: &[&str]) -> (String, u8, u8) {
        let cli = Cli::try_parse_from(["printlink", "bind-rfcomm"].iter().chain(args)).unwrap();
        match cli.command {
            Commands::BindRfcomm {
                mac,
                index,
                channel,
            } => (mac, index, channel),
            other => panic!("expected bind-rfcomm, got {:?}", other),
        }
    }

    #[test]
    fn test_bind_rfcomm_index_and_channel() {
        assert_eq!(
            bind_args(&["00:11:22:33:44:55", "--index", "2", "--channel", "3"]),
            ("00:11:22:33:44:55".to_string(), 2, 3)
        );
    }

    #[test]
    fn test_bind_rfcomm_defaults() {
        assert_eq!(
            bind_args(&["00:11:22:33:44:55"]),
            ("00:11:22:33:44:55".to_string(), 0, serial::SPP_CHANNEL)
        );
    }

    #[test]
    fn test_hex_dump_row() {
        assert_eq!(
            hex_dump(&[0x1B, 0x40, b'A']),
            format!("{:08x}  {:<47}  {}\n", 0, "1B 40 41", "..A")
        );
    }
}
