use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod decode;
pub mod encode;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build, finalize and emit frames.
    Encode(EncodeArgs),
    /// Decode frames from a byte stream and report link statistics.
    Decode(DecodeArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Encode(args) => encode::run(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Sending system id.
    #[arg(long, env = "TELEFRAME_SYSTEM_ID", default_value = "1")]
    pub system_id: u8,
    /// Sending component id.
    #[arg(long, env = "TELEFRAME_COMPONENT_ID", default_value = "1")]
    pub component_id: u8,
    /// Message kind id.
    #[arg(long, short = 'k', default_value = "0")]
    pub kind: u8,
    /// Sequence number of the first frame.
    #[arg(long, default_value = "0")]
    pub sequence: u8,
    /// Number of frames to emit, each with the next sequence number.
    #[arg(long, default_value = "1")]
    pub repeat: u32,
    /// Payload as hex (whitespace ignored).
    #[arg(long, conflicts_with_all = ["data", "file"])]
    pub hex: Option<String>,
    /// Payload as a raw string.
    #[arg(long, conflicts_with_all = ["hex", "file"])]
    pub data: Option<String>,
    /// Read payload from file.
    #[arg(long, conflicts_with_all = ["hex", "data"])]
    pub file: Option<PathBuf>,
    /// Write the frame bytes to this file.
    #[arg(long, short = 'o', value_name = "PATH")]
    pub out: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Byte stream to decode. Default: stdin.
    pub path: Option<PathBuf>,
    /// Treat the input as hex text instead of raw bytes.
    #[arg(long)]
    pub hex: bool,
    /// Channel label reported with each message.
    #[arg(long, short = 'c', default_value = "0")]
    pub channel: u8,
    /// Only report these message kinds (comma-separated).
    #[arg(long, value_delimiter = ',')]
    pub kinds: Option<Vec<u8>>,
    /// Stop after N messages.
    #[arg(long)]
    pub count: Option<usize>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
