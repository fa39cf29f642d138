use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use teleframe_frame::{ChannelStats, Message};

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct MessageOutput {
    channel: u8,
    sequence: u8,
    system_id: u8,
    component_id: u8,
    kind: u8,
    length: u8,
    payload: String,
    checksum: String,
}

impl MessageOutput {
    fn new(msg: &Message, channel: u8) -> Self {
        Self {
            channel,
            sequence: msg.sequence,
            system_id: msg.system_id,
            component_id: msg.component_id,
            kind: msg.kind,
            length: msg.length,
            payload: hex::encode(msg.payload()),
            checksum: format!("{:04x}", msg.checksum()),
        }
    }
}

#[derive(Serialize)]
struct EncodedOutput {
    #[serde(flatten)]
    message: MessageOutput,
    wire_size: usize,
    frame: String,
}

#[derive(Serialize)]
struct StatsOutput {
    channel: u8,
    received: u64,
    dropped: u64,
    errors: u64,
    overruns: u64,
    last_sequence: Option<u8>,
}

fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

fn message_table(out: &MessageOutput) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["CH", "SEQ", "SYS", "COMP", "KIND", "LEN", "PAYLOAD", "CRC"])
        .add_row(vec![
            out.channel.to_string(),
            out.sequence.to_string(),
            out.system_id.to_string(),
            out.component_id.to_string(),
            out.kind.to_string(),
            out.length.to_string(),
            out.payload.clone(),
            out.checksum.clone(),
        ]);
    table
}

pub fn print_message(msg: &Message, channel: u8, format: OutputFormat) {
    let out = MessageOutput::new(msg, channel);
    match format {
        OutputFormat::Json => print_json(&out),
        OutputFormat::Table => println!("{}", message_table(&out)),
        OutputFormat::Pretty => println!(
            "ch={} seq={} sys={} comp={} kind={} len={} payload={} crc={}",
            out.channel,
            out.sequence,
            out.system_id,
            out.component_id,
            out.kind,
            out.length,
            out.payload,
            out.checksum
        ),
        OutputFormat::Raw => print_raw(msg.payload()),
    }
}

pub fn print_encoded(msg: &Message, format: OutputFormat) {
    let out = EncodedOutput {
        message: MessageOutput::new(msg, 0),
        wire_size: msg.wire_size(),
        frame: hex::encode(msg.to_send_buffer()),
    };
    match format {
        OutputFormat::Json => print_json(&out),
        OutputFormat::Table => {
            println!("{}", message_table(&out.message));
            println!("frame ({} bytes): {}", out.wire_size, out.frame);
        }
        OutputFormat::Pretty => println!(
            "seq={} kind={} len={} frame={}",
            out.message.sequence, out.message.kind, out.message.length, out.frame
        ),
        OutputFormat::Raw => print_raw(&msg.to_send_buffer()),
    }
}

pub fn print_stats(channel: u8, stats: &ChannelStats, format: OutputFormat) {
    let out = StatsOutput {
        channel,
        received: stats.received,
        dropped: stats.dropped,
        errors: stats.errors,
        overruns: stats.overruns,
        last_sequence: stats.last_sequence,
    };
    match format {
        OutputFormat::Json => print_json(&serde_json::json!({ "stats": out })),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["CH", "RECEIVED", "DROPPED", "ERRORS", "OVERRUNS"])
                .add_row(vec![
                    out.channel.to_string(),
                    out.received.to_string(),
                    out.dropped.to_string(),
                    out.errors.to_string(),
                    out.overruns.to_string(),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => println!(
            "ch={} received={} dropped={} errors={} overruns={}",
            out.channel, out.received, out.dropped, out.errors, out.overruns
        ),
        // Raw output carries payload bytes only.
        OutputFormat::Raw => {}
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}
