use std::fs;

use teleframe_frame::{Endpoint, Message, MAX_PAYLOAD_LEN};
use tracing::debug;

use crate::cmd::EncodeArgs;
use crate::exit::{frame_error, io_error, CliError, CliResult, DATA_INVALID, SUCCESS, USAGE};
use crate::output::{print_encoded, print_raw, OutputFormat};

pub fn run(args: EncodeArgs, format: OutputFormat) -> CliResult<i32> {
    let payload = resolve_payload(&args)?;
    if payload.len() > MAX_PAYLOAD_LEN {
        return Err(CliError::new(
            DATA_INVALID,
            format!(
                "payload is {} bytes, a frame carries at most {MAX_PAYLOAD_LEN}",
                payload.len()
            ),
        ));
    }

    let mut endpoint =
        Endpoint::new(args.system_id, args.component_id).with_sequence(args.sequence);
    let mut wire = Vec::new();
    let mut frames = Vec::new();

    for _ in 0..args.repeat {
        let mut msg = Message::with_payload(args.kind, &payload)
            .map_err(|err| frame_error("encode failed", err))?;
        endpoint.seal(&mut msg);
        wire.extend_from_slice(&msg.to_send_buffer());
        debug!(seq = msg.sequence, len = msg.length, "encoded frame");
        frames.push(msg);
    }

    if let Some(path) = &args.out {
        fs::write(path, &wire).map_err(|err| {
            io_error(&format!("failed writing {}", path.display()), err)
        })?;
    }

    match format {
        OutputFormat::Raw if args.out.is_none() => print_raw(&wire),
        OutputFormat::Raw => {}
        _ => {
            for msg in &frames {
                print_encoded(msg, format);
            }
        }
    }

    Ok(SUCCESS)
}

fn resolve_payload(args: &EncodeArgs) -> CliResult<Vec<u8>> {
    if let Some(text) = &args.hex {
        return parse_hex(text);
    }
    if let Some(data) = &args.data {
        return Ok(data.as_bytes().to_vec());
    }
    if let Some(path) = &args.file {
        return fs::read(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err));
    }
    Ok(Vec::new())
}

/// Decode hex text, ignoring whitespace and an optional `0x` prefix.
pub fn parse_hex(text: &str) -> CliResult<Vec<u8>> {
    let trimmed = text.trim();
    let digits: String = trimmed
        .strip_prefix("0x")
        .unwrap_or(trimmed)
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    hex::decode(&digits).map_err(|err| CliError::new(USAGE, format!("invalid hex payload: {err}")))
}
