use std::fs::File;
use std::io::{self, Cursor, Read};

use teleframe_frame::{FrameError, FrameReader};
use tracing::info;

use crate::cmd::encode::parse_hex;
use crate::cmd::DecodeArgs;
use crate::exit::{frame_error, io_error, CliResult, SUCCESS};
use crate::output::{print_message, print_stats, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let source = open_source(&args)?;
    let mut reader = FrameReader::new(source);
    let mut printed = 0usize;

    loop {
        let msg = match reader.read_message() {
            Ok(msg) => msg,
            Err(FrameError::ConnectionClosed) => break,
            Err(err) => return Err(frame_error("read failed", err)),
        };

        if let Some(kinds) = &args.kinds {
            if !kinds.contains(&msg.kind) {
                continue;
            }
        }

        print_message(&msg, args.channel, format);
        printed = printed.saturating_add(1);

        if let Some(count) = args.count {
            if printed >= count {
                break;
            }
        }
    }

    let stats = reader.stats();
    info!(
        channel = args.channel,
        received = stats.received,
        dropped = stats.dropped,
        errors = stats.errors,
        "decode finished"
    );
    print_stats(args.channel, &stats, format);

    Ok(SUCCESS)
}

fn open_source(args: &DecodeArgs) -> CliResult<Box<dyn Read>> {
    let mut raw: Box<dyn Read> = match &args.path {
        Some(path) => Box::new(
            File::open(path)
                .map_err(|err| io_error(&format!("failed opening {}", path.display()), err))?,
        ),
        None => Box::new(io::stdin().lock()),
    };

    if !args.hex {
        return Ok(raw);
    }

    let mut text = String::new();
    raw.read_to_string(&mut text)
        .map_err(|err| io_error("failed reading hex input", err))?;
    Ok(Box::new(Cursor::new(parse_hex(&text)?)))
}
