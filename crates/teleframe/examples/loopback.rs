//! Loopback example: two endpoints share one byte stream, one frame is
//! corrupted in flight, and the receiving registry reports the damage.
//!
//! Run with:
//!   cargo run --example loopback

use teleframe::frame::{
    ChannelRegistry, Endpoint, FrameWriter, MessageKind, PayloadReader, PayloadWriter, Result,
};

const AUTOPILOT: u8 = 0;
const GROUND: u8 = 1;

#[derive(Debug)]
struct Attitude {
    roll: f32,
    pitch: f32,
    yaw: f32,
}

impl MessageKind for Attitude {
    const KIND: u8 = 30;

    fn encode(&self, writer: &mut PayloadWriter<'_>) -> Result<()> {
        writer.put_f32(self.roll)?;
        writer.put_f32(self.pitch)?;
        writer.put_f32(self.yaw)
    }

    fn decode(reader: &mut PayloadReader<'_>) -> Result<Self> {
        Ok(Self {
            roll: reader.get_f32()?,
            pitch: reader.get_f32()?,
            yaw: reader.get_f32()?,
        })
    }
}

fn main() -> Result<()> {
    let mut air = FrameWriter::new(Vec::new(), Endpoint::new(7, 1));
    let mut ground = FrameWriter::new(Vec::new(), Endpoint::new(255, 190));

    for step in 0..4u8 {
        let angle = f32::from(step) * 0.1;
        air.send_kind(&Attitude {
            roll: angle,
            pitch: -angle,
            yaw: 1.5,
        })?;
    }
    ground.send(0, b"heartbeat")?;

    let mut air_bytes = air.into_inner();
    let ground_bytes = ground.into_inner();

    // Damage the payload of the second attitude frame.
    let frame_len = air_bytes.len() / 4;
    air_bytes[frame_len + 10] ^= 0x40;

    let mut registry = ChannelRegistry::new();
    registry.initialize(AUTOPILOT)?;
    registry.initialize(GROUND)?;

    for msg in registry.parse_bytes(AUTOPILOT, &air_bytes)? {
        let attitude: Attitude = msg.decode_as()?;
        eprintln!("[autopilot] seq={} {attitude:?}", msg.sequence);
    }
    for msg in registry.parse_bytes(GROUND, &ground_bytes)? {
        eprintln!(
            "[ground] seq={} payload={}",
            msg.sequence,
            String::from_utf8_lossy(msg.payload())
        );
    }

    for (channel, stats) in registry.iter_stats() {
        eprintln!(
            "[stats] channel={channel} received={} dropped={} errors={}",
            stats.received, stats.dropped, stats.errors
        );
    }

    Ok(())
}
