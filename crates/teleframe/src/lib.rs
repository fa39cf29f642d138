//! Checksummed telemetry framing for serial and radio links.
//!
//! teleframe packs typed vehicle telemetry into small self-describing frames
//! and recovers them byte by byte from lossy, noisy links, counting corrupt
//! and missing frames along the way.
//!
//! # Crate Structure
//!
//! - [`frame`] — Wire format, checksum, field packing, finalizing and the
//!   per-channel parser

/// Re-export frame types.
pub mod frame {
    pub use teleframe_frame::*;
}
