/// Default number of channels a [`ChannelRegistry`](crate::ChannelRegistry) tracks.
pub const DEFAULT_MAX_CHANNELS: usize = 16;

/// Default number of bytes pulled from a byte source per read.
pub const DEFAULT_READ_CHUNK: usize = 1024;

/// Controls how many logical channels a registry will track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Channels beyond this count are refused with `FrameError::ChannelLimit`.
    pub max_channels: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_channels: DEFAULT_MAX_CHANNELS,
        }
    }
}

/// Configuration for the blocking frame reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameConfig {
    /// Bytes requested from the source per read call. Default: 1 KiB.
    pub read_chunk_size: usize,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            read_chunk_size: DEFAULT_READ_CHUNK,
        }
    }
}
