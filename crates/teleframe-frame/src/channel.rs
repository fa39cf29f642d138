//! Per-channel parser registry.
//!
//! A channel is a logical partition of incoming traffic, not necessarily a
//! physical link. Several byte streams (two radios, a radio and a USB
//! console) can be parsed side by side, each with its own state and counters.

use std::collections::BTreeMap;

use tracing::debug;

use crate::config::RegistryConfig;
use crate::error::{FrameError, Result};
use crate::message::Message;
use crate::parser::{ChannelParser, ChannelStats};

/// Identifies a logical channel.
pub type ChannelId = u8;

/// Owns the parser state of every channel seen so far.
#[derive(Debug, Default)]
pub struct ChannelRegistry {
    channels: BTreeMap<ChannelId, ChannelParser>,
    config: RegistryConfig,
}

impl ChannelRegistry {
    /// Create a registry with the default channel bound.
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            channels: BTreeMap::new(),
            config,
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Make sure `channel` has parser state.
    ///
    /// Existing state is left untouched, so calling this repeatedly never
    /// loses counters or a frame in progress.
    pub fn initialize(&mut self, channel: ChannelId) -> Result<&mut ChannelParser> {
        if !self.channels.contains_key(&channel) && self.channels.len() >= self.config.max_channels
        {
            return Err(FrameError::ChannelLimit {
                channel,
                max: self.config.max_channels,
            });
        }
        Ok(self.channels.entry(channel).or_insert_with(|| {
            debug!(channel, "tracking new channel");
            ChannelParser::new()
        }))
    }

    /// Feed one byte received on `channel`.
    pub fn parse_byte(&mut self, channel: ChannelId, byte: u8) -> Result<Option<Message>> {
        Ok(self.initialize(channel)?.parse_byte(byte))
    }

    /// Feed a run of bytes received on `channel`.
    pub fn parse_bytes(&mut self, channel: ChannelId, bytes: &[u8]) -> Result<Vec<Message>> {
        Ok(self.initialize(channel)?.parse_bytes(bytes))
    }

    /// Return `channel` to its initial state, clearing its counters.
    pub fn reset(&mut self, channel: ChannelId) {
        if let Some(parser) = self.channels.get_mut(&channel) {
            *parser = ChannelParser::new();
            debug!(channel, "channel reset");
        }
    }

    /// Stop tracking `channel`, freeing its slot.
    pub fn remove(&mut self, channel: ChannelId) -> Option<ChannelStats> {
        self.channels.remove(&channel).map(|parser| parser.stats())
    }

    pub fn get(&self, channel: ChannelId) -> Option<&ChannelParser> {
        self.channels.get(&channel)
    }

    /// Counters for `channel`, if it has been used.
    pub fn stats(&self, channel: ChannelId) -> Option<ChannelStats> {
        self.channels.get(&channel).map(ChannelParser::stats)
    }

    /// Counters for every tracked channel, in channel order.
    pub fn iter_stats(&self) -> impl Iterator<Item = (ChannelId, ChannelStats)> + '_ {
        self.channels.iter().map(|(&id, parser)| (id, parser.stats()))
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}
