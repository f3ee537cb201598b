use std::default::Default;

use zubridge_shared::ChannelNames;

/// Contains Config properties which will be used by a Bridge
#[derive(Clone, Debug, Default)]
pub struct BridgeConfig {
    /// Message identifiers on the shared control channel. Views must be
    /// configured with the same names.
    pub channels: ChannelNames,
}

impl BridgeConfig {
    pub fn with_channels(channels: ChannelNames) -> Self {
        Self { channels }
    }
}
