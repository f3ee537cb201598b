/// Coordinator -> endpoint broadcast of the current state
pub const SUBSCRIBE_CHANNEL: &str = "subscribe";
/// Endpoint -> coordinator request/response snapshot read
pub const GET_STATE_CHANNEL: &str = "get-state";
/// Endpoint -> coordinator fire-and-forget mutation request
pub const DISPATCH_CHANNEL: &str = "dispatch";

/// The three message identifiers used on the shared control channel
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChannelNames {
    pub subscribe: String,
    pub get_state: String,
    pub dispatch: String,
}

impl Default for ChannelNames {
    fn default() -> Self {
        Self {
            subscribe: SUBSCRIBE_CHANNEL.to_string(),
            get_state: GET_STATE_CHANNEL.to_string(),
            dispatch: DISPATCH_CHANNEL.to_string(),
        }
    }
}
