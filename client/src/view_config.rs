use std::default::Default;

use zubridge_shared::ChannelNames;

/// What a view does when asked to dispatch a thunk
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ThunkPolicy {
    /// Fail the dispatch with [`ClientError::ThunkNotSupported`](crate::ClientError)
    #[default]
    Reject,
    /// Log and drop the thunk, reporting success
    Decline,
}

/// Contains Config properties which will be used by a [`ViewBridge`](crate::ViewBridge)
#[derive(Clone, Debug, Default)]
pub struct ViewConfig {
    /// Must match the coordinator's channel names
    pub channels: ChannelNames,
    pub thunk_policy: ThunkPolicy,
}

impl ViewConfig {
    pub fn with_thunk_policy(mut self, thunk_policy: ThunkPolicy) -> Self {
        self.thunk_policy = thunk_policy;
        self
    }
}
