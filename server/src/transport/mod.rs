mod channel;
pub use channel::{InboundMessage, MessageChannel, MessageReceiver, MessageSender};

mod local_window;
pub use local_window::{IpcRenderer, LocalWindow, LocalWindowHost};
