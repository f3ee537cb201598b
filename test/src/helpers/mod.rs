pub mod recording_manager;
pub mod stores;

pub use logging::init_logger;
pub use mock_endpoint::{MockEndpoint, MockHost};
pub use recording_manager::RecordingManager;
pub use stores::{counter_handlers, counter_of, counter_store, method_store};
