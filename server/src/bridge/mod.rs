mod bridge_config;
pub use bridge_config::BridgeConfig;

mod core_bridge;
pub use core_bridge::{create_core_bridge, CoreBridge};

mod subscription;
pub use subscription::SubscriptionHandle;

mod main_bridge;
pub use main_bridge::{create_dispatch, main_bridge, MainBridge};
