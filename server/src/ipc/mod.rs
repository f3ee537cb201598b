mod ipc_main;
pub use ipc_main::{IpcHandler, IpcListener, IpcMain};
