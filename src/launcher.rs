pub mod backend;
pub mod dialogs;
pub mod directories;
pub mod heartbeat;
pub mod local;
pub mod logging;
