pub mod config_io;
pub mod credential_store;
pub mod logging;
