pub mod config_io;
pub mod persist;
pub mod store;
