pub mod task;
pub mod tab;
pub mod collection;
pub mod config;

pub use task::*;
pub use tab::*;
pub use collection::*;
pub use config::*;
