pub mod coordinator;
pub mod view;
