pub mod config;
pub mod prepared;
