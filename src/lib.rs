pub mod config;
pub mod gateway;
pub mod model;
pub mod profile;
pub mod prompt;
pub mod store;
pub mod topics;
pub mod types;
