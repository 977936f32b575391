pub mod command;
pub mod config;
pub mod debounce;
pub mod engine;
pub mod limits;
pub mod listings;
pub mod model;
pub mod observability;
pub mod session;
