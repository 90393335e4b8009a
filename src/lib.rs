pub mod cli;
pub mod config;
pub mod engine;
pub mod model;
pub mod observability;
