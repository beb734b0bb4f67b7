pub mod aggregate;
pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod models;
pub mod output;
pub mod render;
pub mod snapshot;
pub mod tree;
pub mod vault;
