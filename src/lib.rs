// licwatch library crate
// Exposes modules for the binary and integration tests

pub mod alerts;
pub mod analysis;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod models;
pub mod output;
pub mod source;
pub mod storage;
